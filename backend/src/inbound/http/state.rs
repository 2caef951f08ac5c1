//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see driving ports, so they
//! can be exercised against the in-memory store without any I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    CategoriesCommand, CategoriesQuery, CategoryRepository, CommentRepository,
    FavoriteRepository, FavoritesCommand, IdentityQuery, LoginService, PasswordHasher,
    RatingCommand, RegistrationCommand, TopicRepository, TopicsCommand, TopicsQuery,
    UserRepository, VoteRepository,
};
use crate::domain::{
    AccountService, CategoryService, FavoriteService, RatingService, TopicRepositories,
    TopicService,
};

/// Port implementations backing the handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationCommand>,
    pub identity: Arc<dyn IdentityQuery>,
    pub topics: Arc<dyn TopicsCommand>,
    pub topics_query: Arc<dyn TopicsQuery>,
    pub ratings: Arc<dyn RatingCommand>,
    pub favorites: Arc<dyn FavoritesCommand>,
    pub categories: Arc<dyn CategoriesCommand>,
    pub categories_query: Arc<dyn CategoriesQuery>,
}

/// Collaborators every service shares regardless of the store.
#[derive(Clone)]
pub struct ServiceContext {
    pub hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
    pub description_limit: usize,
}

impl HttpState {
    /// Wire every service against one store implementing all repositories.
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use homecraft::inbound::http::state::{HttpState, ServiceContext};
    /// use homecraft::outbound::memory::InMemoryForum;
    /// use homecraft::outbound::security::Argon2PasswordHasher;
    /// use mockable::DefaultClock;
    ///
    /// let state = HttpState::from_store(
    ///     Arc::new(InMemoryForum::new()),
    ///     ServiceContext {
    ///         hasher: Arc::new(Argon2PasswordHasher::new()),
    ///         clock: Arc::new(DefaultClock),
    ///         description_limit: 100,
    ///     },
    /// );
    /// let _topics = state.topics_query.clone();
    /// ```
    pub fn from_store<S>(store: Arc<S>, context: ServiceContext) -> Self
    where
        S: UserRepository
            + TopicRepository
            + CategoryRepository
            + CommentRepository
            + VoteRepository
            + FavoriteRepository
            + 'static,
    {
        let accounts = Arc::new(AccountService::new(
            store.clone(),
            context.hasher,
            context.clock.clone(),
        ));
        let topics = Arc::new(
            TopicService::new(TopicRepositories::from_store(&store), context.clock.clone())
                .with_description_limit(context.description_limit),
        );
        let categories = Arc::new(CategoryService::new(store.clone(), store.clone()));

        Self {
            login: accounts.clone(),
            registration: accounts.clone(),
            identity: accounts,
            topics: topics.clone(),
            topics_query: topics,
            ratings: Arc::new(RatingService::new(store.clone())),
            favorites: Arc::new(FavoriteService::new(store, context.clock)),
            categories: categories.clone(),
            categories_query: categories,
        }
    }
}
