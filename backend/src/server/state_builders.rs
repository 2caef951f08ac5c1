//! Builders wiring domain services to the configured store.

use std::sync::Arc;

use homecraft::bootstrap::{BootstrapSettings, StartupBootstrapError, bootstrap_on_startup};
use homecraft::domain::{
    AccountService, BootstrapOutcome, CategoryService, FavoriteService, RatingService,
    TopicRepositories, TopicService,
};
use homecraft::inbound::http::state::{HttpState, ServiceContext};
use homecraft::outbound::persistence::{
    DbPool, DieselCategoryRepository, DieselCommentRepository, DieselFavoriteRepository,
    DieselTopicRepository, DieselUserRepository, DieselVoteRepository,
};

use super::config::ForumStore;

/// Handler state over whichever store is configured.
pub(crate) fn build_http_state(store: &ForumStore, context: &ServiceContext) -> HttpState {
    match store {
        ForumStore::Memory(forum) => HttpState::from_store(Arc::clone(forum), context.clone()),
        ForumStore::Postgres(pool) => build_diesel_state(pool, context.clone()),
    }
}

fn build_diesel_state(pool: &DbPool, context: ServiceContext) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let topics = Arc::new(DieselTopicRepository::new(pool.clone()));
    let categories = Arc::new(DieselCategoryRepository::new(pool.clone()));
    let comments = Arc::new(DieselCommentRepository::new(pool.clone()));
    let votes = Arc::new(DieselVoteRepository::new(pool.clone()));
    let favorites = Arc::new(DieselFavoriteRepository::new(pool.clone()));

    let accounts = Arc::new(AccountService::new(
        users,
        context.hasher,
        context.clock.clone(),
    ));
    let topic_service = Arc::new(
        TopicService::new(
            TopicRepositories {
                topics: topics.clone(),
                categories: categories.clone(),
                comments,
                votes: votes.clone(),
                favorites: favorites.clone(),
            },
            context.clock.clone(),
        )
        .with_description_limit(context.description_limit),
    );
    let category_service = Arc::new(CategoryService::new(categories, topics));

    HttpState {
        login: accounts.clone(),
        registration: accounts.clone(),
        identity: accounts,
        topics: topic_service.clone(),
        topics_query: topic_service,
        ratings: Arc::new(RatingService::new(votes)),
        favorites: Arc::new(FavoriteService::new(favorites, context.clock)),
        categories: category_service.clone(),
        categories_query: category_service,
    }
}

/// Run the start-up bootstrap against the configured store.
pub(crate) async fn run_bootstrap(
    store: &ForumStore,
    context: &ServiceContext,
    settings: &BootstrapSettings,
) -> Result<BootstrapOutcome, StartupBootstrapError> {
    let hasher = Arc::clone(&context.hasher);
    let clock = Arc::clone(&context.clock);
    match store {
        ForumStore::Memory(forum) => {
            bootstrap_on_startup(settings, Arc::clone(forum), Arc::clone(forum), hasher, clock)
                .await
        }
        ForumStore::Postgres(pool) => {
            bootstrap_on_startup(
                settings,
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselCategoryRepository::new(pool.clone())),
                hasher,
                clock,
            )
            .await
        }
    }
}
