//! Shared fixtures for unit tests and the integration suites in `tests/`.
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{
    CategoryRepository, FavoriteRepository, PasswordHashError, PasswordHasher, TopicRepository,
    UserAccount, UserRepository, VoteRepository,
};
use crate::domain::{
    Actor, Category, CategoryDraft, CategoryId, DEFAULT_SHORT_DESCRIPTION_LIMIT, EmailAddress,
    Favorite, PersonName, Role, Topic, TopicDraft, TopicId, User, UserId, Vote,
};
use crate::inbound::http::state::{HttpState, ServiceContext};
use crate::outbound::memory::InMemoryForum;

/// A description exactly 30 characters long.
pub const DESCRIPTION_30: &str = "Kitchen tap drips all night...";

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 2, 10, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Clock that always reports the same instant.
pub struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Clock that moves one second forward on every reading, so records created
/// in sequence have strictly increasing timestamps.
pub struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self(Mutex::new(start))
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut now = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        let reading = *now;
        *now += TimeDelta::seconds(1);
        reading
    }
}

pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(epoch()))
}

pub fn stepping_clock() -> Arc<dyn Clock> {
    Arc::new(SteppingClock::new(epoch()))
}

/// Reversible "hash" that keeps tests fast; never use outside tests.
pub struct PlainTextHasher;

impl PasswordHasher for PlainTextHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain:") == Some(password)
    }
}

/// Builds forum state directly through the repository ports.
pub struct ForumFixture {
    store: Arc<InMemoryForum>,
    clock: SteppingClock,
}

impl Default for ForumFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl ForumFixture {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryForum::new()),
            clock: SteppingClock::new(epoch()),
        }
    }

    pub fn store(&self) -> Arc<InMemoryForum> {
        Arc::clone(&self.store)
    }

    /// Handler state over this fixture's store, with plain-text passwords.
    pub fn http_state(&self) -> HttpState {
        HttpState::from_store(
            self.store(),
            ServiceContext {
                hasher: Arc::new(PlainTextHasher),
                clock: stepping_clock(),
                description_limit: DEFAULT_SHORT_DESCRIPTION_LIMIT,
            },
        )
    }

    pub async fn add_member(&self, first: &str, last: &str) -> UserId {
        let email = EmailAddress::new(&format!("member-{}@example.com", UserId::random()))
            .expect("fixture email is valid");
        self.add_member_with_email(first, last, &email).await
    }

    pub async fn add_member_with_email(
        &self,
        first: &str,
        last: &str,
        email: &EmailAddress,
    ) -> UserId {
        let user = User {
            id: UserId::random(),
            email: email.clone(),
            first_name: PersonName::new(first).expect("fixture first name"),
            last_name: PersonName::new(last).expect("fixture last name"),
            joined_at: self.clock.utc(),
        };
        let id = user.id;
        UserRepository::insert(
            &*self.store,
            &UserAccount {
                user,
                password_hash: "plain:password".to_owned(),
            },
        )
        .await
        .expect("insert fixture user");
        id
    }

    pub async fn add_admin(&self) -> Actor {
        let id = self.add_member("Site", "Admin").await;
        self.store
            .grant_role(&id, Role::Admin)
            .await
            .expect("grant admin");
        Actor::admin(id)
    }

    pub async fn add_category(&self, name: &str) -> CategoryId {
        let draft = CategoryDraft::try_new(name, None).expect("fixture category");
        let category = Category::from_draft(CategoryId::random(), draft);
        CategoryRepository::insert(&*self.store, &category)
            .await
            .expect("insert fixture category");
        category.id
    }

    pub async fn add_topic(
        &self,
        owner: &UserId,
        title: &str,
        category_id: Option<CategoryId>,
    ) -> TopicId {
        let draft =
            TopicDraft::try_new(title, DESCRIPTION_30, None, category_id).expect("fixture topic");
        let topic = Topic::create(draft, *owner, self.clock.utc());
        TopicRepository::insert(&*self.store, &topic)
            .await
            .expect("insert fixture topic");
        topic.id
    }

    pub async fn add_vote(&self, topic_id: &TopicId, user_id: &UserId, is_liked: bool) {
        VoteRepository::insert(&*self.store, &Vote::new(*topic_id, *user_id, is_liked))
            .await
            .expect("insert fixture vote");
    }

    pub async fn add_favorite(&self, user_id: &UserId, topic_id: &TopicId) {
        let favorite = Favorite::new(*user_id, *topic_id, self.clock.utc());
        FavoriteRepository::insert(&*self.store, &favorite)
            .await
            .expect("insert fixture favorite");
    }
}
