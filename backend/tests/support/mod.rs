//! Shared helpers for the integration suites under `backend/tests/`.

pub mod cluster_skip;
pub mod embedded_postgres;

use chrono::{TimeZone, Utc};
use homecraft::domain::ports::{CategoryRepository, TopicRepository, UserAccount, UserRepository};
use homecraft::domain::{
    Category, CategoryDraft, CategoryId, EmailAddress, PersonName, Topic, TopicDraft, TopicId,
    User, UserId,
};
use homecraft::outbound::persistence::{
    DbPool, DieselCategoryRepository, DieselTopicRepository, DieselUserRepository, PoolConfig,
};
use homecraft::test_support::DESCRIPTION_30;
use pg_embedded_setup_unpriv::TemporaryDatabase;
use tokio::runtime::Runtime;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::provision_template_database;

/// Render a `postgres` error with its SQLSTATE and detail.
///
/// `postgres::Error`'s `Display` collapses database errors to `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    if let Some(constraint) = db_error.constraint() {
        summary.push_str("; constraint: ");
        summary.push_str(constraint);
    }
    summary
}

/// A migrated temporary database with a pool over it.
///
/// Field order matters: the pool closes its connections before the database
/// is dropped.
pub struct PgWorld {
    pub runtime: Runtime,
    pub pool: DbPool,
    pub database_url: String,
    _database: TemporaryDatabase,
}

impl PgWorld {
    pub fn setup(cluster: &pg_embedded_setup_unpriv::ClusterHandle) -> Result<Self, String> {
        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let database = provision_template_database(cluster).map_err(|err| err.to_string())?;
        let database_url = database.url().to_string();
        let config = PoolConfig::new(&database_url)
            .with_max_size(2)
            .with_min_idle(Some(1));
        let pool = runtime
            .block_on(DbPool::new(config))
            .map_err(|err| err.to_string())?;

        Ok(Self {
            runtime,
            pool,
            database_url,
            _database: database,
        })
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn add_member(&self, email: &str) -> UserId {
        let user = User {
            id: UserId::random(),
            email: EmailAddress::new(email).expect("fixture email"),
            first_name: PersonName::new("Ada").expect("fixture first name"),
            last_name: PersonName::new("Lovelace").expect("fixture last name"),
            joined_at: Utc
                .with_ymd_and_hms(2026, 2, 2, 10, 0, 0)
                .single()
                .expect("fixture timestamp"),
        };
        let id = user.id;
        let users = DieselUserRepository::new(self.pool.clone());
        self.block_on(users.insert(&UserAccount {
            user,
            password_hash: "plain:password".to_owned(),
        }))
        .expect("insert user");
        id
    }

    pub fn add_category(&self, name: &str) -> CategoryId {
        let draft = CategoryDraft::try_new(name, None).expect("fixture category");
        let category = Category::from_draft(CategoryId::random(), draft);
        let categories = DieselCategoryRepository::new(self.pool.clone());
        self.block_on(categories.insert(&category))
            .expect("insert category");
        category.id
    }

    pub fn add_topic(&self, owner: &UserId, category_id: Option<CategoryId>) -> Topic {
        let draft = TopicDraft::try_new("Leaky faucet", DESCRIPTION_30, None, category_id)
            .expect("fixture draft");
        let topic = Topic::create(draft, *owner, Utc::now());
        let topics = DieselTopicRepository::new(self.pool.clone());
        self.block_on(topics.insert(&topic)).expect("insert topic");
        topic
    }

    /// Counts rows in `table` whose `column` equals `id`.
    pub fn rows_referencing(&self, table: &str, column: &str, id: &TopicId) -> i64 {
        embedded_postgres::count_rows(
            &self.database_url,
            &format!("SELECT COUNT(*) FROM {table} WHERE {column} = $1"),
            &[id.as_uuid()],
        )
    }
}
