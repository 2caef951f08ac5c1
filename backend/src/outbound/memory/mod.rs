//! In-memory implementation of every repository port.
//!
//! Used when no database is configured and as the store behind service and
//! HTTP tests. It mirrors the PostgreSQL schema's guarantees: unique
//! `(topic, user)` votes and `(user, topic)` favorites, foreign keys on
//! topics and categories, cascade from topics, and a restricting foreign key
//! from topics to categories. Each call takes the lock once, so every
//! operation is atomic.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    CategoryRepository, CategoryRepositoryError, CommentRepository, CommentRepositoryError,
    FavoriteRepository, FavoriteRepositoryError, TopicRepository, TopicRepositoryError,
    UserAccount, UserRepository, UserRepositoryError, VoteRepository, VoteRepositoryError,
};
use crate::domain::{
    Category, CategoryId, CategoryName, Comment, CommentRecord, EmailAddress, Favorite,
    FavoriteId, RatingTally, Role, Topic, TopicId, TopicRecord, User, UserId, Vote,
};

const UNKNOWN_AUTHOR: &str = "Unknown member";

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, UserAccount>,
    roles: HashMap<UserId, BTreeSet<Role>>,
    categories: HashMap<CategoryId, Category>,
    topics: HashMap<TopicId, Topic>,
    comments: Vec<Comment>,
    votes: Vec<Vote>,
    favorites: Vec<Favorite>,
}

impl Tables {
    fn author_name(&self, user_id: &UserId) -> String {
        self.users
            .get(user_id)
            .map_or_else(|| UNKNOWN_AUTHOR.to_owned(), |account| account.user.display_name())
    }

    fn record(&self, topic: &Topic) -> TopicRecord {
        TopicRecord {
            topic: topic.clone(),
            author_name: self.author_name(&topic.owner_id),
            category_name: topic
                .category_id
                .and_then(|id| self.categories.get(&id))
                .map(|category| category.name.as_str().to_owned()),
        }
    }

    fn category_missing(&self, category_id: Option<CategoryId>) -> bool {
        category_id.is_some_and(|id| !self.categories.contains_key(&id))
    }
}

#[derive(Default)]
pub struct InMemoryForum {
    tables: Mutex<Tables>,
}

impl InMemoryForum {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Inspection helpers for tests and diagnostics.

    pub fn vote_rows(&self, topic_id: &TopicId) -> usize {
        self.lock()
            .votes
            .iter()
            .filter(|vote| vote.topic_id == *topic_id)
            .count()
    }

    pub fn favorite_rows(&self, user_id: &UserId, topic_id: &TopicId) -> usize {
        self.lock()
            .favorites
            .iter()
            .filter(|fav| fav.user_id == *user_id && fav.topic_id == *topic_id)
            .count()
    }

    pub fn comment_rows(&self, topic_id: &TopicId) -> usize {
        self.lock()
            .comments
            .iter()
            .filter(|comment| comment.topic_id == *topic_id)
            .count()
    }

    pub fn has_topic(&self, topic_id: &TopicId) -> bool {
        self.lock().topics.contains_key(topic_id)
    }

    pub fn has_category(&self, category_id: &CategoryId) -> bool {
        self.lock().categories.contains_key(category_id)
    }

    pub fn topic_record(&self, topic_id: &TopicId) -> Option<TopicRecord> {
        let tables = self.lock();
        tables.topics.get(topic_id).map(|topic| tables.record(topic))
    }

    pub fn account_by_email(&self, email: &EmailAddress) -> Option<UserAccount> {
        self.lock()
            .users
            .values()
            .find(|account| account.user.email == *email)
            .cloned()
    }

    pub fn user_roles(&self, user_id: &UserId) -> Vec<Role> {
        self.lock()
            .roles
            .get(user_id)
            .map(|roles| roles.iter().copied().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TopicRepository for InMemoryForum {
    async fn insert(&self, topic: &Topic) -> Result<(), TopicRepositoryError> {
        let mut tables = self.lock();
        if tables.category_missing(topic.category_id) {
            return Err(TopicRepositoryError::category_not_found());
        }
        if !tables.users.contains_key(&topic.owner_id) {
            return Err(TopicRepositoryError::query("topic owner does not exist"));
        }
        tables.topics.insert(topic.id, topic.clone());
        Ok(())
    }

    async fn find_record(&self, id: &TopicId) -> Result<Option<TopicRecord>, TopicRepositoryError> {
        Ok(self.topic_record(id))
    }

    async fn list_records(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<TopicRecord>, TopicRepositoryError> {
        let tables = self.lock();
        let mut topics: Vec<&Topic> = tables
            .topics
            .values()
            .filter(|topic| category_id.is_none() || topic.category_id == category_id)
            .collect();
        topics.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(topics.into_iter().map(|topic| tables.record(topic)).collect())
    }

    async fn find_records(
        &self,
        ids: &[TopicId],
    ) -> Result<Vec<TopicRecord>, TopicRepositoryError> {
        let tables = self.lock();
        Ok(ids
            .iter()
            .filter_map(|id| tables.topics.get(id))
            .map(|topic| tables.record(topic))
            .collect())
    }

    async fn update(
        &self,
        topic: &Topic,
        expected_revision: u32,
    ) -> Result<(), TopicRepositoryError> {
        let mut tables = self.lock();
        if tables.category_missing(topic.category_id) {
            return Err(TopicRepositoryError::category_not_found());
        }
        let Some(stored) = tables.topics.get_mut(&topic.id) else {
            return Err(TopicRepositoryError::not_found());
        };
        if stored.revision != expected_revision {
            return Err(TopicRepositoryError::revision_mismatch(
                expected_revision,
                stored.revision,
            ));
        }
        *stored = topic.clone();
        Ok(())
    }

    async fn delete(&self, id: &TopicId) -> Result<bool, TopicRepositoryError> {
        let mut tables = self.lock();
        if tables.topics.remove(id).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|comment| comment.topic_id != *id);
        tables.votes.retain(|vote| vote.topic_id != *id);
        tables.favorites.retain(|fav| fav.topic_id != *id);
        Ok(true)
    }

    async fn count_in_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<u64, TopicRepositoryError> {
        let count = self
            .lock()
            .topics
            .values()
            .filter(|topic| topic.category_id == Some(*category_id))
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn count_by_category(&self) -> Result<HashMap<CategoryId, u64>, TopicRepositoryError> {
        let tables = self.lock();
        let mut counts = HashMap::new();
        for category_id in tables.topics.values().filter_map(|topic| topic.category_id) {
            *counts.entry(category_id).or_insert(0_u64) += 1;
        }
        Ok(counts)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryForum {
    async fn insert(&self, category: &Category) -> Result<(), CategoryRepositoryError> {
        self.lock().categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &CategoryId,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        Ok(self.lock().categories.get(id).cloned())
    }

    async fn find_by_name(
        &self,
        name: &CategoryName,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        Ok(self
            .lock()
            .categories
            .values()
            .find(|category| category.name == *name)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let mut categories: Vec<Category> = self.lock().categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(categories)
    }

    async fn update(&self, category: &Category) -> Result<bool, CategoryRepositoryError> {
        let mut tables = self.lock();
        let Some(stored) = tables.categories.get_mut(&category.id) else {
            return Ok(false);
        };
        *stored = category.clone();
        Ok(true)
    }

    async fn delete(&self, id: &CategoryId) -> Result<bool, CategoryRepositoryError> {
        let mut tables = self.lock();
        if tables
            .topics
            .values()
            .any(|topic| topic.category_id == Some(*id))
        {
            return Err(CategoryRepositoryError::in_use());
        }
        Ok(tables.categories.remove(id).is_some())
    }
}

#[async_trait]
impl CommentRepository for InMemoryForum {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut tables = self.lock();
        if !tables.topics.contains_key(&comment.topic_id) {
            return Err(CommentRepositoryError::topic_not_found());
        }
        tables.comments.push(comment.clone());
        Ok(())
    }

    async fn list_for_topic(
        &self,
        topic_id: &TopicId,
    ) -> Result<Vec<CommentRecord>, CommentRepositoryError> {
        let tables = self.lock();
        let mut comments: Vec<&Comment> = tables
            .comments
            .iter()
            .filter(|comment| comment.topic_id == *topic_id)
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments
            .into_iter()
            .map(|comment| CommentRecord {
                comment: comment.clone(),
                author_name: tables.author_name(&comment.author_id),
            })
            .collect())
    }
}

#[async_trait]
impl VoteRepository for InMemoryForum {
    async fn find_for(
        &self,
        topic_id: &TopicId,
        user_id: &UserId,
    ) -> Result<Option<Vote>, VoteRepositoryError> {
        Ok(self
            .lock()
            .votes
            .iter()
            .find(|vote| vote.topic_id == *topic_id && vote.user_id == *user_id)
            .cloned())
    }

    async fn insert(&self, vote: &Vote) -> Result<(), VoteRepositoryError> {
        let mut tables = self.lock();
        if !tables.topics.contains_key(&vote.topic_id) {
            return Err(VoteRepositoryError::topic_not_found());
        }
        if !tables.users.contains_key(&vote.user_id) {
            return Err(VoteRepositoryError::user_not_found());
        }
        let duplicate = tables
            .votes
            .iter()
            .any(|existing| existing.topic_id == vote.topic_id && existing.user_id == vote.user_id);
        if duplicate {
            return Err(VoteRepositoryError::duplicate_vote());
        }
        tables.votes.push(vote.clone());
        Ok(())
    }

    async fn set_liked(
        &self,
        topic_id: &TopicId,
        user_id: &UserId,
        is_liked: bool,
    ) -> Result<bool, VoteRepositoryError> {
        let mut tables = self.lock();
        let Some(vote) = tables
            .votes
            .iter_mut()
            .find(|vote| vote.topic_id == *topic_id && vote.user_id == *user_id)
        else {
            return Ok(false);
        };
        vote.is_liked = is_liked;
        Ok(true)
    }

    async fn tally(&self, topic_id: &TopicId) -> Result<RatingTally, VoteRepositoryError> {
        let tables = self.lock();
        Ok(RatingTally::from_flags(
            tables
                .votes
                .iter()
                .filter(|vote| vote.topic_id == *topic_id)
                .map(|vote| vote.is_liked),
        ))
    }

    async fn tallies(
        &self,
        topic_ids: &[TopicId],
    ) -> Result<HashMap<TopicId, RatingTally>, VoteRepositoryError> {
        let tables = self.lock();
        let mut tallies: HashMap<TopicId, RatingTally> = HashMap::new();
        for vote in tables
            .votes
            .iter()
            .filter(|vote| topic_ids.contains(&vote.topic_id))
        {
            tallies.entry(vote.topic_id).or_default().record(vote.is_liked);
        }
        Ok(tallies)
    }
}

#[async_trait]
impl FavoriteRepository for InMemoryForum {
    async fn find_for(
        &self,
        user_id: &UserId,
        topic_id: &TopicId,
    ) -> Result<Option<Favorite>, FavoriteRepositoryError> {
        Ok(self
            .lock()
            .favorites
            .iter()
            .find(|fav| fav.user_id == *user_id && fav.topic_id == *topic_id)
            .cloned())
    }

    async fn insert(&self, favorite: &Favorite) -> Result<(), FavoriteRepositoryError> {
        let mut tables = self.lock();
        if !tables.topics.contains_key(&favorite.topic_id) {
            return Err(FavoriteRepositoryError::topic_not_found());
        }
        if !tables.users.contains_key(&favorite.user_id) {
            return Err(FavoriteRepositoryError::user_not_found());
        }
        let duplicate = tables
            .favorites
            .iter()
            .any(|fav| fav.user_id == favorite.user_id && fav.topic_id == favorite.topic_id);
        if duplicate {
            return Err(FavoriteRepositoryError::duplicate_favorite());
        }
        tables.favorites.push(favorite.clone());
        Ok(())
    }

    async fn delete(&self, id: &FavoriteId) -> Result<bool, FavoriteRepositoryError> {
        let mut tables = self.lock();
        let before = tables.favorites.len();
        tables.favorites.retain(|fav| fav.id != *id);
        Ok(tables.favorites.len() < before)
    }

    async fn count_for_topic(&self, topic_id: &TopicId) -> Result<u64, FavoriteRepositoryError> {
        let count = self
            .lock()
            .favorites
            .iter()
            .filter(|fav| fav.topic_id == *topic_id)
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn topic_ids_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TopicId>, FavoriteRepositoryError> {
        let tables = self.lock();
        let mut favorites: Vec<&Favorite> = tables
            .favorites
            .iter()
            .rev()
            .filter(|fav| fav.user_id == *user_id)
            .collect();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(favorites.into_iter().map(|fav| fav.topic_id).collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryForum {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut tables = self.lock();
        let taken = tables
            .users
            .values()
            .any(|existing| existing.user.email == account.user.email);
        if taken {
            return Err(UserRepositoryError::duplicate_email());
        }
        tables.users.insert(account.user.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.lock().users.get(id).map(|account| account.user.clone()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(self.account_by_email(email))
    }

    async fn roles_for(&self, id: &UserId) -> Result<Vec<Role>, UserRepositoryError> {
        Ok(self.user_roles(id))
    }

    async fn grant_role(&self, id: &UserId, role: Role) -> Result<bool, UserRepositoryError> {
        let mut tables = self.lock();
        if !tables.users.contains_key(id) {
            return Err(UserRepositoryError::user_not_found());
        }
        Ok(tables.roles.entry(*id).or_default().insert(role))
    }
}
