//! Category administration and the deletion guard.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::authorization::ensure_admin;
use super::port_errors::{category_not_found, map_category_error, map_topic_error};
use super::ports::{
    CategoriesCommand, CategoriesQuery, CategoryRepository, CategoryRepositoryError,
    TopicRepository,
};
use super::{
    Actor, Category, CategoryDeletion, CategoryDraft, CategoryId, CategoryOverview, Error,
};

#[derive(Clone)]
pub struct CategoryService<C, T> {
    categories: Arc<C>,
    topics: Arc<T>,
}

impl<C, T> CategoryService<C, T> {
    pub fn new(categories: Arc<C>, topics: Arc<T>) -> Self {
        Self { categories, topics }
    }
}

impl<C, T> CategoryService<C, T>
where
    C: CategoryRepository,
    T: TopicRepository,
{
    async fn existing(&self, category_id: &CategoryId) -> Result<Category, Error> {
        self.categories
            .find_by_id(category_id)
            .await
            .map_err(map_category_error)?
            .ok_or_else(category_not_found)
    }
}

#[async_trait]
impl<C, T> CategoriesCommand for CategoryService<C, T>
where
    C: CategoryRepository,
    T: TopicRepository,
{
    async fn create_category(
        &self,
        actor: &Actor,
        draft: CategoryDraft,
    ) -> Result<Category, Error> {
        ensure_admin(actor)?;
        let category = Category::from_draft(CategoryId::random(), draft);
        self.categories
            .insert(&category)
            .await
            .map_err(map_category_error)?;
        info!(category_id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    async fn update_category(
        &self,
        actor: &Actor,
        category_id: &CategoryId,
        draft: CategoryDraft,
    ) -> Result<Category, Error> {
        ensure_admin(actor)?;
        let category = Category::from_draft(*category_id, draft);
        let updated = self
            .categories
            .update(&category)
            .await
            .map_err(map_category_error)?;
        if updated {
            Ok(category)
        } else {
            Err(category_not_found())
        }
    }

    async fn delete_category(
        &self,
        actor: &Actor,
        category_id: &CategoryId,
    ) -> Result<CategoryDeletion, Error> {
        ensure_admin(actor)?;
        self.existing(category_id).await?;

        let topic_count = self
            .topics
            .count_in_category(category_id)
            .await
            .map_err(map_topic_error)?;
        if topic_count > 0 {
            return Ok(CategoryDeletion::blocked(topic_count));
        }

        match self.categories.delete(category_id).await {
            Ok(true) => {
                info!(%category_id, "category deleted");
                Ok(CategoryDeletion::Deleted)
            }
            Ok(false) => Err(category_not_found()),
            Err(CategoryRepositoryError::InUse) => {
                debug!(%category_id, "topic filed under category during delete");
                let recount = self
                    .topics
                    .count_in_category(category_id)
                    .await
                    .map_err(map_topic_error)?;
                Ok(CategoryDeletion::blocked(recount.max(1)))
            }
            Err(err) => Err(map_category_error(err)),
        }
    }
}

#[async_trait]
impl<C, T> CategoriesQuery for CategoryService<C, T>
where
    C: CategoryRepository,
    T: TopicRepository,
{
    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        self.categories.list().await.map_err(map_category_error)
    }

    async fn manage_categories(&self, actor: &Actor) -> Result<Vec<CategoryOverview>, Error> {
        ensure_admin(actor)?;
        let categories = self.categories.list().await.map_err(map_category_error)?;
        let counts = self
            .topics
            .count_by_category()
            .await
            .map_err(map_topic_error)?;
        Ok(categories
            .into_iter()
            .map(|category| CategoryOverview {
                topic_count: counts.get(&category.id).copied().unwrap_or_default(),
                category,
            })
            .collect())
    }

    async fn category_for_edit(
        &self,
        actor: &Actor,
        category_id: &CategoryId,
    ) -> Result<Category, Error> {
        ensure_admin(actor)?;
        self.existing(category_id).await
    }
}
