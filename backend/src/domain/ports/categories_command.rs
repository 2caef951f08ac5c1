//! Driving port for category administration.

use async_trait::async_trait;

use crate::domain::{Actor, Category, CategoryDeletion, CategoryDraft, CategoryId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoriesCommand: Send + Sync {
    async fn create_category(&self, actor: &Actor, draft: CategoryDraft)
    -> Result<Category, Error>;

    async fn update_category(
        &self,
        actor: &Actor,
        category_id: &CategoryId,
        draft: CategoryDraft,
    ) -> Result<Category, Error>;

    /// Refuses with [`CategoryDeletion::Blocked`] while topics reference the
    /// category.
    async fn delete_category(
        &self,
        actor: &Actor,
        category_id: &CategoryId,
    ) -> Result<CategoryDeletion, Error>;
}
