//! Driving port for category views.

use async_trait::async_trait;

use crate::domain::{Actor, Category, CategoryId, CategoryOverview, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoriesQuery: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, Error>;

    /// Admin only; every category with its topic count.
    async fn manage_categories(&self, actor: &Actor) -> Result<Vec<CategoryOverview>, Error>;

    /// Admin only.
    async fn category_for_edit(
        &self,
        actor: &Actor,
        category_id: &CategoryId,
    ) -> Result<Category, Error>;
}
