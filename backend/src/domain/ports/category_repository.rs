//! Driven port for category persistence.

use async_trait::async_trait;

use crate::domain::{Category, CategoryId, CategoryName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by category repository adapters.
    pub enum CategoryRepositoryError {
        Connection { message: String } => "category repository connection failed: {message}",
        Query { message: String } => "category repository query failed: {message}",
        /// A topic still references the category.
        InUse => "category is referenced by topics",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn insert(&self, category: &Category) -> Result<(), CategoryRepositoryError>;

    async fn find_by_id(&self, id: &CategoryId)
    -> Result<Option<Category>, CategoryRepositoryError>;

    async fn find_by_name(
        &self,
        name: &CategoryName,
    ) -> Result<Option<Category>, CategoryRepositoryError>;

    /// Every category ordered by name.
    async fn list(&self) -> Result<Vec<Category>, CategoryRepositoryError>;

    /// Returns `false` when the category does not exist.
    async fn update(&self, category: &Category) -> Result<bool, CategoryRepositoryError>;

    /// Never cascades: fails with [`CategoryRepositoryError::InUse`] while any
    /// topic references the row. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &CategoryId) -> Result<bool, CategoryRepositoryError>;
}
