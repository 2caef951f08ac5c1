//! Topic categories and the deletion guard outcome.

use std::fmt;

use super::CategoryId;
use super::error::FieldErrors;

pub const CATEGORY_NAME_MAX: usize = 50;
pub const CATEGORY_ICON_MAX: usize = 100;

/// Reason shown when a category still has topics.
pub const CATEGORY_IN_USE_MESSAGE: &str =
    "Move topics to another category before deleting this one.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong { max: usize },
    IconTooLong { max: usize },
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "category name is required"),
            Self::NameTooLong { max } => {
                write!(f, "category name must be at most {max} characters")
            }
            Self::IconTooLong { max } => write!(f, "icon must be at most {max} characters"),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryName(String);

impl CategoryName {
    pub fn new(raw: &str) -> Result<Self, CategoryValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        if trimmed.chars().count() > CATEGORY_NAME_MAX {
            return Err(CategoryValidationError::NameTooLong {
                max: CATEGORY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Icon reference such as `bi-droplet`; blank input means no icon.
fn parse_icon(raw: Option<&str>) -> Result<Option<String>, CategoryValidationError> {
    let Some(icon) = raw.map(str::trim).filter(|icon| !icon.is_empty()) else {
        return Ok(None);
    };
    if icon.chars().count() > CATEGORY_ICON_MAX {
        return Err(CategoryValidationError::IconTooLong {
            max: CATEGORY_ICON_MAX,
        });
    }
    Ok(Some(icon.to_owned()))
}

/// Validated fields for creating or renaming a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: CategoryName,
    pub icon: Option<String>,
}

impl CategoryDraft {
    pub fn try_new(name: &str, icon: Option<&str>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.collect("name", CategoryName::new(name));
        let icon = errors.collect("icon", parse_icon(icon));
        match (name, icon) {
            (Some(name), Some(icon)) => Ok(Self { name, icon }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub icon: Option<String>,
}

impl Category {
    pub fn from_draft(id: CategoryId, draft: CategoryDraft) -> Self {
        Self {
            id,
            name: draft.name,
            icon: draft.icon,
        }
    }
}

/// A category together with the number of topics filed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOverview {
    pub category: Category,
    pub topic_count: u64,
}

/// Result of asking to delete a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryDeletion {
    Deleted,
    /// Topics still reference the category; nothing was changed.
    Blocked { reason: String, topic_count: u64 },
}

impl CategoryDeletion {
    pub fn blocked(topic_count: u64) -> Self {
        Self::Blocked {
            reason: CATEGORY_IN_USE_MESSAGE.to_owned(),
            topic_count,
        }
    }
}
