//! Category entity and repository trait.
//!
//! Maps to the `categories` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// A blog category.
///
/// Maps to the `categories` table:
/// - id: UUID PRIMARY KEY
/// - name: VARCHAR(100) NOT NULL UNIQUE
/// - slug: VARCHAR(120) NOT NULL UNIQUE
/// - description: TEXT NULL
/// - image: TEXT NULL
/// - is_active: BOOLEAN NOT NULL DEFAULT TRUE
/// - sort_order: INTEGER NOT NULL DEFAULT 0
/// - created_at / updated_at: TIMESTAMPTZ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    /// Number of posts in this category (read-side only)
    pub post_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            slug,
            description: None,
            image: None,
            is_active: true,
            sort_order: 0,
            post_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by `sort_order ASC, created_at DESC`.
    async fn find_all(&self, active_only: bool) -> Result<Vec<Category>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, AppError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError>;

    async fn create(&self, category: &Category) -> Result<Category, AppError>;

    async fn update(&self, category: &Category) -> Result<Category, AppError>;

    /// Delete; posts in the category keep existing with no category.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}
