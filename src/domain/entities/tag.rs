//! Tag entity and repository trait.
//!
//! Maps to the `tags` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// Colour given to tags created without one.
pub const DEFAULT_TAG_COLOR: &str = "#007bff";

/// A blog tag.
///
/// Maps to the `tags` table:
/// - id: UUID PRIMARY KEY
/// - name: VARCHAR(100) NOT NULL UNIQUE
/// - slug: VARCHAR(120) NOT NULL UNIQUE
/// - description: TEXT NULL
/// - color: VARCHAR(7) NOT NULL DEFAULT '#007bff'
/// - is_active: BOOLEAN NOT NULL DEFAULT TRUE
/// - created_at / updated_at: TIMESTAMPTZ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: String,
    pub is_active: bool,
    pub post_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            slug,
            description: None,
            color: DEFAULT_TAG_COLOR.to_string(),
            is_active: true,
            post_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// All tags, newest first.
    async fn find_all(&self, active_only: bool) -> Result<Vec<Tag>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, AppError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, AppError>;

    async fn create(&self, tag: &Tag) -> Result<Tag, AppError>;

    async fn update(&self, tag: &Tag) -> Result<Tag, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}
