//! PostgreSQL implementation of TagRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Tag, TagRepository};
use crate::shared::error::{conflict_on_unique, AppError};

const SELECT_TAG: &str = r#"
    SELECT t.id, t.name, t.slug, t.description, t.color, t.is_active,
           (SELECT COUNT(*) FROM blog_posts p WHERE p.tag_id = t.id) AS post_count,
           t.created_at, t.updated_at
    FROM tags t
"#;

const CONFLICT_MESSAGE: &str = "Tag with this name or slug already exists";

#[derive(Debug, sqlx::FromRow)]
struct TagRow {
    id: Uuid,
    name: String,
    slug: String,
    description: Option<String>,
    color: String,
    is_active: bool,
    post_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TagRow {
    fn into_tag(self) -> Tag {
        Tag {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            color: self.color,
            is_active: self.is_active,
            post_count: self.post_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgTagRepository {
    pool: PgPool,
}

impl PgTagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn find_all(&self, active_only: bool) -> Result<Vec<Tag>, AppError> {
        let rows = sqlx::query_as::<_, TagRow>(&format!(
            "{SELECT_TAG} WHERE ($1 = FALSE OR t.is_active) ORDER BY t.created_at DESC"
        ))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TagRow::into_tag).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, AppError> {
        let row = sqlx::query_as::<_, TagRow>(&format!("{SELECT_TAG} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TagRow::into_tag))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, AppError> {
        let row = sqlx::query_as::<_, TagRow>(&format!("{SELECT_TAG} WHERE t.slug = $1"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TagRow::into_tag))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, AppError> {
        let row = sqlx::query_as::<_, TagRow>(&format!("{SELECT_TAG} WHERE t.name = $1"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TagRow::into_tag))
    }

    async fn create(&self, tag: &Tag) -> Result<Tag, AppError> {
        sqlx::query(
            r#"
            INSERT INTO tags (id, name, slug, description, color, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(tag.id)
        .bind(&tag.name)
        .bind(&tag.slug)
        .bind(&tag.description)
        .bind(&tag.color)
        .bind(tag.is_active)
        .bind(tag.created_at)
        .bind(tag.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, CONFLICT_MESSAGE))?;

        self.find_by_id(tag.id)
            .await?
            .ok_or_else(|| AppError::Internal("Created tag could not be read back".into()))
    }

    async fn update(&self, tag: &Tag) -> Result<Tag, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE tags
            SET name = $2, slug = $3, description = $4, color = $5,
                is_active = $6, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(tag.id)
        .bind(&tag.name)
        .bind(&tag.slug)
        .bind(&tag.description)
        .bind(&tag.color)
        .bind(tag.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, CONFLICT_MESSAGE))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tag not found".into()));
        }

        self.find_by_id(tag.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tag not found".into()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tag not found".into()));
        }

        Ok(())
    }
}
