//! PostgreSQL implementation of CategoryRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Category, CategoryRepository};
use crate::shared::error::{conflict_on_unique, AppError};

/// Reads carry a live post count.
const SELECT_CATEGORY: &str = r#"
    SELECT c.id, c.name, c.slug, c.description, c.image, c.is_active, c.sort_order,
           (SELECT COUNT(*) FROM blog_posts p WHERE p.category_id = c.id) AS post_count,
           c.created_at, c.updated_at
    FROM categories c
"#;

const CONFLICT_MESSAGE: &str = "Category with this name or slug already exists";

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    slug: String,
    description: Option<String>,
    image: Option<String>,
    is_active: bool,
    sort_order: i32,
    post_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CategoryRow {
    fn into_category(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            image: self.image,
            is_active: self.is_active,
            sort_order: self.sort_order,
            post_count: self.post_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one_where(&self, condition: &str, value: &str) -> Result<Option<Category>, AppError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!("{SELECT_CATEGORY} WHERE {condition}"))
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CategoryRow::into_category))
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_all(&self, active_only: bool) -> Result<Vec<Category>, AppError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "{SELECT_CATEGORY} WHERE ($1 = FALSE OR c.is_active) ORDER BY c.sort_order ASC, c.created_at DESC"
        ))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CategoryRow::into_category).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!("{SELECT_CATEGORY} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CategoryRow::into_category))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, AppError> {
        self.find_one_where("c.slug = $1", slug).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        self.find_one_where("c.name = $1", name).await
    }

    async fn create(&self, category: &Category) -> Result<Category, AppError> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug, description, image, is_active, sort_order, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(&category.image)
        .bind(category.is_active)
        .bind(category.sort_order)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, CONFLICT_MESSAGE))?;

        self.find_by_id(category.id)
            .await?
            .ok_or_else(|| AppError::Internal("Created category could not be read back".into()))
    }

    async fn update(&self, category: &Category) -> Result<Category, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, slug = $3, description = $4, image = $5,
                is_active = $6, sort_order = $7, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(&category.image)
        .bind(category.is_active)
        .bind(category.sort_order)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, CONFLICT_MESSAGE))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category not found".into()));
        }

        self.find_by_id(category.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".into()))
    }

    /// Posts in the category keep existing with `category_id` cleared (FK `ON DELETE SET NULL`).
    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category not found".into()));
        }

        Ok(())
    }
}
