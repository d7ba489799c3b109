//! Blog Post Repository Implementation
//!
//! Reads join the author, category and tag so responses can embed their
//! summaries. Listing filters are assembled with `QueryBuilder`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::{
    AuthorSummary, BlogPost, BlogPostFilter, BlogPostRepository, BlogPostStats, BlogPostStatus,
    BlogPostType, SeoMetadata, TaxonomySummary,
};
use crate::shared::error::{conflict_on_unique, AppError};
use crate::shared::pagination::PageRequest;

const SELECT_POST: &str = r#"
    SELECT p.id, p.title, p.slug, p.excerpt, p.content, p.featured_image, p.status,
           p.type AS post_type, p.seo_metadata, p.view_count, p.like_count, p.published_at,
           p.is_active, p.author_id, p.category_id, p.tag_id, p.created_at, p.updated_at,
           u.email AS author_email, u.first_name AS author_first_name, u.last_name AS author_last_name,
           c.name AS category_name, c.slug AS category_slug,
           t.name AS tag_name, t.slug AS tag_slug
    FROM blog_posts p
    LEFT JOIN users u ON u.id = p.author_id
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN tags t ON t.id = p.tag_id
"#;

const SLUG_CONFLICT: &str = "Blog post with this slug already exists";

#[derive(Debug, sqlx::FromRow)]
struct BlogPostRow {
    id: Uuid,
    title: String,
    slug: String,
    excerpt: Option<String>,
    content: String,
    featured_image: Option<String>,
    status: String,
    post_type: String,
    seo_metadata: Option<Json<SeoMetadata>>,
    view_count: i64,
    like_count: i64,
    published_at: Option<DateTime<Utc>>,
    is_active: bool,
    author_id: Uuid,
    category_id: Option<Uuid>,
    tag_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_email: Option<String>,
    author_first_name: Option<String>,
    author_last_name: Option<String>,
    category_name: Option<String>,
    category_slug: Option<String>,
    tag_name: Option<String>,
    tag_slug: Option<String>,
}

impl BlogPostRow {
    fn into_post(self) -> BlogPost {
        let author = self.author_email.map(|email| AuthorSummary {
            id: self.author_id,
            email,
            first_name: self.author_first_name.unwrap_or_default(),
            last_name: self.author_last_name.unwrap_or_default(),
        });
        let category = taxonomy(self.category_id, self.category_name, self.category_slug);
        let tag = taxonomy(self.tag_id, self.tag_name, self.tag_slug);

        BlogPost {
            id: self.id,
            title: self.title,
            slug: self.slug,
            excerpt: self.excerpt,
            content: self.content,
            featured_image: self.featured_image,
            status: BlogPostStatus::from_str(&self.status),
            post_type: BlogPostType::from_str(&self.post_type),
            seo_metadata: self.seo_metadata.map(|Json(seo)| seo),
            view_count: self.view_count,
            like_count: self.like_count,
            published_at: self.published_at,
            is_active: self.is_active,
            author_id: self.author_id,
            category_id: self.category_id,
            tag_id: self.tag_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            author,
            category,
            tag,
        }
    }
}

fn taxonomy(id: Option<Uuid>, name: Option<String>, slug: Option<String>) -> Option<TaxonomySummary> {
    match (id, name, slug) {
        (Some(id), Some(name), Some(slug)) => Some(TaxonomySummary { id, name, slug }),
        _ => None,
    }
}

/// Append the WHERE clause for `filter` to a query over `blog_posts p`.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &BlogPostFilter) {
    builder.push(" WHERE TRUE");

    if let Some(pattern) = filter.search_pattern() {
        builder
            .push(" AND (p.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.content ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.excerpt ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status {
        builder.push(" AND p.status = ").push_bind(status.as_str());
    }
    if let Some(post_type) = filter.post_type {
        builder.push(" AND p.type = ").push_bind(post_type.as_str());
    }
    if let Some(category_id) = filter.category_id {
        builder.push(" AND p.category_id = ").push_bind(category_id);
    }
    if let Some(tag_id) = filter.tag_id {
        builder.push(" AND p.tag_id = ").push_bind(tag_id);
    }
    if let Some(author_id) = filter.author_id {
        builder.push(" AND p.author_id = ").push_bind(author_id);
    }
    if let Some(is_active) = filter.is_active {
        builder.push(" AND p.is_active = ").push_bind(is_active);
    }
}

#[derive(Clone)]
pub struct PgBlogPostRepository {
    pool: PgPool,
}

impl PgBlogPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn increment(&self, column: &str, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(&format!(
            "UPDATE blog_posts SET {column} = {column} + 1 WHERE id = $1"
        ))
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl BlogPostRepository for PgBlogPostRepository {
    async fn find_page(
        &self,
        filter: &BlogPostFilter,
        page: PageRequest,
    ) -> Result<(Vec<BlogPost>, i64), AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM blog_posts p");
        push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new(SELECT_POST);
        push_filters(&mut query, filter);
        // Column and direction come from closed enums, never from client text
        query
            .push(format!(
                " ORDER BY {} {} NULLS LAST, p.id {}",
                filter.sort_by.column(),
                filter.sort_order.as_sql(),
                filter.sort_order.as_sql()
            ))
            .push(" LIMIT ")
            .push_bind(i64::from(page.limit))
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<BlogPostRow> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok((rows.into_iter().map(BlogPostRow::into_post).collect(), total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, AppError> {
        let row = sqlx::query_as::<_, BlogPostRow>(&format!("{SELECT_POST} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(BlogPostRow::into_post))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, AppError> {
        let row = sqlx::query_as::<_, BlogPostRow>(&format!("{SELECT_POST} WHERE p.slug = $1"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(BlogPostRow::into_post))
    }

    async fn create(&self, post: &BlogPost) -> Result<BlogPost, AppError> {
        sqlx::query(
            r#"
            INSERT INTO blog_posts (
                id, title, slug, excerpt, content, featured_image, status, type, seo_metadata,
                view_count, like_count, published_at, is_active, author_id, category_id, tag_id,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.featured_image)
        .bind(post.status.as_str())
        .bind(post.post_type.as_str())
        .bind(post.seo_metadata.as_ref().map(Json))
        .bind(post.view_count)
        .bind(post.like_count)
        .bind(post.published_at)
        .bind(post.is_active)
        .bind(post.author_id)
        .bind(post.category_id)
        .bind(post.tag_id)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, SLUG_CONFLICT))?;

        self.find_by_id(post.id)
            .await?
            .ok_or_else(|| AppError::Internal("Created blog post could not be read back".into()))
    }

    async fn update(&self, post: &BlogPost) -> Result<BlogPost, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE blog_posts
            SET title = $2, slug = $3, excerpt = $4, content = $5, featured_image = $6,
                status = $7, type = $8, seo_metadata = $9, published_at = $10,
                is_active = $11, author_id = $12, category_id = $13, tag_id = $14,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.featured_image)
        .bind(post.status.as_str())
        .bind(post.post_type.as_str())
        .bind(post.seo_metadata.as_ref().map(Json))
        .bind(post.published_at)
        .bind(post.is_active)
        .bind(post.author_id)
        .bind(post.category_id)
        .bind(post.tag_id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, SLUG_CONFLICT))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Blog post not found".into()));
        }

        self.find_by_id(post.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog post not found".into()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Blog post not found".into()));
        }

        Ok(())
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<bool, AppError> {
        self.increment("view_count", id).await
    }

    async fn increment_like_count(&self, id: Uuid) -> Result<bool, AppError> {
        self.increment("like_count", id).await
    }

    async fn statistics(&self) -> Result<BlogPostStats, AppError> {
        let (total, published, draft, archived, total_views, total_likes) =
            sqlx::query_as::<_, (i64, i64, i64, i64, i64, i64)>(
                r#"
                SELECT COUNT(*),
                       COUNT(*) FILTER (WHERE status = 'published'),
                       COUNT(*) FILTER (WHERE status = 'draft'),
                       COUNT(*) FILTER (WHERE status = 'archived'),
                       COALESCE(SUM(view_count), 0)::BIGINT,
                       COALESCE(SUM(like_count), 0)::BIGINT
                FROM blog_posts
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(BlogPostStats {
            total,
            published,
            draft,
            archived,
            total_views,
            total_likes,
        })
    }
}
