//! Blog post entity, query types and repository trait.
//!
//! Maps to the `blog_posts` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;
use crate::shared::pagination::PageRequest;

/// Publication status matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlogPostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl BlogPostStatus {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Parse a client-supplied status, rejecting unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl std::fmt::Display for BlogPostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Editorial topic of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlogPostType {
    #[default]
    Health,
    Medicine,
    Wellness,
    DiseasePrevention,
    Nutrition,
}

impl BlogPostType {
    pub fn from_str(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Parse a client-supplied type; accepts upper-case enum names too.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "health" => Some(Self::Health),
            "medicine" => Some(Self::Medicine),
            "wellness" => Some(Self::Wellness),
            "disease_prevention" => Some(Self::DiseasePrevention),
            "nutrition" => Some(Self::Nutrition),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Medicine => "medicine",
            Self::Wellness => "wellness",
            Self::DiseasePrevention => "disease_prevention",
            Self::Nutrition => "nutrition",
        }
    }
}

impl std::fmt::Display for BlogPostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// SEO fields stored as JSONB.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

/// Author fields embedded in post reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Category or tag fields embedded in post reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// A blog post.
///
/// Maps to the `blog_posts` table:
/// - id: UUID PRIMARY KEY
/// - title: VARCHAR(255) NOT NULL
/// - slug: VARCHAR(255) NOT NULL UNIQUE
/// - excerpt: TEXT NULL
/// - content: TEXT NOT NULL
/// - featured_image: TEXT NULL
/// - status: VARCHAR(20) NOT NULL DEFAULT 'draft'
/// - type: VARCHAR(30) NOT NULL DEFAULT 'health'
/// - seo_metadata: JSONB NULL
/// - view_count / like_count: BIGINT NOT NULL DEFAULT 0
/// - published_at: TIMESTAMPTZ NULL
/// - is_active: BOOLEAN NOT NULL DEFAULT TRUE
/// - author_id: UUID NOT NULL REFERENCES users(id)
/// - category_id: UUID NULL REFERENCES categories(id) ON DELETE SET NULL
/// - tag_id: UUID NULL REFERENCES tags(id) ON DELETE SET NULL
/// - created_at / updated_at: TIMESTAMPTZ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image: Option<String>,
    pub status: BlogPostStatus,
    #[serde(rename = "type")]
    pub post_type: BlogPostType,
    pub seo_metadata: Option<SeoMetadata>,
    pub view_count: i64,
    pub like_count: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Populated on reads
    pub author: Option<AuthorSummary>,
    pub category: Option<TaxonomySummary>,
    pub tag: Option<TaxonomySummary>,
}

impl BlogPost {
    /// A fresh draft with no relations loaded.
    pub fn new(title: String, slug: String, content: String, author_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title,
            slug,
            excerpt: None,
            content,
            featured_image: None,
            status: BlogPostStatus::Draft,
            post_type: BlogPostType::Health,
            seo_metadata: None,
            view_count: 0,
            like_count: 0,
            published_at: None,
            is_active: true,
            author_id,
            category_id: None,
            tag_id: None,
            created_at: now,
            updated_at: now,
            author: None,
            category: None,
            tag: None,
        }
    }

    /// Move to `status`. Entering `Published` from any other status stamps
    /// `published_at`; staying published keeps the original timestamp.
    pub fn transition_to(&mut self, status: BlogPostStatus, now: DateTime<Utc>) {
        if status == BlogPostStatus::Published && self.status != BlogPostStatus::Published {
            self.published_at = Some(now);
        }
        self.status = status;
    }

    /// Visible on the public feed.
    pub fn is_publicly_visible(&self) -> bool {
        self.status == BlogPostStatus::Published && self.is_active
    }
}

/// Columns a post listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    PublishedAt,
    Title,
    ViewCount,
    LikeCount,
}

impl SortField {
    /// Accepts both `created_at` and `createdAt` spellings.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created_at" | "createdAt" => Some(Self::CreatedAt),
            "updated_at" | "updatedAt" => Some(Self::UpdatedAt),
            "published_at" | "publishedAt" => Some(Self::PublishedAt),
            "title" => Some(Self::Title),
            "view_count" | "viewCount" => Some(Self::ViewCount),
            "like_count" | "likeCount" => Some(Self::LikeCount),
            _ => None,
        }
    }

    /// Fully qualified column for ORDER BY.
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "p.created_at",
            Self::UpdatedAt => "p.updated_at",
            Self::PublishedAt => "p.published_at",
            Self::Title => "p.title",
            Self::ViewCount => "p.view_count",
            Self::LikeCount => "p.like_count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Filters for post listings. Every `Some` narrows the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPostFilter {
    pub search: Option<String>,
    pub status: Option<BlogPostStatus>,
    pub post_type: Option<BlogPostType>,
    pub category_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl BlogPostFilter {
    /// Filter for the public feed: published and active only.
    pub fn public() -> Self {
        Self {
            status: Some(BlogPostStatus::Published),
            is_active: Some(true),
            sort_by: SortField::PublishedAt,
            ..Self::default()
        }
    }

    /// The search term wrapped for ILIKE, or None when blank.
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                let escaped = s
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");
                format!("%{}%", escaped)
            })
    }
}

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPostStats {
    pub total: i64,
    pub published: i64,
    pub draft: i64,
    pub archived: i64,
    pub total_views: i64,
    pub total_likes: i64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    /// One page of posts matching `filter`, plus the total match count.
    async fn find_page(
        &self,
        filter: &BlogPostFilter,
        page: PageRequest,
    ) -> Result<(Vec<BlogPost>, i64), AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, AppError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, AppError>;

    async fn create(&self, post: &BlogPost) -> Result<BlogPost, AppError>;

    async fn update(&self, post: &BlogPost) -> Result<BlogPost, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Returns false when no post has this id.
    async fn increment_view_count(&self, id: Uuid) -> Result<bool, AppError>;

    /// Returns false when no post has this id.
    async fn increment_like_count(&self, id: Uuid) -> Result<bool, AppError>;

    async fn statistics(&self) -> Result<BlogPostStats, AppError>;
}
