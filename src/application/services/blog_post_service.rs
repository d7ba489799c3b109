//! Blog Post Service
//!
//! Admin CRUD over posts, the draft / published / archived workflow,
//! counters and dashboard statistics.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::request::{
    BlogPostQuery, CreateBlogPostRequest, UpdateBlogPostRequest,
};
use crate::domain::{
    BlogPost, BlogPostFilter, BlogPostRepository, BlogPostStats, BlogPostStatus, BlogPostType,
    CategoryRepository, SortField, SortOrder, TagRepository, UserRepository,
};
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

#[async_trait]
pub trait BlogPostService: Send + Sync {
    /// Create a post; the author defaults to `acting_user_id`
    async fn create(
        &self,
        request: &CreateBlogPostRequest,
        acting_user_id: Uuid,
    ) -> Result<BlogPost, BlogError>;

    async fn find_all(&self, query: &BlogPostQuery) -> Result<Page<BlogPost>, BlogError>;

    async fn find_one(&self, id: Uuid) -> Result<BlogPost, BlogError>;

    async fn find_by_slug(&self, slug: &str) -> Result<BlogPost, BlogError>;

    async fn update(&self, id: Uuid, request: &UpdateBlogPostRequest)
        -> Result<BlogPost, BlogError>;

    async fn publish(&self, id: Uuid) -> Result<BlogPost, BlogError>;

    async fn archive(&self, id: Uuid) -> Result<BlogPost, BlogError>;

    async fn increment_view_count(&self, id: Uuid) -> Result<(), BlogError>;

    async fn increment_like_count(&self, id: Uuid) -> Result<(), BlogError>;

    async fn remove(&self, id: Uuid) -> Result<(), BlogError>;

    async fn statistics(&self) -> Result<BlogPostStats, BlogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    #[error("Blog post not found")]
    NotFound,

    #[error("Blog post with this slug already exists")]
    SlugTaken,

    #[error("{0}")]
    InvalidReference(String),

    #[error("{0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<BlogError> for AppError {
    fn from(e: BlogError) -> Self {
        match e {
            BlogError::NotFound => AppError::NotFound("Blog post not found".into()),
            BlogError::SlugTaken => {
                AppError::Conflict("Blog post with this slug already exists".into())
            }
            BlogError::InvalidReference(msg) | BlogError::InvalidQuery(msg) => {
                AppError::BadRequest(msg)
            }
            BlogError::Repository(e) => e,
        }
    }
}

/// Translate listing query parameters into a repository filter.
pub fn filter_from_query(query: &BlogPostQuery) -> Result<BlogPostFilter, BlogError> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| {
            BlogPostStatus::parse(s)
                .ok_or_else(|| BlogError::InvalidQuery(format!("Invalid status: {}", s)))
        })
        .transpose()?;

    let post_type = query
        .post_type
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| {
            BlogPostType::parse(s)
                .ok_or_else(|| BlogError::InvalidQuery(format!("Invalid type: {}", s)))
        })
        .transpose()?;

    let sort_by = match query.sort_by.as_deref().filter(|s| !s.is_empty()) {
        Some(field) => SortField::parse(field)
            .ok_or_else(|| BlogError::InvalidQuery(format!("Invalid sort field: {}", field)))?,
        None => SortField::default(),
    };

    let sort_order = match query.sort_order.as_deref().filter(|s| !s.is_empty()) {
        Some(order) => SortOrder::parse(order)
            .ok_or_else(|| BlogError::InvalidQuery(format!("Invalid sort order: {}", order)))?,
        None => SortOrder::default(),
    };

    Ok(BlogPostFilter {
        search: query.search.clone(),
        status,
        post_type,
        category_id: query.category_id,
        tag_id: query.tag_id,
        author_id: query.author_id,
        is_active: query.is_active,
        sort_by,
        sort_order,
    })
}

fn map_slug_conflict(e: AppError) -> BlogError {
    match e {
        AppError::Conflict(_) => BlogError::SlugTaken,
        e => BlogError::Repository(e),
    }
}

pub struct BlogPostServiceImpl<P, C, T, U>
where
    P: BlogPostRepository,
    C: CategoryRepository,
    T: TagRepository,
    U: UserRepository,
{
    post_repo: Arc<P>,
    category_repo: Arc<C>,
    tag_repo: Arc<T>,
    user_repo: Arc<U>,
}

impl<P, C, T, U> BlogPostServiceImpl<P, C, T, U>
where
    P: BlogPostRepository,
    C: CategoryRepository,
    T: TagRepository,
    U: UserRepository,
{
    pub fn new(post_repo: Arc<P>, category_repo: Arc<C>, tag_repo: Arc<T>, user_repo: Arc<U>) -> Self {
        Self {
            post_repo,
            category_repo,
            tag_repo,
            user_repo,
        }
    }

    async fn ensure_references(
        &self,
        category_id: Option<Uuid>,
        tag_id: Option<Uuid>,
    ) -> Result<(), BlogError> {
        if let Some(id) = category_id {
            if self.category_repo.find_by_id(id).await?.is_none() {
                return Err(BlogError::InvalidReference("Category not found".into()));
            }
        }
        if let Some(id) = tag_id {
            if self.tag_repo.find_by_id(id).await?.is_none() {
                return Err(BlogError::InvalidReference("Tag not found".into()));
            }
        }
        Ok(())
    }

    async fn ensure_slug_free(&self, slug: &str) -> Result<(), BlogError> {
        if self.post_repo.find_by_slug(slug).await?.is_some() {
            return Err(BlogError::SlugTaken);
        }
        Ok(())
    }

    async fn transition(&self, id: Uuid, status: BlogPostStatus) -> Result<BlogPost, BlogError> {
        let mut post = self.load(id).await?;
        let now = Utc::now();
        post.transition_to(status, now);
        post.updated_at = now;

        let saved = self.post_repo.update(&post).await?;
        tracing::info!(post_id = %saved.id, status = %saved.status, "Blog post status changed");
        Ok(saved)
    }

    async fn load(&self, id: Uuid) -> Result<BlogPost, BlogError> {
        self.post_repo
            .find_by_id(id)
            .await?
            .ok_or(BlogError::NotFound)
    }
}

#[async_trait]
impl<P, C, T, U> BlogPostService for BlogPostServiceImpl<P, C, T, U>
where
    P: BlogPostRepository + 'static,
    C: CategoryRepository + 'static,
    T: TagRepository + 'static,
    U: UserRepository + 'static,
{
    async fn create(
        &self,
        request: &CreateBlogPostRequest,
        acting_user_id: Uuid,
    ) -> Result<BlogPost, BlogError> {
        self.ensure_slug_free(&request.slug).await?;
        self.ensure_references(request.category_id, request.tag_id)
            .await?;

        let author_id = match request.author_id {
            Some(id) if id != acting_user_id => {
                if self.user_repo.find_by_id(id).await?.is_none() {
                    return Err(BlogError::InvalidReference("Author not found".into()));
                }
                id
            }
            _ => acting_user_id,
        };

        let mut post = BlogPost::new(
            request.title.trim().to_string(),
            request.slug.clone(),
            request.content.clone(),
            author_id,
        );
        post.excerpt = request.excerpt.clone();
        post.featured_image = request.featured_image.clone();
        post.post_type = request.post_type.unwrap_or_default();
        post.seo_metadata = request.seo_metadata.clone();
        post.category_id = request.category_id;
        post.tag_id = request.tag_id;
        post.is_active = request.is_active.unwrap_or(true);
        post.transition_to(request.status.unwrap_or_default(), post.created_at);

        let created = self
            .post_repo
            .create(&post)
            .await
            .map_err(map_slug_conflict)?;

        tracing::info!(post_id = %created.id, status = %created.status, "Blog post created");
        Ok(created)
    }

    async fn find_all(&self, query: &BlogPostQuery) -> Result<Page<BlogPost>, BlogError> {
        let filter = filter_from_query(query)?;
        let page = PageRequest::new(query.page, query.limit);

        let (posts, total) = self.post_repo.find_page(&filter, page).await?;
        Ok(Page::new(posts, total, page))
    }

    async fn find_one(&self, id: Uuid) -> Result<BlogPost, BlogError> {
        self.load(id).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<BlogPost, BlogError> {
        self.post_repo
            .find_by_slug(slug)
            .await?
            .ok_or(BlogError::NotFound)
    }

    async fn update(
        &self,
        id: Uuid,
        request: &UpdateBlogPostRequest,
    ) -> Result<BlogPost, BlogError> {
        let mut post = self.load(id).await?;

        if let Some(slug) = &request.slug {
            if *slug != post.slug {
                self.ensure_slug_free(slug).await?;
                post.slug = slug.clone();
            }
        }
        self.ensure_references(
            request.category_id.filter(|id| Some(*id) != post.category_id),
            request.tag_id.filter(|id| Some(*id) != post.tag_id),
        )
        .await?;

        if let Some(title) = &request.title {
            post.title = title.trim().to_string();
        }
        if let Some(excerpt) = &request.excerpt {
            post.excerpt = Some(excerpt.clone());
        }
        if let Some(content) = &request.content {
            post.content = content.clone();
        }
        if let Some(image) = &request.featured_image {
            post.featured_image = Some(image.clone());
        }
        if let Some(post_type) = request.post_type {
            post.post_type = post_type;
        }
        if let Some(seo) = &request.seo_metadata {
            post.seo_metadata = Some(seo.clone());
        }
        if let Some(category_id) = request.category_id {
            post.category_id = Some(category_id);
        }
        if let Some(tag_id) = request.tag_id {
            post.tag_id = Some(tag_id);
        }
        if let Some(is_active) = request.is_active {
            post.is_active = is_active;
        }

        let now = Utc::now();
        if let Some(status) = request.status {
            post.transition_to(status, now);
        }
        post.updated_at = now;

        self.post_repo
            .update(&post)
            .await
            .map_err(map_slug_conflict)
    }

    async fn publish(&self, id: Uuid) -> Result<BlogPost, BlogError> {
        self.transition(id, BlogPostStatus::Published).await
    }

    async fn archive(&self, id: Uuid) -> Result<BlogPost, BlogError> {
        self.transition(id, BlogPostStatus::Archived).await
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<(), BlogError> {
        if !self.post_repo.increment_view_count(id).await? {
            return Err(BlogError::NotFound);
        }
        Ok(())
    }

    async fn increment_like_count(&self, id: Uuid) -> Result<(), BlogError> {
        if !self.post_repo.increment_like_count(id).await? {
            return Err(BlogError::NotFound);
        }
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<(), BlogError> {
        self.load(id).await?;
        self.post_repo.delete(id).await?;
        tracing::info!(post_id = %id, "Blog post deleted");
        Ok(())
    }

    async fn statistics(&self) -> Result<BlogPostStats, BlogError> {
        Ok(self.post_repo.statistics().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Category, MockBlogPostRepository, MockCategoryRepository, MockTagRepository,
        MockUserRepository,
    };
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    type Service = BlogPostServiceImpl<
        MockBlogPostRepository,
        MockCategoryRepository,
        MockTagRepository,
        MockUserRepository,
    >;

    fn service(posts: MockBlogPostRepository, categories: MockCategoryRepository) -> Service {
        BlogPostServiceImpl::new(
            Arc::new(posts),
            Arc::new(categories),
            Arc::new(MockTagRepository::new()),
            Arc::new(MockUserRepository::new()),
        )
    }

    fn create_request(status: Option<BlogPostStatus>) -> CreateBlogPostRequest {
        CreateBlogPostRequest {
            title: "Heart health".into(),
            slug: "heart-health".into(),
            excerpt: None,
            content: "Eat well".into(),
            featured_image: None,
            status,
            post_type: None,
            seo_metadata: None,
            author_id: None,
            category_id: None,
            tag_id: None,
            is_active: None,
        }
    }

    fn published_post(published_at: chrono::DateTime<Utc>) -> BlogPost {
        let mut post = BlogPost::new("T".into(), "t".into(), "C".into(), Uuid::new_v4());
        post.status = BlogPostStatus::Published;
        post.published_at = Some(published_at);
        post
    }

    #[tokio::test]
    async fn test_create_draft_has_no_published_at() {
        let mut posts = MockBlogPostRepository::new();
        posts.expect_find_by_slug().returning(|_| Ok(None));
        posts.expect_create().returning(|p| Ok(p.clone()));
        let admin = Uuid::new_v4();

        let post = service(posts, MockCategoryRepository::new())
            .create(&create_request(None), admin)
            .await
            .unwrap();

        assert_eq!(post.status, BlogPostStatus::Draft);
        assert_eq!(post.author_id, admin);
        assert!(post.published_at.is_none());
    }

    #[tokio::test]
    async fn test_create_published_sets_published_at() {
        let mut posts = MockBlogPostRepository::new();
        posts.expect_find_by_slug().returning(|_| Ok(None));
        posts.expect_create().returning(|p| Ok(p.clone()));

        let post = service(posts, MockCategoryRepository::new())
            .create(&create_request(Some(BlogPostStatus::Published)), Uuid::new_v4())
            .await
            .unwrap();

        assert!(post.published_at.is_some());
    }

    #[tokio::test]
    async fn test_create_with_taken_slug() {
        let mut posts = MockBlogPostRepository::new();
        posts
            .expect_find_by_slug()
            .returning(|_| Ok(Some(published_post(Utc::now()))));

        let result = service(posts, MockCategoryRepository::new())
            .create(&create_request(None), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(BlogError::SlugTaken)));
    }

    #[tokio::test]
    async fn test_create_with_unknown_category() {
        let mut posts = MockBlogPostRepository::new();
        posts.expect_find_by_slug().returning(|_| Ok(None));
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(|_| Ok(None));

        let mut request = create_request(None);
        request.category_id = Some(Uuid::new_v4());

        let err: AppError = service(posts, categories)
            .create(&request, Uuid::new_v4())
            .await
            .unwrap_err()
            .into();

        assert_eq!(err.to_string(), "Bad request: Category not found");
    }

    #[tokio::test]
    async fn test_create_with_known_category() {
        let mut posts = MockBlogPostRepository::new();
        posts.expect_find_by_slug().returning(|_| Ok(None));
        posts.expect_create().returning(|p| Ok(p.clone()));
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_id()
            .returning(|_| Ok(Some(Category::new("Tim mạch".into(), "tim-mach".into()))));

        let category_id = Uuid::new_v4();
        let mut request = create_request(None);
        request.category_id = Some(category_id);

        let post = service(posts, categories)
            .create(&request, Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(post.category_id, Some(category_id));
    }

    #[tokio::test]
    async fn test_update_keeps_original_published_at() {
        let first = Utc::now() - Duration::days(10);
        let existing = published_post(first);
        let id = existing.id;
        let mut posts = MockBlogPostRepository::new();
        posts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        posts.expect_update().returning(|p| Ok(p.clone()));

        let patch = UpdateBlogPostRequest {
            title: Some("New title".into()),
            status: Some(BlogPostStatus::Published),
            ..Default::default()
        };

        let updated = service(posts, MockCategoryRepository::new())
            .update(id, &patch)
            .await
            .unwrap();

        assert_eq!(updated.title, "New title");
        assert_eq!(updated.content, "C");
        assert_eq!(updated.published_at, Some(first));
    }

    #[tokio::test]
    async fn test_publish_draft() {
        let draft = BlogPost::new("T".into(), "t".into(), "C".into(), Uuid::new_v4());
        let id = draft.id;
        let mut posts = MockBlogPostRepository::new();
        posts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(draft.clone())));
        posts.expect_update().returning(|p| Ok(p.clone()));

        let post = service(posts, MockCategoryRepository::new())
            .publish(id)
            .await
            .unwrap();

        assert_eq!(post.status, BlogPostStatus::Published);
        assert!(post.published_at.is_some());
    }

    #[tokio::test]
    async fn test_archive_missing_post() {
        let mut posts = MockBlogPostRepository::new();
        posts.expect_find_by_id().returning(|_| Ok(None));

        let result = service(posts, MockCategoryRepository::new())
            .archive(Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(BlogError::NotFound)));
    }

    #[tokio::test]
    async fn test_view_count_on_missing_post() {
        let mut posts = MockBlogPostRepository::new();
        posts.expect_increment_view_count().returning(|_| Ok(false));

        let result = service(posts, MockCategoryRepository::new())
            .increment_view_count(Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(BlogError::NotFound)));
    }

    #[tokio::test]
    async fn test_like_count_on_missing_post() {
        let mut posts = MockBlogPostRepository::new();
        posts.expect_increment_like_count().returning(|_| Ok(false));

        let result = service(posts, MockCategoryRepository::new())
            .increment_like_count(Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(BlogError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_to_taken_slug() {
        let existing = published_post(Utc::now());
        let id = existing.id;
        let mut posts = MockBlogPostRepository::new();
        posts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        posts
            .expect_find_by_slug()
            .withf(|slug| slug == "taken-slug")
            .returning(|_| Ok(Some(published_post(Utc::now()))));
        posts.expect_update().never();

        let patch = UpdateBlogPostRequest {
            slug: Some("taken-slug".into()),
            ..Default::default()
        };

        let err: AppError = service(posts, MockCategoryRepository::new())
            .update(id, &patch)
            .await
            .unwrap_err()
            .into();

        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_remove_missing_post() {
        let mut posts = MockBlogPostRepository::new();
        posts.expect_find_by_id().returning(|_| Ok(None));
        posts.expect_delete().never();

        let err: AppError = service(posts, MockCategoryRepository::new())
            .remove(Uuid::new_v4())
            .await
            .unwrap_err()
            .into();

        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_remove_existing_post() {
        let existing = published_post(Utc::now());
        let id = existing.id;
        let mut posts = MockBlogPostRepository::new();
        posts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        posts
            .expect_delete()
            .withf(move |deleted| *deleted == id)
            .times(1)
            .returning(|_| Ok(()));

        service(posts, MockCategoryRepository::new())
            .remove(id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_statistics_passthrough() {
        let expected = BlogPostStats {
            total: 7,
            published: 4,
            draft: 2,
            archived: 1,
            total_views: 120,
            total_likes: 9,
        };
        let stats = expected.clone();
        let mut posts = MockBlogPostRepository::new();
        posts
            .expect_statistics()
            .returning(move || Ok(stats.clone()));

        let result = service(posts, MockCategoryRepository::new())
            .statistics()
            .await
            .unwrap();

        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_statistics_on_empty_table() {
        let mut posts = MockBlogPostRepository::new();
        posts
            .expect_statistics()
            .returning(|| Ok(BlogPostStats::default()));

        let result = service(posts, MockCategoryRepository::new())
            .statistics()
            .await
            .unwrap();

        assert_eq!(result.total_views, 0);
        assert_eq!(result.total_likes, 0);
    }

    #[tokio::test]
    async fn test_find_all_builds_page() {
        let mut posts = MockBlogPostRepository::new();
        posts
            .expect_find_page()
            .withf(|filter, page| {
                filter.sort_by == SortField::Title
                    && filter.sort_order == SortOrder::Asc
                    && filter.status == Some(BlogPostStatus::Published)
                    && page.page == 2
                    && page.limit == 5
            })
            .returning(|_, _| Ok((vec![], 12)));

        let query = BlogPostQuery {
            status: Some("published".into()),
            sort_by: Some("title".into()),
            sort_order: Some("asc".into()),
            page: Some(2),
            limit: Some(5),
            ..Default::default()
        };

        let page = service(posts, MockCategoryRepository::new())
            .find_all(&query)
            .await
            .unwrap();

        assert_eq!(page.total, 12);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 2);
    }

    #[test_case(BlogPostQuery { sort_by: Some("password".into()), ..Default::default() } ; "unknown sort field")]
    #[test_case(BlogPostQuery { sort_order: Some("up".into()), ..Default::default() } ; "unknown order")]
    #[test_case(BlogPostQuery { status: Some("deleted".into()), ..Default::default() } ; "unknown status")]
    #[test_case(BlogPostQuery { post_type: Some("sports".into()), ..Default::default() } ; "unknown type")]
    fn test_invalid_query_rejected(query: BlogPostQuery) {
        let err: AppError = filter_from_query(&query).unwrap_err().into();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_default_query_filter() {
        let filter = filter_from_query(&BlogPostQuery::default()).unwrap();
        assert_eq!(filter, BlogPostFilter::default());
    }
}
