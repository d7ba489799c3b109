//! Public Blog Service
//!
//! Read-only consumer feed of published, active posts, using the consumer
//! category naming instead of the admin post type.

use std::sync::Arc;

use async_trait::async_trait;

use super::blog_post_service::BlogError;
use crate::application::dto::request::PublicBlogQuery;
use crate::application::dto::response::PublicBlogPostResponse;
use crate::domain::{BlogPostFilter, BlogPostRepository, ConsumerCategory};
use crate::shared::pagination::{Page, PageRequest};

#[async_trait]
pub trait PublicBlogService: Send + Sync {
    async fn list_posts(
        &self,
        query: &PublicBlogQuery,
    ) -> Result<Page<PublicBlogPostResponse>, BlogError>;

    /// 404 unless the post is published and active
    async fn get_post(&self, slug: &str) -> Result<PublicBlogPostResponse, BlogError>;
}

pub struct PublicBlogServiceImpl<P>
where
    P: BlogPostRepository,
{
    post_repo: Arc<P>,
}

impl<P> PublicBlogServiceImpl<P>
where
    P: BlogPostRepository,
{
    pub fn new(post_repo: Arc<P>) -> Self {
        Self { post_repo }
    }
}

#[async_trait]
impl<P> PublicBlogService for PublicBlogServiceImpl<P>
where
    P: BlogPostRepository + 'static,
{
    async fn list_posts(
        &self,
        query: &PublicBlogQuery,
    ) -> Result<Page<PublicBlogPostResponse>, BlogError> {
        let filter = BlogPostFilter {
            search: query.search.clone(),
            post_type: query
                .category
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .map(|c| ConsumerCategory::from_str(c).to_post_type()),
            ..BlogPostFilter::public()
        };
        let page = PageRequest::new(query.page, query.limit);

        let (posts, total) = self.post_repo.find_page(&filter, page).await?;
        Ok(Page::new(posts, total, page).map(PublicBlogPostResponse::from))
    }

    async fn get_post(&self, slug: &str) -> Result<PublicBlogPostResponse, BlogError> {
        self.post_repo
            .find_by_slug(slug)
            .await?
            .filter(|post| post.is_publicly_visible())
            .map(PublicBlogPostResponse::from)
            .ok_or(BlogError::NotFound)
    }
}
