//! Tag Service

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::category_service::CatalogError;
use crate::application::dto::request::{CreateTagRequest, UpdateTagRequest};
use crate::domain::{Tag, TagRepository};

#[async_trait]
pub trait TagService: Send + Sync {
    async fn create(&self, request: &CreateTagRequest) -> Result<Tag, CatalogError>;

    async fn find_all(&self) -> Result<Vec<Tag>, CatalogError>;

    async fn find_active(&self) -> Result<Vec<Tag>, CatalogError>;

    async fn find_one(&self, id: Uuid) -> Result<Tag, CatalogError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Tag, CatalogError>;

    async fn update(&self, id: Uuid, request: &UpdateTagRequest) -> Result<Tag, CatalogError>;

    async fn remove(&self, id: Uuid) -> Result<(), CatalogError>;
}

pub struct TagServiceImpl<R>
where
    R: TagRepository,
{
    repo: Arc<R>,
}

impl<R> TagServiceImpl<R>
where
    R: TagRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> TagService for TagServiceImpl<R>
where
    R: TagRepository + 'static,
{
    async fn create(&self, request: &CreateTagRequest) -> Result<Tag, CatalogError> {
        let name = request.name.trim();
        if self.repo.find_by_name(name).await?.is_some()
            || self.repo.find_by_slug(&request.slug).await?.is_some()
        {
            return Err(CatalogError::Conflict(
                "Tag with this name or slug already exists".into(),
            ));
        }

        let mut tag = Tag::new(name.to_string(), request.slug.clone());
        tag.description = request.description.clone();
        if let Some(color) = &request.color {
            tag.color = color.to_lowercase();
        }
        tag.is_active = request.is_active.unwrap_or(true);

        Ok(self.repo.create(&tag).await?)
    }

    async fn find_all(&self) -> Result<Vec<Tag>, CatalogError> {
        Ok(self.repo.find_all(false).await?)
    }

    async fn find_active(&self) -> Result<Vec<Tag>, CatalogError> {
        Ok(self.repo.find_all(true).await?)
    }

    async fn find_one(&self, id: Uuid) -> Result<Tag, CatalogError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound("Tag"))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Tag, CatalogError> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or(CatalogError::NotFound("Tag"))
    }

    async fn update(&self, id: Uuid, request: &UpdateTagRequest) -> Result<Tag, CatalogError> {
        let mut tag = self.find_one(id).await?;

        if let Some(name) = request.name.as_deref().map(str::trim) {
            if name != tag.name {
                if self.repo.find_by_name(name).await?.is_some() {
                    return Err(CatalogError::Conflict(
                        "Tag with this name already exists".into(),
                    ));
                }
                tag.name = name.to_string();
            }
        }
        if let Some(slug) = &request.slug {
            if *slug != tag.slug {
                if self.repo.find_by_slug(slug).await?.is_some() {
                    return Err(CatalogError::Conflict(
                        "Tag with this slug already exists".into(),
                    ));
                }
                tag.slug = slug.clone();
            }
        }
        if let Some(description) = &request.description {
            tag.description = Some(description.clone());
        }
        if let Some(color) = &request.color {
            tag.color = color.to_lowercase();
        }
        if let Some(is_active) = request.is_active {
            tag.is_active = is_active;
        }
        tag.updated_at = Utc::now();

        Ok(self.repo.update(&tag).await?)
    }

    async fn remove(&self, id: Uuid) -> Result<(), CatalogError> {
        self.find_one(id).await?;
        self.repo.delete(id).await?;
        Ok(())
    }
}
