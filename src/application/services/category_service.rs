//! Category Service
//!
//! Blog category management. Names and slugs are unique.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::request::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::domain::{Category, CategoryRepository};
use crate::shared::error::AppError;

/// Errors shared by the category and tag services
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
            CatalogError::Conflict(msg) => AppError::Conflict(msg),
            CatalogError::Repository(e) => e,
        }
    }
}

#[async_trait]
pub trait CategoryService: Send + Sync {
    async fn create(&self, request: &CreateCategoryRequest) -> Result<Category, CatalogError>;

    async fn find_all(&self) -> Result<Vec<Category>, CatalogError>;

    async fn find_active(&self) -> Result<Vec<Category>, CatalogError>;

    async fn find_one(&self, id: Uuid) -> Result<Category, CatalogError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Category, CatalogError>;

    async fn update(
        &self,
        id: Uuid,
        request: &UpdateCategoryRequest,
    ) -> Result<Category, CatalogError>;

    async fn remove(&self, id: Uuid) -> Result<(), CatalogError>;
}

pub struct CategoryServiceImpl<R>
where
    R: CategoryRepository,
{
    repo: Arc<R>,
}

impl<R> CategoryServiceImpl<R>
where
    R: CategoryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> CategoryService for CategoryServiceImpl<R>
where
    R: CategoryRepository + 'static,
{
    async fn create(&self, request: &CreateCategoryRequest) -> Result<Category, CatalogError> {
        let name = request.name.trim();
        if self.repo.find_by_name(name).await?.is_some()
            || self.repo.find_by_slug(&request.slug).await?.is_some()
        {
            return Err(CatalogError::Conflict(
                "Category with this name or slug already exists".into(),
            ));
        }

        let mut category = Category::new(name.to_string(), request.slug.clone());
        category.description = request.description.clone();
        category.image = request.image.clone();
        category.is_active = request.is_active.unwrap_or(true);
        category.sort_order = request.sort_order.unwrap_or(0);

        Ok(self.repo.create(&category).await?)
    }

    async fn find_all(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.repo.find_all(false).await?)
    }

    async fn find_active(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.repo.find_all(true).await?)
    }

    async fn find_one(&self, id: Uuid) -> Result<Category, CatalogError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound("Category"))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Category, CatalogError> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or(CatalogError::NotFound("Category"))
    }

    async fn update(
        &self,
        id: Uuid,
        request: &UpdateCategoryRequest,
    ) -> Result<Category, CatalogError> {
        let mut category = self.find_one(id).await?;

        if let Some(name) = request.name.as_deref().map(str::trim) {
            if name != category.name {
                if self.repo.find_by_name(name).await?.is_some() {
                    return Err(CatalogError::Conflict(
                        "Category with this name already exists".into(),
                    ));
                }
                category.name = name.to_string();
            }
        }
        if let Some(slug) = &request.slug {
            if *slug != category.slug {
                if self.repo.find_by_slug(slug).await?.is_some() {
                    return Err(CatalogError::Conflict(
                        "Category with this slug already exists".into(),
                    ));
                }
                category.slug = slug.clone();
            }
        }
        if let Some(description) = &request.description {
            category.description = Some(description.clone());
        }
        if let Some(image) = &request.image {
            category.image = Some(image.clone());
        }
        if let Some(is_active) = request.is_active {
            category.is_active = is_active;
        }
        if let Some(sort_order) = request.sort_order {
            category.sort_order = sort_order;
        }
        category.updated_at = Utc::now();

        Ok(self.repo.update(&category).await?)
    }

    async fn remove(&self, id: Uuid) -> Result<(), CatalogError> {
        self.find_one(id).await?;
        self.repo.delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockCategoryRepository;

    fn request(name: &str, slug: &str) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: name.into(),
            slug: slug.into(),
            description: None,
            image: None,
            is_active: None,
            sort_order: Some(3),
        }
    }

    #[tokio::test]
    async fn test_create_category() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_name().returning(|_| Ok(None));
        repo.expect_find_by_slug().returning(|_| Ok(None));
        repo.expect_create().returning(|c| Ok(c.clone()));

        let category = CategoryServiceImpl::new(Arc::new(repo))
            .create(&request(" Dinh dưỡng ", "dinh-duong"))
            .await
            .unwrap();

        assert_eq!(category.name, "Dinh dưỡng");
        assert_eq!(category.slug, "dinh-duong");
        assert_eq!(category.sort_order, 3);
        assert!(category.is_active);
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_conflicts() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_name().returning(|_| Ok(None));
        repo.expect_find_by_slug()
            .returning(|slug| Ok(Some(Category::new("Other".into(), slug.to_string()))));

        let err = CategoryServiceImpl::new(Arc::new(repo))
            .create(&request("New", "dinh-duong"))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_same_name_skips_uniqueness_check() {
        let existing = Category::new("Vitamins".into(), "vitamins".into());
        let id = existing.id;
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_find_by_name().never();
        repo.expect_update().returning(|c| Ok(c.clone()));

        let patch = UpdateCategoryRequest {
            name: Some("Vitamins".into()),
            description: Some("All about vitamins".into()),
            ..Default::default()
        };

        let updated = CategoryServiceImpl::new(Arc::new(repo))
            .update(id, &patch)
            .await
            .unwrap();

        assert_eq!(updated.description.as_deref(), Some("All about vitamins"));
    }

    #[tokio::test]
    async fn test_update_to_taken_slug_conflicts() {
        let existing = Category::new("A".into(), "a".into());
        let id = existing.id;
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_find_by_slug()
            .returning(|slug| Ok(Some(Category::new("B".into(), slug.to_string()))));

        let patch = UpdateCategoryRequest {
            slug: Some("b".into()),
            ..Default::default()
        };
        let err: AppError = CategoryServiceImpl::new(Arc::new(repo))
            .update(id, &patch)
            .await
            .unwrap_err()
            .into();

        assert_eq!(err.to_string(), "Conflict: Category with this slug already exists");
    }

    #[tokio::test]
    async fn test_missing_category_is_not_found() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let err: AppError = CategoryServiceImpl::new(Arc::new(repo))
            .remove(Uuid::new_v4())
            .await
            .unwrap_err()
            .into();

        assert_eq!(err.to_string(), "Not found: Category not found");
    }
}
