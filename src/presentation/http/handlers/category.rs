//! Category Handlers
//!
//! Reads are public; writes are mounted behind `require_admin`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::application::dto::request::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::application::services::{CategoryService, CategoryServiceImpl};
use crate::domain::Category;
use crate::infrastructure::repositories::PgCategoryRepository;
use crate::presentation::http::extractors::ValidatedJson;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn category_service(state: &AppState) -> CategoryServiceImpl<PgCategoryRepository> {
    CategoryServiceImpl::new(Arc::new(PgCategoryRepository::new(state.db.clone())))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(category_service(&state).find_all().await?))
}

pub async fn list_active_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(category_service(&state).find_active().await?))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(category_service(&state).find_one(id).await?))
}

pub async fn get_category_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(category_service(&state).find_by_slug(&slug).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = category_service(&state).create(&body).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(category_service(&state).update(id, &body).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    category_service(&state).remove(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
