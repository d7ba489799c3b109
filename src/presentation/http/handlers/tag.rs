//! Tag Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::application::dto::request::{CreateTagRequest, UpdateTagRequest};
use crate::application::services::{TagService, TagServiceImpl};
use crate::domain::Tag;
use crate::infrastructure::repositories::PgTagRepository;
use crate::presentation::http::extractors::ValidatedJson;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn tag_service(state: &AppState) -> TagServiceImpl<PgTagRepository> {
    TagServiceImpl::new(Arc::new(PgTagRepository::new(state.db.clone())))
}

pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, AppError> {
    Ok(Json(tag_service(&state).find_all().await?))
}

pub async fn list_active_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, AppError> {
    Ok(Json(tag_service(&state).find_active().await?))
}

pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tag>, AppError> {
    Ok(Json(tag_service(&state).find_one(id).await?))
}

pub async fn get_tag_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Tag>, AppError> {
    Ok(Json(tag_service(&state).find_by_slug(&slug).await?))
}

pub async fn create_tag(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>), AppError> {
    let tag = tag_service(&state).create(&body).await?;

    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateTagRequest>,
) -> Result<Json<Tag>, AppError> {
    Ok(Json(tag_service(&state).update(id, &body).await?))
}

pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    tag_service(&state).remove(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
