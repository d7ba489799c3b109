//! Consumer Blog Handlers
//!
//! Read-only feed of published posts in the consumer naming convention.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::application::dto::request::PublicBlogQuery;
use crate::application::dto::response::PublicBlogPostResponse;
use crate::application::services::{PublicBlogService, PublicBlogServiceImpl};
use crate::infrastructure::repositories::PgBlogPostRepository;
use crate::shared::error::AppError;
use crate::shared::pagination::Page;
use crate::startup::AppState;

fn public_blog_service(state: &AppState) -> PublicBlogServiceImpl<PgBlogPostRepository> {
    PublicBlogServiceImpl::new(Arc::new(PgBlogPostRepository::new(state.db.clone())))
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PublicBlogQuery>,
) -> Result<Json<Page<PublicBlogPostResponse>>, AppError> {
    Ok(Json(public_blog_service(&state).list_posts(&query).await?))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicBlogPostResponse>, AppError> {
    Ok(Json(public_blog_service(&state).get_post(&slug).await?))
}
