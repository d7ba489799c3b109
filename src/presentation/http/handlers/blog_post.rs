//! Blog Post Handlers

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::application::dto::request::{
    BlogPostQuery, CreateBlogPostRequest, UpdateBlogPostRequest,
};
use crate::application::dto::response::UploadResponse;
use crate::application::services::{
    BlogPostService, BlogPostServiceImpl, LocalUploadService, UploadError, UploadService,
};
use crate::domain::{BlogPost, BlogPostStats};
use crate::infrastructure::metrics;
use crate::infrastructure::repositories::{
    PgBlogPostRepository, PgCategoryRepository, PgTagRepository, PgUserRepository,
};
use crate::presentation::http::extractors::ValidatedJson;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::pagination::Page;
use crate::startup::AppState;

/// Multipart field carrying the image
const UPLOAD_FIELD: &str = "file";

type PgBlogPostService =
    BlogPostServiceImpl<PgBlogPostRepository, PgCategoryRepository, PgTagRepository, PgUserRepository>;

fn blog_post_service(state: &AppState) -> PgBlogPostService {
    BlogPostServiceImpl::new(
        Arc::new(PgBlogPostRepository::new(state.db.clone())),
        Arc::new(PgCategoryRepository::new(state.db.clone())),
        Arc::new(PgTagRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
    )
}

/// Filtered, sorted, paginated listing
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<BlogPostQuery>,
) -> Result<Json<Page<BlogPost>>, AppError> {
    Ok(Json(blog_post_service(&state).find_all(&query).await?))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BlogPost>, AppError> {
    Ok(Json(blog_post_service(&state).find_one(id).await?))
}

pub async fn get_post_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    Ok(Json(blog_post_service(&state).find_by_slug(&slug).await?))
}

pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    blog_post_service(&state).increment_view_count(id).await?;
    metrics::record_blog_post_view();

    Ok(StatusCode::NO_CONTENT)
}

pub async fn record_like(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    blog_post_service(&state).increment_like_count(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn statistics(State(state): State<AppState>) -> Result<Json<BlogPostStats>, AppError> {
    Ok(Json(blog_post_service(&state).statistics().await?))
}

pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateBlogPostRequest>,
) -> Result<(StatusCode, Json<BlogPost>), AppError> {
    let post = blog_post_service(&state).create(&body, auth.user_id).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateBlogPostRequest>,
) -> Result<Json<BlogPost>, AppError> {
    Ok(Json(blog_post_service(&state).update(id, &body).await?))
}

pub async fn publish_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BlogPost>, AppError> {
    Ok(Json(blog_post_service(&state).publish(id).await?))
}

pub async fn archive_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BlogPost>, AppError> {
    Ok(Json(blog_post_service(&state).archive(id).await?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    blog_post_service(&state).remove(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Store an image from the `file` multipart field
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let uploads = LocalUploadService::new(&state.settings.uploads);
        let stored = uploads
            .store_image(content_type.as_deref(), &bytes)
            .await?;

        return Ok((StatusCode::CREATED, Json(stored)));
    }

    Err(UploadError::Empty.into())
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}
