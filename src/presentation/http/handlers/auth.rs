//! Authentication Handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::{headers::UserAgent, TypedHeader};

use crate::application::dto::request::{LoginRequest, RefreshTokenRequest, RegisterRequest};
use crate::application::dto::response::{AuthResponse, TokenResponse, UserResponse};
use crate::application::services::{AuthService, AuthServiceImpl};
use crate::infrastructure::repositories::{PgSessionRepository, PgUserRepository};
use crate::presentation::http::extractors::ValidatedJson;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn auth_service(state: &AppState) -> AuthServiceImpl<PgUserRepository, PgSessionRepository> {
    AuthServiceImpl::new(
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(PgSessionRepository::new(state.db.clone())),
        state.settings.jwt.clone(),
    )
}

fn user_agent(header: Option<TypedHeader<UserAgent>>) -> Option<String> {
    header.map(|TypedHeader(agent)| agent.as_str().to_owned())
}

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    agent: Option<TypedHeader<UserAgent>>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let (user, tokens) = auth_service(&state)
        .register(&body, user_agent(agent))
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, tokens))))
}

/// Login with credentials
pub async fn login(
    State(state): State<AppState>,
    agent: Option<TypedHeader<UserAgent>>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (user, tokens) = auth_service(&state)
        .authenticate(&body.email, &body.password, user_agent(agent))
        .await?;

    Ok(Json(AuthResponse::new(user, tokens)))
}

/// Rotate a refresh token
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let tokens = auth_service(&state)
        .refresh_token(&body.refresh_token)
        .await?;

    Ok(Json(TokenResponse::from(tokens)))
}

/// Logout (revoke refresh token). Always 204.
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RefreshTokenRequest>,
) -> StatusCode {
    if let Err(e) = auth_service(&state).revoke_token(&body.refresh_token).await {
        tracing::debug!(error = %e, "Ignoring logout failure");
    }

    StatusCode::NO_CONTENT
}

/// Current user's profile
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = auth_service(&state).get_current_user(auth.user_id).await?;

    Ok(Json(UserResponse::from(user)))
}
