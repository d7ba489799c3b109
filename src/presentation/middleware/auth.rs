//! Authentication Middleware
//!
//! JWT validation middleware for protected routes.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::application::services::auth_service::decode_access_token;
use crate::domain::UserRole;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Authenticated user extension
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Validate the bearer token and build the request's AuthUser.
fn authenticate(request: &Request, secret: &str) -> Result<AuthUser, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".into()))?;

    let claims = decode_access_token(token, secret)?;
    let user_id = claims.user_id()?;

    Ok(AuthUser {
        user_id,
        email: claims.email,
        role: claims.role,
    })
}

/// Authentication middleware that validates JWT tokens
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&request, &state.settings.jwt.secret)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// As `require_auth`, and the user must hold the admin role
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&request, &state.settings.jwt.secret)?;
    if !user.is_admin() {
        tracing::warn!(user_id = %user.user_id, "Non-admin attempted admin route");
        return Err(AppError::Forbidden("Admin access required".into()));
    }
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
