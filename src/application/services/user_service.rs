//! User Service
//!
//! Admin management of user accounts.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::auth_service::{hash_password, normalize_email, AuthError};
use crate::application::dto::request::{CreateUserRequest, UpdateUserRequest};
use crate::domain::{User, UserRepository};
use crate::shared::error::AppError;

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    async fn get_user(&self, id: Uuid) -> Result<User, UserError>;

    async fn create_user(&self, request: &CreateUserRequest) -> Result<User, UserError>;

    async fn update_user(&self, id: Uuid, request: &UpdateUserRequest) -> Result<User, UserError>;

    /// Delete an account; `acting_user_id` may not delete itself
    async fn delete_user(&self, id: Uuid, acting_user_id: Uuid) -> Result<(), UserError>;
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Email already exists")]
    EmailTaken,

    #[error("You cannot delete your own account")]
    CannotDeleteSelf,

    #[error(transparent)]
    Repository(#[from] AppError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for UserError {
    fn from(e: AuthError) -> Self {
        UserError::Internal(e.to_string())
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound => AppError::NotFound("User not found".into()),
            UserError::EmailTaken => AppError::Conflict("Email already exists".into()),
            UserError::CannotDeleteSelf => {
                AppError::BadRequest("You cannot delete your own account".into())
            }
            UserError::Repository(e) => e,
            UserError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// UserService implementation
pub struct UserServiceImpl<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UserServiceImpl<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), UserError> {
        if self.user_repo.email_exists(email).await? {
            return Err(UserError::EmailTaken);
        }
        Ok(())
    }
}

fn map_conflict(e: AppError) -> UserError {
    match e {
        AppError::Conflict(_) => UserError::EmailTaken,
        e => UserError::Repository(e),
    }
}

#[async_trait]
impl<U> UserService for UserServiceImpl<U>
where
    U: UserRepository + 'static,
{
    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.user_repo.list().await?)
    }

    async fn get_user(&self, id: Uuid) -> Result<User, UserError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound)
    }

    async fn create_user(&self, request: &CreateUserRequest) -> Result<User, UserError> {
        let email = normalize_email(&request.email);
        self.ensure_email_free(&email).await?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash: hash_password(&request.password)?,
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            role: request.role.unwrap_or_default(),
            is_active: request.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        let created = self.user_repo.create(&user).await.map_err(map_conflict)?;
        tracing::info!(user_id = %created.id, role = %created.role, "User created by admin");

        Ok(created)
    }

    async fn update_user(&self, id: Uuid, request: &UpdateUserRequest) -> Result<User, UserError> {
        let mut user = self.get_user(id).await?;

        if let Some(email) = request.email.as_deref().map(normalize_email) {
            if email != user.email {
                self.ensure_email_free(&email).await?;
                user.email = email;
            }
        }
        if let Some(password) = &request.password {
            user.password_hash = hash_password(password)?;
        }
        if let Some(first_name) = &request.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = &request.last_name {
            user.last_name = last_name.trim().to_string();
        }
        if let Some(role) = request.role {
            user.role = role;
        }
        if let Some(is_active) = request.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();

        self.user_repo.update(&user).await.map_err(map_conflict)
    }

    async fn delete_user(&self, id: Uuid, acting_user_id: Uuid) -> Result<(), UserError> {
        if id == acting_user_id {
            return Err(UserError::CannotDeleteSelf);
        }

        // 404 before delete so a missing row is reported
        self.get_user(id).await?;
        self.user_repo.delete(id).await?;

        Ok(())
    }
}
