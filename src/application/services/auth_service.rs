//! Authentication Service
//!
//! Handles user authentication, JWT token management, and session handling.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::application::dto::request::RegisterRequest;
use crate::config::JwtSettings;
use crate::domain::{Session, SessionRepository, User, UserRepository, UserRole};
use crate::shared::error::AppError;

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account with the `user` role
    async fn register(
        &self,
        request: &RegisterRequest,
        user_agent: Option<String>,
    ) -> Result<(User, AuthTokens), AuthError>;

    /// Authenticate user with credentials
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
        user_agent: Option<String>,
    ) -> Result<(User, AuthTokens), AuthError>;

    /// Rotate a refresh token into a fresh token pair
    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, AuthError>;

    /// Revoke refresh token (logout)
    async fn revoke_token(&self, refresh_token: &str) -> Result<(), AuthError>;

    /// Load the account behind an authenticated request
    async fn get_current_user(&self, user_id: Uuid) -> Result<User, AuthError>;
}

/// Authentication tokens response
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// JWT ID for token revocation tracking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken)
    }
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailExists,

    #[error("Session not found or expired")]
    SessionNotFound,

    #[error(transparent)]
    Repository(#[from] AppError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".into())
            }
            AuthError::TokenExpired => AppError::Unauthorized("Token expired".into()),
            AuthError::InvalidToken => AppError::Unauthorized("Invalid token".into()),
            AuthError::SessionNotFound => {
                AppError::Unauthorized("Invalid or expired refresh token".into())
            }
            AuthError::UserNotFound => AppError::NotFound("User not found".into()),
            AuthError::EmailExists => AppError::Conflict("Email already exists".into()),
            AuthError::Repository(e) => e,
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Decode and validate an access token
pub fn decode_access_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Sign a short-lived HS256 access token for `user`
pub fn encode_access_token(user: &User, jwt_settings: &JwtSettings) -> Result<String, AuthError> {
    let now = Utc::now();
    let access_expiry = now + Duration::minutes(jwt_settings.access_token_expiry_minutes);

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        exp: access_expiry.timestamp(),
        iat: now.timestamp(),
        jti: Some(Uuid::new_v4().to_string()),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_settings.secret.as_bytes()),
    )
    .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))
}

/// Hash refresh token for storage
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Emails are compared and stored lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// AuthService implementation
pub struct AuthServiceImpl<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    jwt_settings: JwtSettings,
}

impl<U, S> AuthServiceImpl<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    /// Create a new AuthServiceImpl
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, jwt_settings: JwtSettings) -> Self {
        Self {
            user_repo,
            session_repo,
            jwt_settings,
        }
    }

    /// Generate access and refresh tokens
    fn generate_tokens(&self, user: &User) -> Result<AuthTokens, AuthError> {
        let access_token = encode_access_token(user, &self.jwt_settings)?;

        // Opaque refresh token; only its hash is persisted
        let refresh_token = format!("{}.{}", Uuid::new_v4(), Uuid::new_v4());

        Ok(AuthTokens {
            access_token,
            refresh_token,
            expires_in: self.jwt_settings.access_token_expiry_minutes * 60,
            token_type: "Bearer".to_string(),
        })
    }

    fn refresh_expiry(&self) -> chrono::DateTime<Utc> {
        Utc::now() + Duration::days(self.jwt_settings.refresh_token_expiry_days)
    }

    /// Issue tokens and persist the session behind the refresh token
    async fn start_session(
        &self,
        user: &User,
        user_agent: Option<String>,
    ) -> Result<AuthTokens, AuthError> {
        let tokens = self.generate_tokens(user)?;

        let mut session = Session::new(
            user.id,
            hash_refresh_token(&tokens.refresh_token),
            self.refresh_expiry(),
        );
        session.user_agent = user_agent;

        self.session_repo.create(&session).await?;

        Ok(tokens)
    }
}

#[async_trait]
impl<U, S> AuthService for AuthServiceImpl<U, S>
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
{
    async fn register(
        &self,
        request: &RegisterRequest,
        user_agent: Option<String>,
    ) -> Result<(User, AuthTokens), AuthError> {
        let email = normalize_email(&request.email);

        if self.user_repo.email_exists(&email).await? {
            return Err(AuthError::EmailExists);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash: hash_password(&request.password)?,
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            role: UserRole::User,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created_user = self.user_repo.create(&user).await.map_err(|e| match e {
            AppError::Conflict(_) => AuthError::EmailExists,
            e => AuthError::Repository(e),
        })?;

        let tokens = self.start_session(&created_user, user_agent).await?;

        tracing::info!(user_id = %created_user.id, "User registered");

        Ok((created_user, tokens))
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
        user_agent: Option<String>,
    ) -> Result<(User, AuthTokens), AuthError> {
        let user = self
            .user_repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.can_login() || !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.start_session(&user, user_agent).await?;

        Ok((user, tokens))
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        let session = self
            .session_repo
            .find_by_token_hash(&hash_refresh_token(refresh_token))
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if !session.is_active() {
            return Err(AuthError::SessionNotFound);
        }

        let user = self
            .user_repo
            .find_by_id(session.user_id)
            .await?
            .filter(User::can_login)
            .ok_or(AuthError::SessionNotFound)?;

        // Rotate: the presented token stops working
        let new_tokens = self.generate_tokens(&user)?;
        self.session_repo
            .update_token_hash(
                session.id,
                &hash_refresh_token(&new_tokens.refresh_token),
                self.refresh_expiry(),
            )
            .await?;

        Ok(new_tokens)
    }

    async fn revoke_token(&self, refresh_token: &str) -> Result<(), AuthError> {
        let session = self
            .session_repo
            .find_by_token_hash(&hash_refresh_token(refresh_token))
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        self.session_repo.revoke(session.id).await?;

        Ok(())
    }

    async fn get_current_user(&self, user_id: Uuid) -> Result<User, AuthError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockSessionRepository, MockUserRepository};

    const SECRET: &str = "test-secret-key-that-is-at-least-32-chars";

    fn jwt_settings() -> JwtSettings {
        JwtSettings {
            secret: SECRET.to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        }
    }

    fn service(
        users: MockUserRepository,
        sessions: MockSessionRepository,
    ) -> AuthServiceImpl<MockUserRepository, MockSessionRepository> {
        AuthServiceImpl::new(Arc::new(users), Arc::new(sessions), jwt_settings())
    }

    fn stored_user(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "jane@example.com".into(),
            password_hash: hash_password(password).unwrap(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            ..User::default()
        }
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            email: "  Jane@Example.com ".into(),
            password: "secret1".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        }
    }

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_refresh_token_hash_is_sha256_hex() {
        let hash = hash_refresh_token("a.b");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_refresh_token("a.b"));
        assert_ne!(hash, hash_refresh_token("a.c"));
    }

    #[tokio::test]
    async fn test_register_creates_user_role_and_session() {
        let mut users = MockUserRepository::new();
        users
            .expect_email_exists()
            .withf(|email| email == "jane@example.com")
            .returning(|_| Ok(false));
        users.expect_create().returning(|u| Ok(u.clone()));

        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_create()
            .times(1)
            .returning(|s| Ok(s.clone()));

        let (user, tokens) = service(users, sessions)
            .register(&register_request(), Some("test-agent".into()))
            .await
            .unwrap();

        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.role, UserRole::User);
        assert!(user.is_active);
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 15 * 60);

        let claims = decode_access_token(&tokens.access_token, SECRET).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut users = MockUserRepository::new();
        users.expect_email_exists().returning(|_| Ok(true));

        let result = service(users, MockSessionRepository::new())
            .register(&register_request(), None)
            .await;

        assert!(matches!(result, Err(AuthError::EmailExists)));
    }

    #[tokio::test]
    async fn test_login_success() {
        let user = stored_user("secret1");
        let expected_id = user.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        let mut sessions = MockSessionRepository::new();
        sessions.expect_create().returning(|s| Ok(s.clone()));

        let (user, tokens) = service(users, sessions)
            .authenticate("JANE@example.com", "secret1", None)
            .await
            .unwrap();

        assert_eq!(user.id, expected_id);
        assert!(tokens.refresh_token.contains('.'));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = stored_user("secret1");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let result = service(users, MockSessionRepository::new())
            .authenticate("jane@example.com", "nope", None)
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_inactive_user() {
        let mut user = stored_user("secret1");
        user.is_active = false;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let result = service(users, MockSessionRepository::new())
            .authenticate("jane@example.com", "secret1", None)
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let err = service(users, MockSessionRepository::new())
            .authenticate("ghost@example.com", "secret1", None)
            .await
            .unwrap_err();

        let app_error: AppError = err.into();
        assert_eq!(app_error.to_string(), "Unauthorized: Invalid email or password");
    }

    #[tokio::test]
    async fn test_refresh_rotates_token() {
        let user = stored_user("secret1");
        let session = Session::new(
            user.id,
            hash_refresh_token("old.token"),
            Utc::now() + Duration::days(1),
        );
        let session_id = session.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_find_by_token_hash()
            .returning(move |_| Ok(Some(session.clone())));
        sessions
            .expect_update_token_hash()
            .withf(move |id, hash, _| *id == session_id && hash != hash_refresh_token("old.token"))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let tokens = service(users, sessions)
            .refresh_token("old.token")
            .await
            .unwrap();

        assert_ne!(tokens.refresh_token, "old.token");
    }

    #[tokio::test]
    async fn test_refresh_revoked_session_rejected() {
        let mut session = Session::new(
            Uuid::new_v4(),
            hash_refresh_token("old.token"),
            Utc::now() + Duration::days(1),
        );
        session.revoked_at = Some(Utc::now());

        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_find_by_token_hash()
            .returning(move |_| Ok(Some(session.clone())));

        let result = service(MockUserRepository::new(), sessions)
            .refresh_token("old.token")
            .await;

        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_refresh_unknown_token() {
        let mut sessions = MockSessionRepository::new();
        sessions.expect_find_by_token_hash().returning(|_| Ok(None));

        let result = service(MockUserRepository::new(), sessions)
            .refresh_token("never.issued")
            .await;

        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let svc = service(MockUserRepository::new(), MockSessionRepository::new());
        let tokens = svc.generate_tokens(&stored_user("x")).unwrap();

        assert!(decode_access_token(&tokens.access_token, SECRET).is_ok());
        assert!(matches!(
            decode_access_token(&tokens.access_token, "another-secret-key-of-32-characters!"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_decode_expired_token() {
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "a@b.com".into(),
            role: UserRole::User,
            exp: (now - Duration::hours(1)).timestamp(),
            iat: (now - Duration::hours(2)).timestamp(),
            jti: None,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            decode_access_token(&token, SECRET),
            Err(AuthError::TokenExpired)
        ));
    }
}
