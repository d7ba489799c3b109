//! Response DTOs
//!
//! Data structures for API response bodies. Entities that are already safe
//! to expose (categories, tags, posts, medications) are serialized directly.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::application::services::AuthTokens;
use crate::domain::services::NoteExtraction;
use crate::domain::{BlogPost, ConsumerCategory, User, UserRole};

/// Authentication tokens response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<AuthTokens> for TokenResponse {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        }
    }
}

/// Register / login response (user summary plus tokens)
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl AuthResponse {
    pub fn new(user: User, tokens: AuthTokens) -> Self {
        Self {
            user: UserResponse::from(user),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        }
    }
}

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let full_name = user.full_name();
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            full_name,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A post as the consumer blog sees it.
#[derive(Debug, Serialize)]
pub struct PublicBlogPostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image: Option<String>,
    pub category: ConsumerCategory,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<BlogPost> for PublicBlogPostResponse {
    fn from(post: BlogPost) -> Self {
        let author = post
            .author
            .map(|a| format!("{} {}", a.first_name, a.last_name).trim().to_string());
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            excerpt: post.excerpt,
            content: post.content,
            featured_image: post.featured_image,
            category: ConsumerCategory::from_post_type(post.post_type),
            tags: post.tag.map(|t| vec![t.name]).unwrap_or_default(),
            author,
            view_count: post.view_count,
            like_count: post.like_count,
            published_at: post.published_at,
            created_at: post.created_at,
        }
    }
}

/// Stored image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub size: usize,
    pub content_type: String,
}

/// Result of analysing (and optionally saving) a medication note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteAnalysisResponse {
    pub medication_name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub taken_at: Option<String>,
    pub feeling_after: Option<String>,
    pub saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_id: Option<Uuid>,
}

impl NoteAnalysisResponse {
    pub fn unsaved(extraction: NoteExtraction) -> Self {
        Self {
            medication_name: extraction.medication_name,
            dosage: extraction.dosage,
            frequency: extraction.frequency,
            taken_at: extraction.taken_at,
            feeling_after: extraction.feeling_after,
            saved: false,
            medication_id: None,
            log_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlogPostType, TaxonomySummary};

    #[test]
    fn test_public_post_translation() {
        let mut post = BlogPost::new("T".into(), "t".into(), "C".into(), Uuid::new_v4());
        post.post_type = BlogPostType::Wellness;
        post.tag = Some(TaxonomySummary {
            id: Uuid::new_v4(),
            name: "Vitamin".into(),
            slug: "vitamin".into(),
        });

        let json = serde_json::to_value(PublicBlogPostResponse::from(post)).unwrap();

        assert_eq!(json["category"], "suc-khoe");
        assert_eq!(json["tags"], serde_json::json!(["Vitamin"]));
        assert!(json.get("type").is_none());
    }

    #[test]
    fn test_public_post_without_tag_has_empty_tags() {
        let post = BlogPost::new("T".into(), "t".into(), "C".into(), Uuid::new_v4());
        let response = PublicBlogPostResponse::from(post);
        assert!(response.tags.is_empty());
        assert_eq!(response.category, ConsumerCategory::YTe);
    }

    #[test]
    fn test_user_response_has_no_password() {
        let user = User {
            email: "a@b.com".into(),
            password_hash: "argon2-hash".into(),
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            ..User::default()
        };
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("argon2-hash"));
        assert!(json.contains("\"full_name\":\"Ann Lee\""));
    }
}
