//! Request DTOs
//!
//! Data structures for API request bodies and query strings.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{BlogPostStatus, BlogPostType, SeoMetadata, UserRole};
use crate::shared::validation::{validate_hex_color, validate_not_blank, validate_slug};

/// Longest note accepted by the analysis endpoints.
pub const MAX_NOTE_CHARS: u64 = 4000;

// ============================================================================
// Auth
// ============================================================================

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    #[serde(default)]
    pub first_name: String,

    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    #[serde(default)]
    pub last_name: String,
}

/// Refresh / logout request
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

// ============================================================================
// Users (admin)
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    #[serde(default)]
    pub first_name: String,

    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    #[serde(default)]
    pub last_name: String,

    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// Update user request; only provided fields change.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,

    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: Option<String>,

    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

// ============================================================================
// Categories & tags
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 120), custom(function = "validate_slug"))]
    pub slug: String,

    pub description: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 120), custom(function = "validate_slug"))]
    pub slug: Option<String>,

    pub description: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 120), custom(function = "validate_slug"))]
    pub slug: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTagRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 120), custom(function = "validate_slug"))]
    pub slug: Option<String>,

    pub description: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,

    pub is_active: Option<bool>,
}

// ============================================================================
// Blog posts
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBlogPostRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(max = 255), custom(function = "validate_slug"))]
    pub slug: String,

    pub excerpt: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    pub content: String,

    pub featured_image: Option<String>,
    pub status: Option<BlogPostStatus>,

    #[serde(rename = "type")]
    pub post_type: Option<BlogPostType>,

    pub seo_metadata: Option<SeoMetadata>,

    /// Defaults to the signed-in admin
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

/// Partial update; only provided fields change.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBlogPostRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 255), custom(function = "validate_slug"))]
    pub slug: Option<String>,

    pub excerpt: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    pub content: Option<String>,

    pub featured_image: Option<String>,
    pub status: Option<BlogPostStatus>,

    #[serde(rename = "type")]
    pub post_type: Option<BlogPostType>,

    pub seo_metadata: Option<SeoMetadata>,
    pub category_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

/// Admin listing query. Enum-like fields stay strings so unknown values can
/// be reported as 400 rather than a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct BlogPostQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    pub category_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Consumer feed query.
#[derive(Debug, Default, Deserialize)]
pub struct PublicBlogQuery {
    /// Consumer category slug (`y-te`, `suc-khoe`, `thuoc`)
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

// ============================================================================
// Medications & logs
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMedicationRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "Dosage must be 1-100 characters"))]
    pub dosage: String,

    #[validate(length(max = 100, message = "Frequency must be at most 100 characters"))]
    pub frequency: Option<String>,

    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMedicationRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Dosage must be 1-100 characters"))]
    pub dosage: Option<String>,

    #[validate(length(max = 100, message = "Frequency must be at most 100 characters"))]
    pub frequency: Option<String>,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMedicationLogRequest {
    pub medication_id: Uuid,

    /// Defaults to now
    pub taken_at: Option<DateTime<Utc>>,

    pub notes: Option<String>,
    pub feeling_after: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMedicationLogRequest {
    pub medication_id: Option<Uuid>,
    pub taken_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub feeling_after: Option<String>,
}

/// Log listing and export query.
#[derive(Debug, Default, Deserialize)]
pub struct MedicationLogQuery {
    pub search: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub medication_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

// ============================================================================
// AI
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeNoteRequest {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = MAX_NOTE_CHARS, message = "Note must be at most 4000 characters")
    )]
    pub note: String,
}
