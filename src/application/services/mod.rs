//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: Registration, login, JWT tokens and refresh sessions
//! - **UserService**: Admin management of user accounts
//! - **CategoryService** / **TagService**: Blog taxonomy
//! - **BlogPostService**: Post CRUD, publishing workflow and statistics
//! - **PublicBlogService**: Consumer feed of published posts
//! - **MedicationService** / **MedicationLogService**: Medication tracking
//! - **NoteAnalysisService**: Language-model extraction from notes
//! - **UploadService**: Blog image storage
//! - **SeedService**: Bootstrap data

pub mod auth_service;
pub mod blog_post_service;
pub mod category_service;
pub mod medication_log_service;
pub mod medication_service;
pub mod note_analysis_service;
pub mod public_blog_service;
pub mod seed_service;
pub mod tag_service;
pub mod upload_service;
pub mod user_service;

pub use auth_service::{AuthError, AuthService, AuthServiceImpl, AuthTokens, Claims};

pub use user_service::{UserError, UserService, UserServiceImpl};

pub use category_service::{CatalogError, CategoryService, CategoryServiceImpl};

pub use tag_service::{TagService, TagServiceImpl};

pub use blog_post_service::{BlogError, BlogPostService, BlogPostServiceImpl};

pub use public_blog_service::{PublicBlogService, PublicBlogServiceImpl};

pub use medication_service::{MedicationError, MedicationService, MedicationServiceImpl};

pub use medication_log_service::{MedicationLogService, MedicationLogServiceImpl};

pub use note_analysis_service::{AnalysisError, NoteAnalysisService, NoteAnalysisServiceImpl};

pub use upload_service::{LocalUploadService, UploadError, UploadService};

pub use seed_service::{SeedReport, SeedService};
