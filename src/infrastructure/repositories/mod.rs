//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! ## Available Repositories
//!
//! - **PgUserRepository** - User accounts and roles
//! - **PgSessionRepository** - Refresh-token sessions
//! - **PgCategoryRepository** / **PgTagRepository** - Blog taxonomy with post counts
//! - **PgBlogPostRepository** - Posts with filtered, paginated listing
//! - **PgMedicationRepository** - Per-user medications
//! - **PgMedicationLogRepository** - Intake logs joined with their medication
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::{PgMedicationRepository, PgUserRepository};
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let user_repo = PgUserRepository::new(pool.clone());
//!     let medication_repo = PgMedicationRepository::new(pool.clone());
//! }
//! ```

pub mod blog_post_repository;
pub mod category_repository;
pub mod medication_log_repository;
pub mod medication_repository;
pub mod session_repository;
pub mod tag_repository;
pub mod user_repository;

pub use blog_post_repository::PgBlogPostRepository;
pub use category_repository::PgCategoryRepository;
pub use medication_log_repository::PgMedicationLogRepository;
pub use medication_repository::PgMedicationRepository;
pub use session_repository::PgSessionRepository;
pub use tag_repository::PgTagRepository;
pub use user_repository::PgUserRepository;
