//! # Domain Entities
//!
//! Core domain entities representing the business objects of the health
//! tracker. All entities map directly to their corresponding database tables.
//!
//! ## Admin content
//!
//! - **User**: Account with credentials, profile and role
//! - **Category**: Grouping for blog posts
//! - **Tag**: Coloured label for blog posts
//! - **BlogPost**: Article with status workflow and SEO metadata
//!
//! ## Consumer tracking
//!
//! - **Medication**: A medication a user takes
//! - **MedicationLog**: One recorded intake of a medication
//!
//! ## Supporting Entities
//!
//! - **Session**: Refresh-token sessions for JWT rotation
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod blog_post;
mod category;
mod medication;
mod medication_log;
mod session;
mod tag;
mod user;

pub use user::{User, UserRepository, UserRole};

pub use session::{Session, SessionRepository};

pub use category::{Category, CategoryRepository};

pub use tag::{Tag, TagRepository, DEFAULT_TAG_COLOR};

pub use blog_post::{
    AuthorSummary, BlogPost, BlogPostFilter, BlogPostRepository, BlogPostStats, BlogPostStatus,
    BlogPostType, SeoMetadata, SortField, SortOrder, TaxonomySummary,
};

pub use medication::{Medication, MedicationRepository};

pub use medication_log::{MedicationLog, MedicationLogFilter, MedicationLogRepository};

#[cfg(test)]
pub use blog_post::MockBlogPostRepository;
#[cfg(test)]
pub use category::MockCategoryRepository;
#[cfg(test)]
pub use medication::MockMedicationRepository;
#[cfg(test)]
pub use medication_log::MockMedicationLogRepository;
#[cfg(test)]
pub use session::MockSessionRepository;
#[cfg(test)]
pub use tag::MockTagRepository;
#[cfg(test)]
pub use user::MockUserRepository;
