//! Medication entity and repository trait.
//!
//! Maps to the `medications` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// A medication tracked by one user.
///
/// Maps to the `medications` table:
/// - id: UUID PRIMARY KEY
/// - user_id: UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - name: VARCHAR(200) NOT NULL
/// - dosage: VARCHAR(100) NOT NULL
/// - frequency: VARCHAR(100) NULL
/// - notes: TEXT NULL
/// - created_at / updated_at: TIMESTAMPTZ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub dosage: String,
    pub frequency: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Medication {
    pub fn new(user_id: Uuid, name: String, dosage: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            name,
            dosage,
            frequency: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// "Name (dosage)", or just the name when no dosage is recorded.
    pub fn display_title(&self) -> String {
        if self.dosage.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.dosage)
        }
    }
}

/// Every method is scoped by owner; rows of other users are invisible.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicationRepository: Send + Sync {
    /// The user's medications, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Medication>, AppError>;

    async fn find_for_user(&self, id: Uuid, user_id: Uuid)
        -> Result<Option<Medication>, AppError>;

    /// Case-insensitive exact name match.
    async fn find_by_name_for_user(
        &self,
        name: &str,
        user_id: Uuid,
    ) -> Result<Option<Medication>, AppError>;

    async fn create(&self, medication: &Medication) -> Result<Medication, AppError>;

    async fn update(&self, medication: &Medication) -> Result<Medication, AppError>;

    /// Returns false when nothing was deleted.
    async fn delete_for_user(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError>;
}
