//! Medication intake log entity and repository trait.
//!
//! Maps to the `medication_logs` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::medication::Medication;
use crate::shared::error::AppError;

/// One recorded intake of a medication.
///
/// Maps to the `medication_logs` table:
/// - id: UUID PRIMARY KEY
/// - user_id: UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - medication_id: UUID NOT NULL REFERENCES medications(id) ON DELETE CASCADE
/// - taken_at: TIMESTAMPTZ NOT NULL
/// - notes: TEXT NULL
/// - feeling_after: TEXT NULL
/// - created_at / updated_at: TIMESTAMPTZ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub medication_id: Uuid,
    pub taken_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub feeling_after: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Populated on reads
    pub medication: Option<Medication>,
}

impl MedicationLog {
    pub fn new(user_id: Uuid, medication_id: Uuid, taken_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            medication_id,
            taken_at,
            notes: None,
            feeling_after: None,
            created_at: now,
            updated_at: now,
            medication: None,
        }
    }
}

/// Filters for log listings, exports and calendar ranges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicationLogFilter {
    /// Substring of medication name, notes or feeling
    pub search: Option<String>,
    /// Inclusive lower bound on `taken_at`
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `taken_at`
    pub to: Option<DateTime<Utc>>,
    pub medication_id: Option<Uuid>,
}

impl MedicationLogFilter {
    /// The search term wrapped for ILIKE, or None when blank.
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                let escaped = s
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");
                format!("%{}%", escaped)
            })
    }

    pub fn has_inverted_range(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicationLogRepository: Send + Sync {
    /// Logs of `user_id` matching `filter`, ordered `taken_at DESC`.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: &MedicationLogFilter,
    ) -> Result<Vec<MedicationLog>, AppError>;

    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MedicationLog>, AppError>;

    async fn create(&self, log: &MedicationLog) -> Result<MedicationLog, AppError>;

    async fn update(&self, log: &MedicationLog) -> Result<MedicationLog, AppError>;

    /// Returns false when nothing was deleted.
    async fn delete_for_user(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError>;
}
