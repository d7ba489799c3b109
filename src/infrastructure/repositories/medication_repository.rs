//! PostgreSQL implementation of MedicationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Medication, MedicationRepository};
use crate::shared::error::AppError;

const MEDICATION_COLUMNS: &str =
    "id, user_id, name, dosage, frequency, notes, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct MedicationRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    dosage: String,
    frequency: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MedicationRow {
    fn into_medication(self) -> Medication {
        Medication {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            dosage: self.dosage,
            frequency: self.frequency,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgMedicationRepository {
    pool: PgPool,
}

impl PgMedicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MedicationRepository for PgMedicationRepository {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Medication>, AppError> {
        let rows = sqlx::query_as::<_, MedicationRow>(&format!(
            "SELECT {MEDICATION_COLUMNS} FROM medications WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MedicationRow::into_medication).collect())
    }

    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Medication>, AppError> {
        let row = sqlx::query_as::<_, MedicationRow>(&format!(
            "SELECT {MEDICATION_COLUMNS} FROM medications WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MedicationRow::into_medication))
    }

    async fn find_by_name_for_user(
        &self,
        name: &str,
        user_id: Uuid,
    ) -> Result<Option<Medication>, AppError> {
        // Oldest match wins when the user has duplicates
        let row = sqlx::query_as::<_, MedicationRow>(&format!(
            r#"
            SELECT {MEDICATION_COLUMNS} FROM medications
            WHERE user_id = $1 AND LOWER(name) = LOWER($2)
            ORDER BY created_at ASC
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MedicationRow::into_medication))
    }

    async fn create(&self, medication: &Medication) -> Result<Medication, AppError> {
        let row = sqlx::query_as::<_, MedicationRow>(&format!(
            r#"
            INSERT INTO medications (id, user_id, name, dosage, frequency, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {MEDICATION_COLUMNS}
            "#
        ))
        .bind(medication.id)
        .bind(medication.user_id)
        .bind(&medication.name)
        .bind(&medication.dosage)
        .bind(&medication.frequency)
        .bind(&medication.notes)
        .bind(medication.created_at)
        .bind(medication.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_medication())
    }

    async fn update(&self, medication: &Medication) -> Result<Medication, AppError> {
        let row = sqlx::query_as::<_, MedicationRow>(&format!(
            r#"
            UPDATE medications
            SET name = $3, dosage = $4, frequency = $5, notes = $6, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {MEDICATION_COLUMNS}
            "#
        ))
        .bind(medication.id)
        .bind(medication.user_id)
        .bind(&medication.name)
        .bind(&medication.dosage)
        .bind(&medication.frequency)
        .bind(&medication.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Medication not found".into()))?;

        Ok(row.into_medication())
    }

    async fn delete_for_user(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM medications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
