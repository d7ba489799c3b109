//! Medication Log Repository Implementation
//!
//! Every read joins the owning medication so logs can be rendered with the
//! medication name and dosage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::{Medication, MedicationLog, MedicationLogFilter, MedicationLogRepository};
use crate::shared::error::AppError;

const SELECT_LOG: &str = r#"
    SELECT l.id, l.user_id, l.medication_id, l.taken_at, l.notes, l.feeling_after,
           l.created_at, l.updated_at,
           m.name AS medication_name, m.dosage AS medication_dosage,
           m.frequency AS medication_frequency, m.notes AS medication_notes,
           m.created_at AS medication_created_at, m.updated_at AS medication_updated_at
    FROM medication_logs l
    JOIN medications m ON m.id = l.medication_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct MedicationLogRow {
    id: Uuid,
    user_id: Uuid,
    medication_id: Uuid,
    taken_at: DateTime<Utc>,
    notes: Option<String>,
    feeling_after: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    medication_name: String,
    medication_dosage: String,
    medication_frequency: Option<String>,
    medication_notes: Option<String>,
    medication_created_at: DateTime<Utc>,
    medication_updated_at: DateTime<Utc>,
}

impl MedicationLogRow {
    fn into_log(self) -> MedicationLog {
        let medication = Medication {
            id: self.medication_id,
            user_id: self.user_id,
            name: self.medication_name,
            dosage: self.medication_dosage,
            frequency: self.medication_frequency,
            notes: self.medication_notes,
            created_at: self.medication_created_at,
            updated_at: self.medication_updated_at,
        };

        MedicationLog {
            id: self.id,
            user_id: self.user_id,
            medication_id: self.medication_id,
            taken_at: self.taken_at,
            notes: self.notes,
            feeling_after: self.feeling_after,
            created_at: self.created_at,
            updated_at: self.updated_at,
            medication: Some(medication),
        }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, user_id: Uuid, filter: &MedicationLogFilter) {
    builder.push(" WHERE l.user_id = ").push_bind(user_id);

    if let Some(pattern) = filter.search_pattern() {
        builder
            .push(" AND (m.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR l.notes ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR l.feeling_after ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(from) = filter.from {
        builder.push(" AND l.taken_at >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        builder.push(" AND l.taken_at <= ").push_bind(to);
    }
    if let Some(medication_id) = filter.medication_id {
        builder.push(" AND l.medication_id = ").push_bind(medication_id);
    }
}

#[derive(Clone)]
pub struct PgMedicationLogRepository {
    pool: PgPool,
}

impl PgMedicationLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MedicationLogRepository for PgMedicationLogRepository {
    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: &MedicationLogFilter,
    ) -> Result<Vec<MedicationLog>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_LOG);
        push_filters(&mut query, user_id, filter);
        query.push(" ORDER BY l.taken_at DESC, l.id DESC");

        let rows: Vec<MedicationLogRow> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(MedicationLogRow::into_log).collect())
    }

    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MedicationLog>, AppError> {
        let row = sqlx::query_as::<_, MedicationLogRow>(&format!(
            "{SELECT_LOG} WHERE l.id = $1 AND l.user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MedicationLogRow::into_log))
    }

    async fn create(&self, log: &MedicationLog) -> Result<MedicationLog, AppError> {
        sqlx::query(
            r#"
            INSERT INTO medication_logs (id, user_id, medication_id, taken_at, notes, feeling_after, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(log.id)
        .bind(log.user_id)
        .bind(log.medication_id)
        .bind(log.taken_at)
        .bind(&log.notes)
        .bind(&log.feeling_after)
        .bind(log.created_at)
        .bind(log.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_for_user(log.id, log.user_id)
            .await?
            .ok_or_else(|| AppError::Internal("Created medication log could not be read back".into()))
    }

    async fn update(&self, log: &MedicationLog) -> Result<MedicationLog, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE medication_logs
            SET medication_id = $3, taken_at = $4, notes = $5, feeling_after = $6, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(log.id)
        .bind(log.user_id)
        .bind(log.medication_id)
        .bind(log.taken_at)
        .bind(&log.notes)
        .bind(&log.feeling_after)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Medication log not found".into()));
        }

        self.find_for_user(log.id, log.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Medication log not found".into()))
    }

    async fn delete_for_user(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM medication_logs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_scope_by_user_first() {
        let filter = MedicationLogFilter {
            search: Some("aspirin".into()),
            from: Some(Utc::now()),
            medication_id: Some(Uuid::new_v4()),
            ..MedicationLogFilter::default()
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM medication_logs l");
        push_filters(&mut builder, Uuid::new_v4(), &filter);

        assert_eq!(
            builder.sql(),
            "SELECT 1 FROM medication_logs l WHERE l.user_id = $1 \
             AND (m.name ILIKE $2 OR l.notes ILIKE $3 OR l.feeling_after ILIKE $4) \
             AND l.taken_at >= $5 AND l.medication_id = $6"
        );
    }
}
