//! Medication Log Service
//!
//! Intake logging, filtered listings, CSV export and the calendar view.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::medication_service::MedicationError;
use crate::application::dto::request::{
    CalendarQuery, CreateMedicationLogRequest, MedicationLogQuery, UpdateMedicationLogRequest,
};
use crate::domain::services::{logs_to_csv, to_calendar_events, CalendarEvent};
use crate::domain::{
    MedicationLog, MedicationLogFilter, MedicationLogRepository, MedicationRepository,
};

#[async_trait]
pub trait MedicationLogService: Send + Sync {
    async fn list(
        &self,
        user_id: Uuid,
        query: &MedicationLogQuery,
    ) -> Result<Vec<MedicationLog>, MedicationError>;

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<MedicationLog, MedicationError>;

    async fn create(
        &self,
        user_id: Uuid,
        request: &CreateMedicationLogRequest,
    ) -> Result<MedicationLog, MedicationError>;

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: &UpdateMedicationLogRequest,
    ) -> Result<MedicationLog, MedicationError>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), MedicationError>;

    /// CSV document of the logs matching `query`
    async fn export_csv(
        &self,
        user_id: Uuid,
        query: &MedicationLogQuery,
    ) -> Result<String, MedicationError>;

    async fn calendar(
        &self,
        user_id: Uuid,
        query: &CalendarQuery,
    ) -> Result<Vec<CalendarEvent>, MedicationError>;
}

fn filter_from_query(query: &MedicationLogQuery) -> Result<MedicationLogFilter, MedicationError> {
    let filter = MedicationLogFilter {
        search: query.search.clone(),
        from: query.from,
        to: query.to,
        medication_id: query.medication_id,
    };
    if filter.has_inverted_range() {
        return Err(MedicationError::InvertedRange);
    }
    Ok(filter)
}

pub struct MedicationLogServiceImpl<L, M>
where
    L: MedicationLogRepository,
    M: MedicationRepository,
{
    log_repo: Arc<L>,
    medication_repo: Arc<M>,
}

impl<L, M> MedicationLogServiceImpl<L, M>
where
    L: MedicationLogRepository,
    M: MedicationRepository,
{
    pub fn new(log_repo: Arc<L>, medication_repo: Arc<M>) -> Self {
        Self {
            log_repo,
            medication_repo,
        }
    }

    async fn ensure_owned_medication(
        &self,
        medication_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), MedicationError> {
        self.medication_repo
            .find_for_user(medication_id, user_id)
            .await?
            .map(|_| ())
            .ok_or(MedicationError::MedicationNotFound)
    }
}

#[async_trait]
impl<L, M> MedicationLogService for MedicationLogServiceImpl<L, M>
where
    L: MedicationLogRepository + 'static,
    M: MedicationRepository + 'static,
{
    async fn list(
        &self,
        user_id: Uuid,
        query: &MedicationLogQuery,
    ) -> Result<Vec<MedicationLog>, MedicationError> {
        let filter = filter_from_query(query)?;
        Ok(self.log_repo.list_for_user(user_id, &filter).await?)
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<MedicationLog, MedicationError> {
        self.log_repo
            .find_for_user(id, user_id)
            .await?
            .ok_or(MedicationError::LogNotFound)
    }

    async fn create(
        &self,
        user_id: Uuid,
        request: &CreateMedicationLogRequest,
    ) -> Result<MedicationLog, MedicationError> {
        self.ensure_owned_medication(request.medication_id, user_id)
            .await?;

        let mut log = MedicationLog::new(
            user_id,
            request.medication_id,
            request.taken_at.unwrap_or_else(Utc::now),
        );
        log.notes = request.notes.clone();
        log.feeling_after = request.feeling_after.clone();

        Ok(self.log_repo.create(&log).await?)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: &UpdateMedicationLogRequest,
    ) -> Result<MedicationLog, MedicationError> {
        let mut log = self.get(id, user_id).await?;

        if let Some(medication_id) = request.medication_id {
            if medication_id != log.medication_id {
                self.ensure_owned_medication(medication_id, user_id).await?;
                log.medication_id = medication_id;
            }
        }
        if let Some(taken_at) = request.taken_at {
            log.taken_at = taken_at;
        }
        if let Some(notes) = &request.notes {
            log.notes = Some(notes.clone());
        }
        if let Some(feeling) = &request.feeling_after {
            log.feeling_after = Some(feeling.clone());
        }
        log.updated_at = Utc::now();

        Ok(self.log_repo.update(&log).await?)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), MedicationError> {
        if !self.log_repo.delete_for_user(id, user_id).await? {
            return Err(MedicationError::LogNotFound);
        }
        Ok(())
    }

    async fn export_csv(
        &self,
        user_id: Uuid,
        query: &MedicationLogQuery,
    ) -> Result<String, MedicationError> {
        let logs = self.list(user_id, query).await?;
        Ok(logs_to_csv(&logs))
    }

    async fn calendar(
        &self,
        user_id: Uuid,
        query: &CalendarQuery,
    ) -> Result<Vec<CalendarEvent>, MedicationError> {
        let filter = filter_from_query(&MedicationLogQuery {
            from: query.from,
            to: query.to,
            ..Default::default()
        })?;
        let logs = self.log_repo.list_for_user(user_id, &filter).await?;
        Ok(to_calendar_events(&logs))
    }
}
