//! Medication Service
//!
//! Per-user medication management. Another user's medication is reported
//! as not found.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::request::{CreateMedicationRequest, UpdateMedicationRequest};
use crate::domain::{Medication, MedicationRepository};
use crate::shared::error::AppError;

/// Errors of the medication and medication log services
#[derive(Debug, thiserror::Error)]
pub enum MedicationError {
    #[error("Medication not found")]
    MedicationNotFound,

    #[error("Medication log not found")]
    LogNotFound,

    #[error("`from` must not be after `to`")]
    InvertedRange,

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<MedicationError> for AppError {
    fn from(e: MedicationError) -> Self {
        match e {
            MedicationError::MedicationNotFound => {
                AppError::NotFound("Medication not found".into())
            }
            MedicationError::LogNotFound => AppError::NotFound("Medication log not found".into()),
            MedicationError::InvertedRange => {
                AppError::BadRequest("`from` must not be after `to`".into())
            }
            MedicationError::Repository(e) => e,
        }
    }
}

#[async_trait]
pub trait MedicationService: Send + Sync {
    async fn list(&self, user_id: Uuid) -> Result<Vec<Medication>, MedicationError>;

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Medication, MedicationError>;

    async fn create(
        &self,
        user_id: Uuid,
        request: &CreateMedicationRequest,
    ) -> Result<Medication, MedicationError>;

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: &UpdateMedicationRequest,
    ) -> Result<Medication, MedicationError>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), MedicationError>;
}

pub struct MedicationServiceImpl<M>
where
    M: MedicationRepository,
{
    repo: Arc<M>,
}

impl<M> MedicationServiceImpl<M>
where
    M: MedicationRepository,
{
    pub fn new(repo: Arc<M>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<M> MedicationService for MedicationServiceImpl<M>
where
    M: MedicationRepository + 'static,
{
    async fn list(&self, user_id: Uuid) -> Result<Vec<Medication>, MedicationError> {
        Ok(self.repo.list_for_user(user_id).await?)
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Medication, MedicationError> {
        self.repo
            .find_for_user(id, user_id)
            .await?
            .ok_or(MedicationError::MedicationNotFound)
    }

    async fn create(
        &self,
        user_id: Uuid,
        request: &CreateMedicationRequest,
    ) -> Result<Medication, MedicationError> {
        let mut medication = Medication::new(
            user_id,
            request.name.trim().to_string(),
            request.dosage.trim().to_string(),
        );
        medication.frequency = request.frequency.clone();
        medication.notes = request.notes.clone();

        Ok(self.repo.create(&medication).await?)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: &UpdateMedicationRequest,
    ) -> Result<Medication, MedicationError> {
        let mut medication = self.get(id, user_id).await?;

        if let Some(name) = &request.name {
            medication.name = name.trim().to_string();
        }
        if let Some(dosage) = &request.dosage {
            medication.dosage = dosage.trim().to_string();
        }
        if let Some(frequency) = &request.frequency {
            medication.frequency = Some(frequency.clone());
        }
        if let Some(notes) = &request.notes {
            medication.notes = Some(notes.clone());
        }
        medication.updated_at = Utc::now();

        Ok(self.repo.update(&medication).await?)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), MedicationError> {
        if !self.repo.delete_for_user(id, user_id).await? {
            return Err(MedicationError::MedicationNotFound);
        }
        Ok(())
    }
}
