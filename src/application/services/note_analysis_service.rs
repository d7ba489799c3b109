//! Note Analysis Service
//!
//! Extracts medication details from free-text notes with a language model
//! and optionally records them as a medication plus an intake log.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::medication_service::MedicationError;
use crate::application::dto::response::NoteAnalysisResponse;
use crate::domain::services::{parse_model_reply, NoteExtraction, NoteExtractor};
use crate::domain::{Medication, MedicationLog, MedicationLogRepository, MedicationRepository};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

#[async_trait]
pub trait NoteAnalysisService: Send + Sync {
    /// Extract fields from `note` without saving anything
    async fn analyze_note(&self, note: &str) -> Result<NoteAnalysisResponse, AnalysisError>;

    /// Extract, then record the medication and an intake log for `user_id`
    async fn analyze_and_save(
        &self,
        user_id: Uuid,
        note: &str,
    ) -> Result<NoteAnalysisResponse, AnalysisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("AI analysis is not configured")]
    NotConfigured,

    #[error("Note must not be empty")]
    EmptyNote,

    #[error("Could not extract medication name from the note")]
    NoMedicationName,

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::NotConfigured => {
                AppError::ServiceUnavailable("AI analysis is not configured".into())
            }
            AnalysisError::EmptyNote => AppError::BadRequest("Note must not be empty".into()),
            AnalysisError::NoMedicationName => {
                AppError::BadRequest("Could not extract medication name from the note".into())
            }
            AnalysisError::Repository(e) => e,
        }
    }
}

impl From<MedicationError> for AnalysisError {
    fn from(e: MedicationError) -> Self {
        AnalysisError::Repository(e.into())
    }
}

pub struct NoteAnalysisServiceImpl<X, M, L>
where
    X: NoteExtractor + ?Sized,
    M: MedicationRepository,
    L: MedicationLogRepository,
{
    extractor: Arc<X>,
    medication_repo: Arc<M>,
    log_repo: Arc<L>,
}

impl<X, M, L> NoteAnalysisServiceImpl<X, M, L>
where
    X: NoteExtractor + ?Sized,
    M: MedicationRepository,
    L: MedicationLogRepository,
{
    pub fn new(extractor: Arc<X>, medication_repo: Arc<M>, log_repo: Arc<L>) -> Self {
        Self {
            extractor,
            medication_repo,
            log_repo,
        }
    }

    /// Ask the model; any upstream or parse failure yields an empty extraction.
    async fn extract(&self, note: &str) -> Result<NoteExtraction, AnalysisError> {
        if note.trim().is_empty() {
            return Err(AnalysisError::EmptyNote);
        }
        if !self.extractor.is_configured() {
            metrics::record_note_analyzed("not_configured");
            return Err(AnalysisError::NotConfigured);
        }

        let (extraction, outcome) = match self.extractor.request_extraction(note).await {
            Ok(reply) => match parse_model_reply(&reply) {
                Some(extraction) => (extraction, "ok"),
                None => {
                    tracing::warn!("Model reply was not valid JSON, using empty extraction");
                    (NoteExtraction::default(), "unparseable")
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Note extraction failed, using empty extraction");
                (NoteExtraction::default(), "upstream_error")
            }
        };
        metrics::record_note_analyzed(outcome);

        Ok(extraction)
    }

    /// Returns the medication and whether it was created by this call
    async fn find_or_create_medication(
        &self,
        user_id: Uuid,
        name: &str,
        extraction: &NoteExtraction,
        note: &str,
    ) -> Result<(Medication, bool), AnalysisError> {
        if let Some(existing) = self
            .medication_repo
            .find_by_name_for_user(name, user_id)
            .await?
        {
            return Ok((existing, false));
        }

        let mut medication = Medication::new(
            user_id,
            name.to_string(),
            extraction.dosage.clone().unwrap_or_default(),
        );
        medication.frequency = extraction.frequency.clone();
        medication.notes = Some(note.to_string());

        Ok((self.medication_repo.create(&medication).await?, true))
    }
}

#[async_trait]
impl<X, M, L> NoteAnalysisService for NoteAnalysisServiceImpl<X, M, L>
where
    X: NoteExtractor + ?Sized + 'static,
    M: MedicationRepository + 'static,
    L: MedicationLogRepository + 'static,
{
    async fn analyze_note(&self, note: &str) -> Result<NoteAnalysisResponse, AnalysisError> {
        let extraction = self.extract(note).await?;
        Ok(NoteAnalysisResponse::unsaved(extraction))
    }

    async fn analyze_and_save(
        &self,
        user_id: Uuid,
        note: &str,
    ) -> Result<NoteAnalysisResponse, AnalysisError> {
        let extraction = self.extract(note).await?;
        let name = extraction
            .medication_name()
            .ok_or(AnalysisError::NoMedicationName)?
            .to_string();

        let (medication, created) = self
            .find_or_create_medication(user_id, &name, &extraction, note)
            .await?;

        let mut log = MedicationLog::new(
            user_id,
            medication.id,
            extraction.taken_at_instant().unwrap_or_else(Utc::now),
        );
        log.notes = Some(note.to_string());
        log.feeling_after = extraction.feeling_after.clone();
        let log = match self.log_repo.create(&log).await {
            Ok(log) => log,
            Err(e) => {
                // Do not leave a medication behind that has no log
                if created {
                    if let Err(cleanup) = self
                        .medication_repo
                        .delete_for_user(medication.id, user_id)
                        .await
                    {
                        tracing::warn!(
                            medication_id = %medication.id,
                            error = %cleanup,
                            "Failed to remove medication after log insert failed"
                        );
                    }
                }
                return Err(e.into());
            }
        };

        tracing::info!(
            medication_id = %medication.id,
            log_id = %log.id,
            "Saved medication log from analyzed note"
        );

        let mut response = NoteAnalysisResponse::unsaved(extraction);
        response.saved = true;
        response.medication_id = Some(medication.id);
        response.log_id = Some(log.id);
        Ok(response)
    }
}
