//! Note Analysis Handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::application::dto::request::AnalyzeNoteRequest;
use crate::application::dto::response::NoteAnalysisResponse;
use crate::application::services::{NoteAnalysisService, NoteAnalysisServiceImpl};
use crate::domain::services::NoteExtractor;
use crate::infrastructure::metrics;
use crate::infrastructure::repositories::{PgMedicationLogRepository, PgMedicationRepository};
use crate::presentation::http::extractors::ValidatedJson;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn note_analysis_service(
    state: &AppState,
) -> NoteAnalysisServiceImpl<dyn NoteExtractor, PgMedicationRepository, PgMedicationLogRepository>
{
    NoteAnalysisServiceImpl::new(
        Arc::clone(&state.note_extractor),
        Arc::new(PgMedicationRepository::new(state.db.clone())),
        Arc::new(PgMedicationLogRepository::new(state.db.clone())),
    )
}

/// Extract medication details from a free-text note without saving
pub async fn analyze_note(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(body): ValidatedJson<AnalyzeNoteRequest>,
) -> Result<Json<NoteAnalysisResponse>, AppError> {
    Ok(Json(note_analysis_service(&state).analyze_note(&body.note).await?))
}

/// Extract, then record the medication and an intake log
pub async fn analyze_and_save(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<AnalyzeNoteRequest>,
) -> Result<Json<NoteAnalysisResponse>, AppError> {
    let response = note_analysis_service(&state)
        .analyze_and_save(auth.user_id, &body.note)
        .await?;
    metrics::record_medication_log_created("note");

    Ok(Json(response))
}
