//! Medication Handlers
//!
//! Every operation is scoped to the authenticated user.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::application::dto::request::{CreateMedicationRequest, UpdateMedicationRequest};
use crate::application::services::{MedicationService, MedicationServiceImpl};
use crate::domain::Medication;
use crate::infrastructure::repositories::PgMedicationRepository;
use crate::presentation::http::extractors::ValidatedJson;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn medication_service(state: &AppState) -> MedicationServiceImpl<PgMedicationRepository> {
    MedicationServiceImpl::new(Arc::new(PgMedicationRepository::new(state.db.clone())))
}

pub async fn list_medications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Medication>>, AppError> {
    Ok(Json(medication_service(&state).list(auth.user_id).await?))
}

pub async fn get_medication(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Medication>, AppError> {
    Ok(Json(medication_service(&state).get(id, auth.user_id).await?))
}

pub async fn create_medication(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateMedicationRequest>,
) -> Result<(StatusCode, Json<Medication>), AppError> {
    let medication = medication_service(&state).create(auth.user_id, &body).await?;

    Ok((StatusCode::CREATED, Json(medication)))
}

pub async fn update_medication(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateMedicationRequest>,
) -> Result<Json<Medication>, AppError> {
    Ok(Json(
        medication_service(&state)
            .update(id, auth.user_id, &body)
            .await?,
    ))
}

pub async fn delete_medication(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    medication_service(&state).delete(id, auth.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
