//! Medication Log Handlers
//!
//! Intake history, CSV export and calendar projection for the current user.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::dto::request::{
    CalendarQuery, CreateMedicationLogRequest, MedicationLogQuery, UpdateMedicationLogRequest,
};
use crate::application::services::{MedicationLogService, MedicationLogServiceImpl};
use crate::domain::services::CalendarEvent;
use crate::domain::MedicationLog;
use crate::infrastructure::metrics;
use crate::infrastructure::repositories::{PgMedicationLogRepository, PgMedicationRepository};
use crate::presentation::http::extractors::ValidatedJson;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn medication_log_service(
    state: &AppState,
) -> MedicationLogServiceImpl<PgMedicationLogRepository, PgMedicationRepository> {
    MedicationLogServiceImpl::new(
        Arc::new(PgMedicationLogRepository::new(state.db.clone())),
        Arc::new(PgMedicationRepository::new(state.db.clone())),
    )
}

fn export_filename(now: DateTime<Utc>) -> String {
    format!("medication-logs-{}.csv", now.format("%Y-%m-%d"))
}

pub async fn list_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MedicationLogQuery>,
) -> Result<Json<Vec<MedicationLog>>, AppError> {
    Ok(Json(
        medication_log_service(&state)
            .list(auth.user_id, &query)
            .await?,
    ))
}

pub async fn get_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MedicationLog>, AppError> {
    Ok(Json(medication_log_service(&state).get(id, auth.user_id).await?))
}

pub async fn create_log(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateMedicationLogRequest>,
) -> Result<(StatusCode, Json<MedicationLog>), AppError> {
    let log = medication_log_service(&state)
        .create(auth.user_id, &body)
        .await?;
    metrics::record_medication_log_created("manual");

    Ok((StatusCode::CREATED, Json(log)))
}

pub async fn update_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateMedicationLogRequest>,
) -> Result<Json<MedicationLog>, AppError> {
    Ok(Json(
        medication_log_service(&state)
            .update(id, auth.user_id, &body)
            .await?,
    ))
}

pub async fn delete_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    medication_log_service(&state).delete(id, auth.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Logs matching the list filters as a CSV attachment
pub async fn export_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MedicationLogQuery>,
) -> Result<impl IntoResponse, AppError> {
    let csv = medication_log_service(&state)
        .export_csv(auth.user_id, &query)
        .await?;
    let disposition = format!("attachment; filename=\"{}\"", export_filename(Utc::now()));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

pub async fn calendar(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Vec<CalendarEvent>>, AppError> {
    Ok(Json(
        medication_log_service(&state)
            .calendar(auth.user_id, &query)
            .await?,
    ))
}
