//! Calendar projection of medication logs.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::MedicationLog;

/// Length of the block each intake occupies on the calendar.
pub const INTAKE_EVENT_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub medication_id: Uuid,
    pub notes: Option<String>,
    pub feeling_after: Option<String>,
}

impl CalendarEvent {
    pub fn from_log(log: &MedicationLog) -> Self {
        let title = log
            .medication
            .as_ref()
            .map(|m| m.display_title())
            .unwrap_or_else(|| "Medication".to_string());

        Self {
            id: log.id,
            title,
            start: log.taken_at,
            end: log.taken_at + Duration::minutes(INTAKE_EVENT_MINUTES),
            all_day: false,
            medication_id: log.medication_id,
            notes: log.notes.clone(),
            feeling_after: log.feeling_after.clone(),
        }
    }
}

/// Project logs onto calendar events, keeping their order.
pub fn to_calendar_events(logs: &[MedicationLog]) -> Vec<CalendarEvent> {
    logs.iter().map(CalendarEvent::from_log).collect()
}
