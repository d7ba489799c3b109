//! Parsing of the language model's reply to a medication note.
//!
//! The model is asked for a JSON object but commonly wraps it in a fenced
//! code block. The fenced body is preferred; a bare reply is parsed as-is.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::error::AppError;

/// Language model that turns a medication note into a textual reply.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteExtractor: Send + Sync {
    /// False when no provider credentials are configured.
    fn is_configured(&self) -> bool;

    /// Raw model reply for `note`.
    async fn request_extraction(&self, note: &str) -> Result<String, AppError>;
}

/// Fields pulled out of a free-text medication note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteExtraction {
    pub medication_name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub taken_at: Option<String>,
    pub feeling_after: Option<String>,
}

impl NoteExtraction {
    /// Trimmed medication name when one was found.
    pub fn medication_name(&self) -> Option<&str> {
        self.medication_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// `taken_at` when the model produced an RFC 3339 timestamp.
    pub fn taken_at_instant(&self) -> Option<DateTime<Utc>> {
        self.taken_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Body of the first ```json fence, else of the first plain fence, else the
/// whole reply.
pub fn strip_code_fence(reply: &str) -> &str {
    let body = if let Some((_, rest)) = reply.split_once("```json") {
        rest
    } else if let Some((_, rest)) = reply.split_once("```") {
        rest
    } else {
        return reply.trim();
    };

    body.split_once("```")
        .map(|(inner, _)| inner)
        .unwrap_or(body)
        .trim()
}

/// Parse a model reply. Returns None when no JSON object can be read.
pub fn parse_model_reply(reply: &str) -> Option<NoteExtraction> {
    let value: Value = serde_json::from_str(strip_code_fence(reply)).ok()?;
    let object = value.as_object()?;

    let field = |key: &str| -> Option<String> {
        match object.get(key)? {
            Value::String(s) if !s.trim().is_empty() && !s.eq_ignore_ascii_case("null") => {
                Some(s.trim().to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    };

    Some(NoteExtraction {
        medication_name: field("medication_name"),
        dosage: field("dosage"),
        frequency: field("frequency"),
        taken_at: field("taken_at"),
        feeling_after: field("feeling_after"),
    })
}
