//! OpenAI-compatible chat completions client used for note extraction.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AiSettings;
use crate::domain::services::NoteExtractor;
use crate::shared::error::AppError;

const EXTRACTION_PROMPT: &str = r#"You are a medical assistant that extracts information about medications from user notes.
Extract the following information from the user's medication note:
- Medication name
- Dosage
- Frequency (how often they take it)
- When they took it (time/date, ISO 8601 when possible)
- Any side effects or feelings after taking it

User note: {note}

Respond with a JSON object in the following format:
```json
{
  "medication_name": "name of the medication",
  "dosage": "dosage information",
  "frequency": "how often they take it",
  "taken_at": "when they took it",
  "feeling_after": "any feelings or side effects mentioned"
}
```

If any information is not provided in the note, use null for that field."#;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

pub fn extraction_prompt(note: &str) -> String {
    EXTRACTION_PROMPT.replace("{note}", note)
}

pub struct OpenAiNoteExtractor {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
}

impl OpenAiNoteExtractor {
    pub fn new(settings: &AiSettings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: settings
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            model: settings.model.clone(),
        })
    }

    async fn call(&self, api_key: &str, note: &str) -> Result<String, AppError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".into(),
                content: extraction_prompt(note),
            }],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::ServiceUnavailable(format!("Language model request failed: {}", e)))?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::ServiceUnavailable(format!("Invalid language model response: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::ServiceUnavailable("Language model returned no choices".into()))
    }
}

#[async_trait]
impl NoteExtractor for OpenAiNoteExtractor {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn request_extraction(&self, note: &str) -> Result<String, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::ServiceUnavailable("AI analysis is not configured".into()))?;

        self.call(api_key, note).await
    }
}
