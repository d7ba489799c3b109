//! Upload Service
//!
//! Stores blog images on local disk under generated names. Files are served
//! back from the configured public path.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::dto::response::UploadResponse;
use crate::config::UploadSettings;
use crate::shared::error::AppError;

/// Accepted image types and the extension they are stored with.
const ALLOWED_TYPES: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

#[async_trait]
pub trait UploadService: Send + Sync {
    async fn store_image(
        &self,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<UploadResponse, UploadError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file provided")]
    Empty,

    #[error("File exceeds the {0} byte limit")]
    TooLarge(usize),

    #[error("Only JPEG, PNG, GIF and WebP images are allowed")]
    UnsupportedType,

    #[error("Failed to store file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Empty | UploadError::UnsupportedType => AppError::BadRequest(e.to_string()),
            UploadError::TooLarge(_) => AppError::PayloadTooLarge(e.to_string()),
            UploadError::Io(e) => AppError::Internal(format!("Failed to store file: {}", e)),
        }
    }
}

/// Image type from the file signature.
pub fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    ALLOWED_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
}

pub struct LocalUploadService {
    directory: PathBuf,
    public_path: String,
    max_bytes: usize,
}

impl LocalUploadService {
    pub fn new(settings: &UploadSettings) -> Self {
        Self {
            directory: settings.directory.clone(),
            public_path: settings.public_path.trim_end_matches('/').to_string(),
            max_bytes: settings.max_bytes,
        }
    }
}

#[async_trait]
impl UploadService for LocalUploadService {
    async fn store_image(
        &self,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<UploadResponse, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge(self.max_bytes));
        }

        // The declared type must be allowed and agree with the file signature
        let sniffed = sniff_image_type(bytes).ok_or(UploadError::UnsupportedType)?;
        if let Some(declared) = content_type {
            let declared = declared.split(';').next().unwrap_or("").trim();
            let declared = if declared == "image/jpg" { "image/jpeg" } else { declared };
            if declared != sniffed {
                return Err(UploadError::UnsupportedType);
            }
        }
        let extension = extension_for(sniffed).ok_or(UploadError::UnsupportedType)?;

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::create_dir_all(&self.directory).await?;
        tokio::fs::write(self.directory.join(&filename), bytes).await?;

        tracing::info!(filename = %filename, size = bytes.len(), "Image uploaded");

        Ok(UploadResponse {
            url: format!("{}/{}", self.public_path, filename),
            filename,
            size: bytes.len(),
            content_type: sniffed.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn service(max_bytes: usize) -> (LocalUploadService, PathBuf) {
        let dir = std::env::temp_dir().join(format!("health-tracker-uploads-{}", Uuid::new_v4()));
        let settings = UploadSettings {
            directory: dir.clone(),
            public_path: "/uploads/".into(),
            max_bytes,
        };
        (LocalUploadService::new(&settings), dir)
    }

    #[test_case(&[0xFF, 0xD8, 0xFF, 0xE0], Some("image/jpeg") ; "jpeg")]
    #[test_case(PNG, Some("image/png") ; "png")]
    #[test_case(b"GIF89a....", Some("image/gif") ; "gif")]
    #[test_case(b"RIFF\x00\x00\x00\x00WEBPVP8 ", Some("image/webp") ; "webp")]
    #[test_case(b"%PDF-1.7", None ; "pdf")]
    #[test_case(b"", None ; "empty")]
    fn test_sniff_image_type(bytes: &[u8], expected: Option<&str>) {
        assert_eq!(sniff_image_type(bytes), expected);
    }

    #[tokio::test]
    async fn test_store_png() {
        let (svc, dir) = service(1024);

        let response = svc.store_image(Some("image/png"), PNG).await.unwrap();

        assert!(response.filename.ends_with(".png"));
        assert_eq!(response.url, format!("/uploads/{}", response.filename));
        assert_eq!(response.size, PNG.len());
        assert_eq!(response.content_type, "image/png");
        assert!(dir.join(&response.filename).exists());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_too_large_rejected() {
        let (svc, _) = service(4);
        let err: AppError = svc.store_image(None, PNG).await.unwrap_err().into();
        assert_eq!(err.status_code(), axum::http::StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_mismatched_declared_type_rejected() {
        let (svc, _) = service(1024);
        let result = svc.store_image(Some("image/gif"), PNG).await;
        assert!(matches!(result, Err(UploadError::UnsupportedType)));
    }

    #[tokio::test]
    async fn test_non_image_rejected() {
        let (svc, _) = service(1024);
        let result = svc.store_image(Some("application/pdf"), b"%PDF-1.7").await;
        assert!(matches!(result, Err(UploadError::UnsupportedType)));
    }
}
