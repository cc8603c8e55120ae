//! Candidate-file validation and image payload encoding.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Hard ceiling on accepted image files.
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Please select a valid image file")]
    InvalidFileType,
    #[error("File size too large. Please select an image under 10MB")]
    FileTooLarge,
    #[error("Error reading file")]
    FileReadError(#[source] std::io::Error),
}

/// A file handed over by the host environment, with its declared MIME type.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl CandidateFile {
    /// Read a file from disk, inferring the MIME type from its extension.
    pub async fn load(path: &Path) -> Result<Self, IntakeError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(IntakeError::FileReadError)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            mime_type: mime_for_extension(path).to_string(),
            bytes,
        })
    }

    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Type and size checks, in order; the first failure wins and nothing is
/// encoded.
pub fn validate(file: &CandidateFile) -> Result<(), IntakeError> {
    if !file.mime_type.starts_with("image/") {
        return Err(IntakeError::InvalidFileType);
    }
    if file.byte_len() > MAX_IMAGE_BYTES {
        return Err(IntakeError::FileTooLarge);
    }
    Ok(())
}

/// Base64 data-URI string accepted by the recognition endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload(String);

impl ImagePayload {
    /// Validate the file and encode its bytes as a `data:` URI.
    pub fn encode(file: &CandidateFile) -> Result<Self, IntakeError> {
        validate(file)?;
        let encoded = STANDARD.encode(&file.bytes);
        Ok(Self(format!("data:{};base64,{encoded}", file.mime_type)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn mime_for_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}
