use base64::Engine;
use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Upload size the dashboard advertises. Advisory only: larger files are
/// flagged but still processed.
pub const ADVERTISED_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024; // 10MB

/// A file handed over by the upload screen.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Decode a base64 payload, accepting either raw base64 or a
    /// `data:<mime>;base64,<payload>` URL.
    pub fn from_base64(name: impl Into<String>, data: &str) -> Result<Self, ExtractionError> {
        let encoded = match data.split_once(";base64,") {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => data,
        };
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| ExtractionError::InvalidPayload(e.to_string()))?;
        Ok(Self::new(name, bytes))
    }
}

/// Broad file categories the upload screen offers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Pdf,
    Image,
    Unsupported,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Unsupported => "unsupported",
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

/// Result of format detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatDetection {
    pub mime_type: String,
    pub category: FileCategory,
    pub file_size_bytes: usize,
    pub exceeds_advertised_limit: bool,
}

/// Detect the upload's format from magic bytes, falling back to the
/// filename's extension when the bytes are not recognized.
pub fn detect_format(file: &UploadedFile) -> FormatDetection {
    let header = &file.bytes[..file.bytes.len().min(8)];

    let (mime_type, category) = match header {
        // PDF: starts with %PDF
        [0x25, 0x50, 0x44, 0x46, ..] => ("application/pdf".to_string(), FileCategory::Pdf),
        // JPEG: starts with FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => ("image/jpeg".to_string(), FileCategory::Image),
        // PNG: starts with 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => ("image/png".to_string(), FileCategory::Image),
        _ => {
            let guessed = mime_guess::from_path(&file.name).first_or_octet_stream();
            let category = match guessed.essence_str() {
                "application/pdf" => FileCategory::Pdf,
                "image/jpeg" | "image/png" => FileCategory::Image,
                _ => FileCategory::Unsupported,
            };
            (guessed.essence_str().to_string(), category)
        }
    };

    FormatDetection {
        mime_type,
        category,
        file_size_bytes: file.bytes.len(),
        exceeds_advertised_limit: file.bytes.len() > ADVERTISED_MAX_UPLOAD_BYTES,
    }
}
