//! Document processing: upload → format detection → OCR → new document.
//!
//! Uses a trait object for the OCR engine so the processor stays testable
//! with the mock and a real backend can be dropped in later.

use std::sync::Arc;

use serde::Serialize;

use super::ocr::OcrEngine;
use super::upload::{detect_format, FormatDetection, UploadedFile};
use super::ExtractionError;
use crate::models::{Document, DocumentStatus};

/// Template assigned to freshly processed documents.
pub const DEFAULT_TEMPLATE: &str = "register-basic";

/// Output of processing one upload.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingOutcome {
    pub document: Document,
    pub format: FormatDetection,
    pub engine: &'static str,
}

/// Drives an upload through format detection and OCR.
#[derive(Clone)]
pub struct DocumentProcessor {
    engine: Arc<dyn OcrEngine>,
}

impl DocumentProcessor {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }

    /// Process an upload into a document ready for review.
    ///
    /// Completes when the engine's extraction future completes. Unsupported
    /// formats are logged but still processed.
    pub async fn process(&self, file: UploadedFile) -> Result<ProcessingOutcome, ExtractionError> {
        let format = detect_format(&file);
        if !format.category.is_supported() {
            tracing::warn!(file = %file.name, mime = %format.mime_type, "Unsupported upload type, processing anyway");
        }
        if format.exceeds_advertised_limit {
            tracing::warn!(file = %file.name, size = format.file_size_bytes, "Upload exceeds advertised size limit");
        }

        let ocr_data = self.engine.extract(&file).await?;

        let document = Document::new(
            file.name,
            format.mime_type.clone(),
            DocumentStatus::Reviewing,
            ocr_data,
            DEFAULT_TEMPLATE,
        );

        tracing::info!(
            id = %document.id,
            name = %document.name,
            category = format.category.as_str(),
            engine = self.engine.name(),
            "Document processed"
        );

        Ok(ProcessingOutcome {
            document,
            format,
            engine: self.engine.name(),
        })
    }
}
