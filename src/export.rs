//! Export of approved documents as a downloadable JSON artifact.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{keys, Document, ExportFormat, FieldValue};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Please select at least one document to export")]
    NothingSelected,
    #[error("Export format not supported yet: {0}")]
    UnsupportedFormat(ExportFormat),
    #[error("Export not found: {0}")]
    RecordNotFound(Uuid),
    #[error("Export serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One exported document. Values are copied from the OCR data in their
/// original JSON type; absent values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub invoice_number: Option<FieldValue>,
    pub vendor_name: Option<FieldValue>,
    pub total_amount: Option<FieldValue>,
    pub invoice_date: Option<FieldValue>,
}

impl ExportRow {
    pub fn from_document(doc: &Document) -> Self {
        let field = |key: &str| doc.ocr_data.get(key).filter(|v| !v.is_null()).cloned();
        Self {
            invoice_number: field(keys::INVOICE_NUMBER),
            vendor_name: field(keys::VENDOR_NAME),
            total_amount: field(keys::TOTAL_AMOUNT),
            invoice_date: field(keys::INVOICE_DATE),
        }
    }
}

/// A rendered export, ready to hand to the browser as a download.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
}

/// Pretty-printed JSON array, 2-space indented.
pub fn to_json_pretty(rows: &[ExportRow]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(rows)?)
}

pub fn parse_json(body: &str) -> Result<Vec<ExportRow>, ExportError> {
    Ok(serde_json::from_str(body)?)
}

/// `export_YYYY-MM-DD.<ext>`
pub fn file_name(date: NaiveDate, format: ExportFormat) -> String {
    let ext = match format {
        ExportFormat::Json => "json",
        ExportFormat::Csv => "csv",
        ExportFormat::Excel => "xlsx",
        ExportFormat::Xml => "xml",
    };
    format!("export_{}.{ext}", date.format("%Y-%m-%d"))
}

/// Render `rows` in `format`. Only JSON is produced.
pub fn render(
    rows: &[ExportRow],
    format: ExportFormat,
    date: NaiveDate,
) -> Result<ExportArtifact, ExportError> {
    match format {
        ExportFormat::Json => Ok(ExportArtifact {
            file_name: file_name(date, format),
            content_type: "application/json",
            body: to_json_pretty(rows)?,
        }),
        other => Err(ExportError::UnsupportedFormat(other)),
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Checkbox state of the export screen. Keeps selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSelection {
    ids: Vec<Uuid>,
}

impl ExportSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: Uuid) {
        if let Some(pos) = self.ids.iter().position(|s| *s == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    /// Select every candidate, or clear the selection if all are already
    /// selected.
    pub fn toggle_all(&mut self, candidates: &[Uuid]) {
        if self.all_selected(candidates) {
            self.ids.clear();
        } else {
            self.ids = candidates.to_vec();
        }
    }

    pub fn all_selected(&self, candidates: &[Uuid]) -> bool {
        !candidates.is_empty()
            && self.ids.len() == candidates.len()
            && candidates.iter().all(|c| self.ids.contains(c))
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[Uuid] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
