//! Export history: one record per completed export, kept in memory.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::export::{self, ExportArtifact, ExportError, ExportRow};
use crate::models::{keys, Document, ExportFormat, ExportStatus};

/// Summary of one document inside an export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedDocument {
    pub id: Uuid,
    pub name: String,
    pub template_type: String,
    pub invoice_number: Option<String>,
    pub vendor_name: Option<String>,
    pub amount: Option<String>,
}

impl From<&Document> for ExportedDocument {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            name: doc.name.clone(),
            template_type: doc.template_type.clone(),
            invoice_number: doc.ocr_data.text(keys::INVOICE_NUMBER),
            vendor_name: doc.ocr_data.text(keys::VENDOR_NAME),
            amount: doc.ocr_data.text(keys::TOTAL_AMOUNT),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportRecord {
    pub id: Uuid,
    pub export_date: DateTime<Utc>,
    pub format: ExportFormat,
    pub document_count: usize,
    pub documents: Vec<ExportedDocument>,
    pub rows: Vec<ExportRow>,
    pub status: ExportStatus,
}

impl ExportRecord {
    /// Sum of document amounts, formatted like `1,250.00`.
    pub fn total_amount(&self) -> String {
        let total: f64 = self
            .documents
            .iter()
            .filter_map(|d| d.amount.as_deref())
            .filter_map(parse_amount)
            .sum();
        format_amount(total)
    }

    /// Re-render the artifact this export produced.
    pub fn artifact(&self) -> Result<ExportArtifact, ExportError> {
        export::render(&self.rows, self.format, self.export_date.date_naive())
    }
}

/// List item for the history screen.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub id: Uuid,
    pub export_date: DateTime<Utc>,
    pub format: ExportFormat,
    pub document_count: usize,
    pub status: ExportStatus,
    pub total_amount: String,
}

impl From<&ExportRecord> for ExportSummary {
    fn from(record: &ExportRecord) -> Self {
        Self {
            id: record.id,
            export_date: record.export_date,
            format: record.format,
            document_count: record.document_count,
            status: record.status,
            total_amount: record.total_amount(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ExportHistory {
    records: Vec<ExportRecord>,
}

impl ExportHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed export of `documents`.
    pub fn record(
        &mut self,
        documents: &[Document],
        rows: Vec<ExportRow>,
        format: ExportFormat,
        export_date: DateTime<Utc>,
    ) -> &ExportRecord {
        let record = ExportRecord {
            id: Uuid::new_v4(),
            export_date,
            format,
            document_count: documents.len(),
            documents: documents.iter().map(ExportedDocument::from).collect(),
            rows,
            status: ExportStatus::Completed,
        };
        tracing::info!(id = %record.id, format = %format, documents = record.document_count, "Export recorded");
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Records newest first, optionally only those in `format`.
    pub fn list(&self, format: Option<ExportFormat>) -> Vec<&ExportRecord> {
        self.records
            .iter()
            .rev()
            .filter(|r| format.map_or(true, |f| r.format == f))
            .collect()
    }

    pub fn get(&self, id: &Uuid) -> Option<&ExportRecord> {
        self.records.iter().find(|r| r.id == *id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse an amount that may carry thousands separators. Unparsable
/// amounts are skipped by the caller.
fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "").trim().parse().ok()
}

/// Two decimals with comma thousands separators.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
