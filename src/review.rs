//! Review screen: working copy of one document under review.
//!
//! Provides the data layer for the side-by-side review screen: extracted
//! field list with simulated confidence flagging, per-field approve/reject
//! marks, edit mode with inline corrections (including line-item cells),
//! and the approve/reject/save outcomes that hand the edited document back
//! to the store.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{keys, Document, FieldState, FieldValue, LineItemColumn, OcrData};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Fields shown on the review screen, in display order.
pub const REVIEW_FIELDS: &[(&str, &str)] = &[
    (keys::INVOICE_NUMBER, "Invoice Number"),
    (keys::VENDOR_NAME, "Vendor Name"),
    (keys::INVOICE_DATE, "Invoice Date"),
    (keys::DUE_DATE, "Due Date"),
    (keys::TOTAL_AMOUNT, "Total Amount"),
    (keys::LINE_ITEMS, "Line Items"),
];

/// Confidence (percent) at or above which a field is considered reliable.
pub const HIGH_CONFIDENCE: u8 = 90;
/// Confidence (percent) below which a field is flagged for attention.
pub const CONFIDENCE_THRESHOLD: u8 = 70;

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("No document is under review")]
    NoActiveReview,
    #[error("Unknown review field: {0}")]
    UnknownField(String),
    #[error("Edit mode is off")]
    NotEditing,
    #[error("Line item {index} does not exist")]
    LineItemOutOfRange { index: usize },
}

/// Confidence band for color-coding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_percent(confidence: u8) -> Self {
        if confidence >= HIGH_CONFIDENCE {
            Self::High
        } else if confidence >= CONFIDENCE_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// How a review ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    /// Store as ready for export.
    Approve,
    Reject,
    /// Keep edits, stay under review.
    Save,
}

/// A single field as rendered on the review screen.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewField {
    pub key: String,
    pub label: String,
    pub value: Option<FieldValue>,
    pub confidence: u8,
    pub confidence_level: ConfidenceLevel,
    pub is_flagged: bool,
    pub state: FieldState,
}

/// Complete data needed to render the review screen.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewData {
    pub document_id: Uuid,
    pub document_name: String,
    pub status_label: String,
    pub editing: bool,
    pub fields: Vec<ReviewField>,
    pub approved_fields: usize,
    pub rejected_fields: usize,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Editable working copy of a document. Nothing reaches the store until
/// one of the outcome methods hands back the edited document.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    original: Document,
    edited: OcrData,
    editing: bool,
    field_states: BTreeMap<String, FieldState>,
    confidences: BTreeMap<String, u8>,
}

impl ReviewSession {
    /// Open a review, drawing a simulated confidence (60–99 %) per field.
    pub fn open(document: Document, rng: &mut impl Rng) -> Self {
        let confidences = REVIEW_FIELDS
            .iter()
            .map(|(key, _)| (key.to_string(), rng.gen_range(60..=99)))
            .collect();
        Self::with_confidences(document, confidences)
    }

    /// Open a review with explicit confidences; missing keys default to 0.
    pub fn with_confidences(document: Document, confidences: BTreeMap<String, u8>) -> Self {
        Self {
            edited: document.ocr_data.clone(),
            original: document,
            editing: false,
            field_states: BTreeMap::new(),
            confidences,
        }
    }

    pub fn document_id(&self) -> Uuid {
        self.original.id
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    pub fn edited_data(&self) -> &OcrData {
        &self.edited
    }

    pub fn field_state(&self, key: &str) -> FieldState {
        self.field_states.get(key).copied().unwrap_or_default()
    }

    pub fn approve_field(&mut self, key: &str) -> Result<(), ReviewError> {
        ensure_review_field(key)?;
        self.field_states.insert(key.to_string(), FieldState::Approved);
        Ok(())
    }

    /// Mark a field as wrong; this switches the session into edit mode.
    pub fn reject_field(&mut self, key: &str) -> Result<(), ReviewError> {
        ensure_review_field(key)?;
        self.field_states.insert(key.to_string(), FieldState::Rejected);
        self.editing = true;
        Ok(())
    }

    /// Replace a field's value. Any key is accepted, as OCR data has no schema.
    pub fn update_field(&mut self, key: &str, value: FieldValue) -> Result<(), ReviewError> {
        if !self.editing {
            return Err(ReviewError::NotEditing);
        }
        self.edited.set(key, value);
        Ok(())
    }

    pub fn update_line_item(
        &mut self,
        index: usize,
        column: LineItemColumn,
        value: impl Into<String>,
    ) -> Result<(), ReviewError> {
        if !self.editing {
            return Err(ReviewError::NotEditing);
        }
        let item = self
            .edited
            .line_items_mut()
            .and_then(|items| items.get_mut(index))
            .ok_or(ReviewError::LineItemOutOfRange { index })?;
        item.set(column, value);
        Ok(())
    }

    /// The reviewed document carrying every edit made so far. The status is
    /// left as-is; the store's approve/reject/save operations set it.
    pub fn edited_document(&self) -> Document {
        Document {
            ocr_data: self.edited.clone(),
            ..self.original.clone()
        }
    }

    pub fn review_data(&self) -> ReviewData {
        let fields: Vec<ReviewField> = REVIEW_FIELDS
            .iter()
            .map(|(key, label)| {
                let confidence = self.confidences.get(*key).copied().unwrap_or(0);
                ReviewField {
                    key: key.to_string(),
                    label: label.to_string(),
                    value: self.edited.get(key).cloned(),
                    confidence,
                    confidence_level: ConfidenceLevel::from_percent(confidence),
                    is_flagged: confidence < CONFIDENCE_THRESHOLD,
                    state: self.field_state(key),
                }
            })
            .collect();

        let count = |state: FieldState| fields.iter().filter(|f| f.state == state).count();

        ReviewData {
            document_id: self.original.id,
            document_name: self.original.name.clone(),
            status_label: self.original.status.label(),
            editing: self.editing,
            approved_fields: count(FieldState::Approved),
            rejected_fields: count(FieldState::Rejected),
            fields,
        }
    }
}

fn ensure_review_field(key: &str) -> Result<(), ReviewError> {
    if REVIEW_FIELDS.iter().any(|(k, _)| *k == key) {
        Ok(())
    } else {
        Err(ReviewError::UnknownField(key.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentStatus;
    use crate::pipeline::sample_invoice;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_document() -> Document {
        Document::new(
            "invoice.pdf",
            "application/pdf",
            DocumentStatus::Reviewing,
            sample_invoice(),
            "register-basic",
        )
    }

    fn fixed_confidences(value: u8) -> BTreeMap<String, u8> {
        REVIEW_FIELDS
            .iter()
            .map(|(k, _)| (k.to_string(), value))
            .collect()
    }

    #[test]
    fn open_assigns_confidence_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let session = ReviewSession::open(make_document(), &mut rng);
            for field in session.review_data().fields {
                assert!((60..=99).contains(&field.confidence), "{}", field.confidence);
            }
        }
    }

    #[test]
    fn confidence_levels() {
        assert_eq!(ConfidenceLevel::from_percent(95), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_percent(90), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_percent(89), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_percent(70), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_percent(69), ConfidenceLevel::Low);
    }

    #[test]
    fn review_data_lists_fields_in_order_and_flags_low_confidence() {
        let mut confidences = fixed_confidences(95);
        confidences.insert(keys::DUE_DATE.into(), 61);
        let session = ReviewSession::with_confidences(make_document(), confidences);

        let data = session.review_data();
        let labels: Vec<&str> = data.fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Invoice Number", "Vendor Name", "Invoice Date", "Due Date", "Total Amount", "Line Items"]
        );
        let flagged: Vec<&str> = data
            .fields
            .iter()
            .filter(|f| f.is_flagged)
            .map(|f| f.key.as_str())
            .collect();
        assert_eq!(flagged, [keys::DUE_DATE]);
        assert_eq!(data.status_label, "reviewing");
    }

    #[test]
    fn fields_start_pending() {
        let session = ReviewSession::with_confidences(make_document(), fixed_confidences(80));
        assert!(session
            .review_data()
            .fields
            .iter()
            .all(|f| f.state == FieldState::Pending));
    }

    #[test]
    fn reject_field_enables_editing() {
        let mut session = ReviewSession::with_confidences(make_document(), fixed_confidences(80));
        assert!(!session.is_editing());
        session.reject_field(keys::VENDOR_NAME).unwrap();
        assert!(session.is_editing());
        assert_eq!(session.field_state(keys::VENDOR_NAME), FieldState::Rejected);
    }

    #[test]
    fn approve_field_counts() {
        let mut session = ReviewSession::with_confidences(make_document(), fixed_confidences(80));
        session.approve_field(keys::INVOICE_NUMBER).unwrap();
        session.approve_field(keys::TOTAL_AMOUNT).unwrap();
        session.reject_field(keys::DUE_DATE).unwrap();
        let data = session.review_data();
        assert_eq!(data.approved_fields, 2);
        assert_eq!(data.rejected_fields, 1);
    }

    #[test]
    fn unknown_field_marks_are_rejected() {
        let mut session = ReviewSession::with_confidences(make_document(), fixed_confidences(80));
        assert!(matches!(
            session.approve_field("shipping_address"),
            Err(ReviewError::UnknownField(_))
        ));
    }

    #[test]
    fn edits_require_edit_mode() {
        let mut session = ReviewSession::with_confidences(make_document(), fixed_confidences(80));
        assert!(matches!(
            session.update_field(keys::VENDOR_NAME, "Acme".into()),
            Err(ReviewError::NotEditing)
        ));
        assert!(matches!(
            session.update_line_item(0, LineItemColumn::Total, "5"),
            Err(ReviewError::NotEditing)
        ));
    }

    #[test]
    fn edits_carry_into_edited_document() {
        let doc = make_document();
        let mut session = ReviewSession::with_confidences(doc.clone(), fixed_confidences(80));
        session.set_editing(true);
        session.update_field(keys::VENDOR_NAME, "Acme Ltd".into()).unwrap();
        session
            .update_line_item(0, LineItemColumn::Quantity, "3")
            .unwrap();

        let edited = session.edited_document();
        assert_eq!(edited.id, doc.id);
        assert_eq!(edited.name, doc.name);
        assert_eq!(edited.status, doc.status);
        assert_eq!(edited.ocr_data.text(keys::VENDOR_NAME).as_deref(), Some("Acme Ltd"));
        assert_eq!(edited.ocr_data.line_items().unwrap()[0].quantity, "3");
        // Untouched fields survive
        assert_eq!(edited.ocr_data.text(keys::INVOICE_NUMBER).as_deref(), Some("INV-2024-001"));
    }

    #[test]
    fn line_item_out_of_range() {
        let mut session = ReviewSession::with_confidences(make_document(), fixed_confidences(80));
        session.set_editing(true);
        assert!(matches!(
            session.update_line_item(4, LineItemColumn::Description, "x"),
            Err(ReviewError::LineItemOutOfRange { index: 4 })
        ));
    }

    #[test]
    fn cancelling_edit_mode_keeps_edits() {
        let mut session = ReviewSession::with_confidences(make_document(), fixed_confidences(80));
        session.set_editing(true);
        session.update_field(keys::DUE_DATE, "2024-03-01".into()).unwrap();
        session.set_editing(false);
        assert_eq!(
            session.edited_data().text(keys::DUE_DATE).as_deref(),
            Some("2024-03-01")
        );
    }
}
