use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::enums::DocumentStatus;

/// Well-known OCR field keys produced by the invoice extractor.
pub mod keys {
    pub const INVOICE_NUMBER: &str = "invoice_number";
    pub const VENDOR_NAME: &str = "vendor_name";
    pub const INVOICE_DATE: &str = "invoice_date";
    pub const DUE_DATE: &str = "due_date";
    pub const TOTAL_AMOUNT: &str = "total_amount";
    pub const SUBTOTAL: &str = "subtotal";
    pub const TAX_AMOUNT: &str = "tax_amount";
    pub const LINE_ITEMS: &str = "line_items";
}

/// An uploaded document and its (extracted, possibly edited) field data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub upload_date: DateTime<Utc>,
    pub status: DocumentStatus,
    pub ocr_data: OcrData,
    pub template_type: String,
}

impl Document {
    /// Create a document with a fresh id and the current upload time.
    pub fn new(
        name: impl Into<String>,
        file_type: impl Into<String>,
        status: DocumentStatus,
        ocr_data: OcrData,
        template_type: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            file_type: file_type.into(),
            upload_date: Utc::now(),
            status,
            ocr_data,
            template_type: template_type.into(),
        }
    }
}

/// Unstructured field name → value mapping. No schema is enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OcrData(BTreeMap<String, FieldValue>);

impl OcrData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Scalar field rendered as text. Line-item lists yield `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(FieldValue::as_text)
    }

    pub fn line_items(&self) -> Option<&[LineItem]> {
        match self.0.get(keys::LINE_ITEMS) {
            Some(FieldValue::LineItems(items)) => Some(items),
            _ => None,
        }
    }

    pub fn line_items_mut(&mut self) -> Option<&mut Vec<LineItem>> {
        match self.0.get_mut(keys::LINE_ITEMS) {
            Some(FieldValue::LineItems(items)) => Some(items),
            _ => None,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        self.0.insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for OcrData {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A single OCR field value, kept in the JSON type it arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Text(String),
    Number(serde_json::Number),
    LineItems(Vec<LineItem>),
    /// Any other JSON shape (objects, non-item arrays), passed through as is.
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null | Self::LineItems(_) | Self::Other(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Invoice sub-record. Columns are free text once edited, so numbers are
/// accepted on input and held as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "string_or_number")]
    pub description: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub quantity: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub unit_price: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub total: String,
}

/// Editable columns of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemColumn {
    Description,
    Quantity,
    UnitPrice,
    Total,
}

impl LineItem {
    pub fn set(&mut self, column: LineItemColumn, value: impl Into<String>) {
        let value = value.into();
        match column {
            LineItemColumn::Description => self.description = value,
            LineItemColumn::Quantity => self.quantity = value,
            LineItemColumn::UnitPrice => self.unit_price = value,
            LineItemColumn::Total => self.total = value,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Null(()) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ocr_data_accepts_mixed_values() {
        let json = r#"{
            "invoice_number": "INV-1",
            "total_amount": 1250.5,
            "line_items": [
                {"description": "Services", "quantity": 1, "unit_price": "1000.00", "total": "1000.00"}
            ]
        }"#;
        let data: OcrData = serde_json::from_str(json).unwrap();
        assert_eq!(data.text(keys::INVOICE_NUMBER).as_deref(), Some("INV-1"));
        assert_eq!(data.text(keys::TOTAL_AMOUNT).as_deref(), Some("1250.5"));
        let items = data.line_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, "1");
        assert_eq!(items[0].unit_price, "1000.00");
    }

    #[test]
    fn ocr_data_accepts_null_bool_and_nested_values() {
        let json = r#"{"po": null, "paid": true, "meta": {"pages": 2}, "tags": ["a", "b"]}"#;
        let data: OcrData = serde_json::from_str(json).unwrap();
        assert_eq!(data.get("po"), Some(&FieldValue::Null));
        assert_eq!(data.get("paid"), Some(&FieldValue::Bool(true)));
        assert_eq!(data.text("paid").as_deref(), Some("true"));
        assert!(data.text("po").is_none());
        assert!(matches!(data.get("meta"), Some(FieldValue::Other(_))));
        assert!(matches!(data.get("tags"), Some(FieldValue::Other(_))));

        let back = serde_json::to_value(&data).unwrap();
        assert_eq!(back, serde_json::from_str::<serde_json::Value>(json).unwrap());
    }

    #[test]
    fn document_with_null_field_deserializes() {
        let doc = Document::new(
            "a.pdf",
            "application/pdf",
            DocumentStatus::Reviewing,
            [("po", FieldValue::Null)].into_iter().collect(),
            "register-basic",
        );
        let json = serde_json::to_string(&doc).unwrap();
        let parsed: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn text_of_line_items_is_none() {
        let data: OcrData = [(keys::LINE_ITEMS, FieldValue::LineItems(vec![]))]
            .into_iter()
            .collect();
        assert!(data.text(keys::LINE_ITEMS).is_none());
        assert!(data.text(keys::VENDOR_NAME).is_none());
    }

    #[test]
    fn document_serializes_file_type_as_type() {
        let doc = Document::new(
            "invoice.pdf",
            "application/pdf",
            DocumentStatus::Reviewing,
            OcrData::new(),
            "register-basic",
        );
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["type"], "application/pdf");
        assert_eq!(json["status"], "reviewing");
        assert!(json.get("file_type").is_none());
    }

    #[test]
    fn line_item_set_updates_column() {
        let mut item = LineItem::default();
        item.set(LineItemColumn::UnitPrice, "12.50");
        item.set(LineItemColumn::Description, "Paper");
        assert_eq!(item.unit_price, "12.50");
        assert_eq!(item.description, "Paper");
    }

    #[test]
    fn line_item_missing_columns_default_to_empty() {
        let item: LineItem = serde_json::from_str(r#"{"description": "Only"}"#).unwrap();
        assert_eq!(item.description, "Only");
        assert!(item.quantity.is_empty());
    }
}
