use std::time::Duration;

use async_trait::async_trait;

use super::upload::UploadedFile;
use super::ExtractionError;
use crate::models::{keys, FieldValue, LineItem, OcrData};

/// OCR engine abstraction (allows swapping the mock for a real backend).
///
/// Extraction is an explicit async operation: callers await the returned
/// future and never observe how latency is produced.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Short engine identifier for logs.
    fn name(&self) -> &'static str;

    async fn extract(&self, file: &UploadedFile) -> Result<OcrData, ExtractionError>;
}

/// Mock OCR engine: waits a fixed delay, then returns a canned invoice.
pub struct MockOcrEngine {
    delay: Duration,
    sample: OcrData,
}

impl MockOcrEngine {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            sample: sample_invoice(),
        }
    }

    /// Engine returning `sample` instead of the built-in invoice.
    pub fn with_sample(delay: Duration, sample: OcrData) -> Self {
        Self { delay, sample }
    }
}

#[async_trait]
impl OcrEngine for MockOcrEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn extract(&self, file: &UploadedFile) -> Result<OcrData, ExtractionError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        tracing::debug!(file = %file.name, fields = self.sample.len(), "Mock OCR complete");
        Ok(self.sample.clone())
    }
}

/// The fixed invoice every mock extraction produces.
pub fn sample_invoice() -> OcrData {
    [
        (keys::INVOICE_NUMBER, FieldValue::from("INV-2024-001")),
        (keys::VENDOR_NAME, FieldValue::from("Sample Vendor Corp")),
        (keys::INVOICE_DATE, FieldValue::from("2024-01-15")),
        (keys::DUE_DATE, FieldValue::from("2024-02-15")),
        (keys::TOTAL_AMOUNT, FieldValue::from("1250.00")),
        (keys::SUBTOTAL, FieldValue::from("1000.00")),
        (keys::TAX_AMOUNT, FieldValue::from("250.00")),
        (
            keys::LINE_ITEMS,
            FieldValue::LineItems(vec![LineItem {
                description: "Professional Services".into(),
                quantity: "1".into(),
                unit_price: "1000.00".into(),
                total: "1000.00".into(),
            }]),
        ),
    ]
    .into_iter()
    .collect()
}
