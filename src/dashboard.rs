//! Dashboard home screen: headline totals and the recent-activity feed.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Document, DocumentStatus};

/// Number of documents shown under "Recent Activity".
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityItem {
    pub document_id: Uuid,
    pub name: String,
    /// "Approved" when ready for export, otherwise "Uploaded".
    pub label: &'static str,
}

impl From<&Document> for ActivityItem {
    fn from(doc: &Document) -> Self {
        Self {
            document_id: doc.id,
            name: doc.name.clone(),
            label: if doc.status == DocumentStatus::ReadyForExport {
                "Approved"
            } else {
                "Uploaded"
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_documents: usize,
    pub approved_documents: usize,
    pub total_exports: usize,
    pub recent_activity: Vec<ActivityItem>,
}

impl DashboardSummary {
    /// Build from the documents in upload order and the export count.
    pub fn build(documents: &[Document], total_exports: usize) -> Self {
        Self {
            total_documents: documents.len(),
            approved_documents: documents
                .iter()
                .filter(|d| d.status == DocumentStatus::ReadyForExport)
                .count(),
            total_exports,
            recent_activity: documents
                .iter()
                .take(RECENT_ACTIVITY_LIMIT)
                .map(ActivityItem::from)
                .collect(),
        }
    }
}
