//! Document lifecycle store.
//!
//! Holds every uploaded document in upload order plus the currently
//! selected one. All mutation goes through the named operations below;
//! status transitions are one-directional in intent
//! (pending → reviewing → ready_for_export/rejected → exported) but are
//! deliberately not enforced here.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Document, DocumentStatus};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(Uuid),
}

/// Per-status document counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub reviewing: usize,
    pub ready_for_export: usize,
    pub rejected: usize,
    pub exported: usize,
}

#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    selected: Option<Uuid>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document. Id uniqueness is the caller's responsibility.
    pub fn add_document(&mut self, doc: Document) -> &Document {
        tracing::debug!(id = %doc.id, name = %doc.name, status = %doc.status, "Document added");
        self.documents.push(doc);
        &self.documents[self.documents.len() - 1]
    }

    /// Replace the document with the same id. No transition checks.
    pub fn update_document(&mut self, doc: Document) -> Result<&Document, StoreError> {
        let slot = self
            .documents
            .iter_mut()
            .find(|d| d.id == doc.id)
            .ok_or(StoreError::NotFound(doc.id))?;
        tracing::debug!(id = %doc.id, from = %slot.status, to = %doc.status, "Document updated");
        *slot = doc;
        Ok(slot)
    }

    /// Store the reviewed document (with its edits) as ready for export.
    pub fn approve(&mut self, mut doc: Document) -> Result<&Document, StoreError> {
        doc.status = DocumentStatus::ReadyForExport;
        self.update_document(doc)
    }

    /// Store the reviewed document (with its edits) as rejected.
    pub fn reject(&mut self, mut doc: Document) -> Result<&Document, StoreError> {
        doc.status = DocumentStatus::Rejected;
        self.update_document(doc)
    }

    /// Store intermediate review edits; the document stays under review.
    pub fn save_changes(&mut self, mut doc: Document) -> Result<&Document, StoreError> {
        doc.status = DocumentStatus::Reviewing;
        self.update_document(doc)
    }

    /// Mark exactly the documents whose id is in `ids` as exported.
    ///
    /// Unknown ids are ignored. Returns clones of the exported documents
    /// in store order.
    pub fn export_selected(&mut self, ids: &[Uuid]) -> Vec<Document> {
        let wanted: HashSet<&Uuid> = ids.iter().collect();
        let mut exported = Vec::new();
        for doc in self.documents.iter_mut().filter(|d| wanted.contains(&d.id)) {
            doc.status = DocumentStatus::Exported;
            exported.push(doc.clone());
        }
        tracing::info!(requested = ids.len(), exported = exported.len(), "Documents exported");
        exported
    }

    pub fn get(&self, id: &Uuid) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == *id)
    }

    /// All documents in upload order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Documents approved and waiting for export.
    pub fn ready_for_export(&self) -> Vec<&Document> {
        self.with_status(DocumentStatus::ReadyForExport)
    }

    pub fn with_status(&self, status: DocumentStatus) -> Vec<&Document> {
        self.documents.iter().filter(|d| d.status == status).collect()
    }

    pub fn count_by_status(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for doc in &self.documents {
            match doc.status {
                DocumentStatus::Pending => counts.pending += 1,
                DocumentStatus::Reviewing => counts.reviewing += 1,
                DocumentStatus::ReadyForExport => counts.ready_for_export += 1,
                DocumentStatus::Rejected => counts.rejected += 1,
                DocumentStatus::Exported => counts.exported += 1,
            }
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Select a document for review. Unknown ids are rejected.
    pub fn select(&mut self, id: &Uuid) -> Result<&Document, StoreError> {
        let doc = self
            .documents
            .iter()
            .find(|d| d.id == *id)
            .ok_or(StoreError::NotFound(*id))?;
        self.selected = Some(doc.id);
        Ok(doc)
    }

    /// The currently selected document, if it is still in the store.
    pub fn current(&self) -> Option<&Document> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{keys, FieldValue, OcrData};

    fn make_doc(name: &str, status: DocumentStatus) -> Document {
        let ocr: OcrData = [
            (keys::INVOICE_NUMBER, FieldValue::from("INV-1")),
            (keys::VENDOR_NAME, FieldValue::from("Acme")),
        ]
        .into_iter()
        .collect();
        Document::new(name, "application/pdf", status, ocr, "register-basic")
    }

    #[test]
    fn add_document_grows_collection_with_unique_ids() {
        let mut store = DocumentStore::new();
        for i in 0..25 {
            store.add_document(make_doc(&format!("doc-{i}.pdf"), DocumentStatus::Pending));
        }
        assert_eq!(store.len(), 25);
        let ids: HashSet<Uuid> = store.documents().iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), 25);
    }

    #[test]
    fn add_document_does_not_check_duplicates() {
        let mut store = DocumentStore::new();
        let doc = make_doc("a.pdf", DocumentStatus::Pending);
        store.add_document(doc.clone());
        store.add_document(doc);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn update_replaces_matching_document() {
        let mut store = DocumentStore::new();
        let mut doc = make_doc("a.pdf", DocumentStatus::Reviewing);
        store.add_document(doc.clone());

        doc.ocr_data.set(keys::VENDOR_NAME, "Globex".into());
        doc.status = DocumentStatus::Exported;
        store.update_document(doc.clone()).unwrap();

        let stored = store.get(&doc.id).unwrap();
        assert_eq!(stored.status, DocumentStatus::Exported);
        assert_eq!(stored.ocr_data.text(keys::VENDOR_NAME).as_deref(), Some("Globex"));
    }

    #[test]
    fn update_unknown_document_fails() {
        let mut store = DocumentStore::new();
        let doc = make_doc("ghost.pdf", DocumentStatus::Pending);
        assert!(matches!(
            store.update_document(doc),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn approve_sets_ready_for_export_and_keeps_edits() {
        let mut store = DocumentStore::new();
        let mut doc = make_doc("a.pdf", DocumentStatus::Reviewing);
        store.add_document(doc.clone());

        doc.ocr_data.set(keys::INVOICE_NUMBER, "INV-999".into());
        doc.ocr_data.set("po_reference", "PO-7".into());
        let approved = store.approve(doc.clone()).unwrap();

        assert_eq!(approved.status, DocumentStatus::ReadyForExport);
        assert_eq!(approved.ocr_data.text(keys::INVOICE_NUMBER).as_deref(), Some("INV-999"));
        assert_eq!(approved.ocr_data.text("po_reference").as_deref(), Some("PO-7"));
    }

    #[test]
    fn approve_from_any_status() {
        for status in DocumentStatus::all() {
            let mut store = DocumentStore::new();
            let doc = make_doc("a.pdf", *status);
            store.add_document(doc.clone());
            let approved = store.approve(doc).unwrap();
            assert_eq!(approved.status, DocumentStatus::ReadyForExport);
        }
    }

    #[test]
    fn reject_and_save_set_expected_status() {
        let mut store = DocumentStore::new();
        let doc = make_doc("a.pdf", DocumentStatus::Reviewing);
        store.add_document(doc.clone());

        assert_eq!(store.reject(doc.clone()).unwrap().status, DocumentStatus::Rejected);
        assert_eq!(store.save_changes(doc).unwrap().status, DocumentStatus::Reviewing);
    }

    #[test]
    fn export_selected_touches_exactly_the_selection() {
        let mut store = DocumentStore::new();
        let docs: Vec<Document> = (0..6)
            .map(|i| make_doc(&format!("d{i}.pdf"), DocumentStatus::ReadyForExport))
            .collect();
        for d in &docs {
            store.add_document(d.clone());
        }

        let selection = vec![docs[1].id, docs[4].id, Uuid::new_v4()];
        let exported = store.export_selected(&selection);
        assert_eq!(exported.len(), 2);

        for doc in store.documents() {
            if doc.id == docs[1].id || doc.id == docs[4].id {
                assert_eq!(doc.status, DocumentStatus::Exported);
            } else {
                assert_eq!(doc.status, DocumentStatus::ReadyForExport);
            }
        }
    }

    #[test]
    fn export_selected_lists_repeated_ids_once() {
        let mut store = DocumentStore::new();
        let ready = make_doc("ready.pdf", DocumentStatus::ReadyForExport);
        let reviewing = make_doc("reviewing.pdf", DocumentStatus::Reviewing);
        let rejected = make_doc("rejected.pdf", DocumentStatus::Rejected);
        for d in [&ready, &reviewing, &rejected] {
            store.add_document(d.clone());
        }

        let exported = store.export_selected(&[ready.id, ready.id, reviewing.id, ready.id]);
        let ids: Vec<Uuid> = exported.iter().map(|d| d.id).collect();
        assert_eq!(ids, [ready.id, reviewing.id]);

        assert_eq!(store.get(&ready.id).unwrap().status, DocumentStatus::Exported);
        assert_eq!(store.get(&reviewing.id).unwrap().status, DocumentStatus::Exported);
        assert_eq!(store.get(&rejected.id).unwrap().status, DocumentStatus::Rejected);
    }

    #[test]
    fn export_selected_with_empty_selection_changes_nothing() {
        let mut store = DocumentStore::new();
        store.add_document(make_doc("a.pdf", DocumentStatus::ReadyForExport));
        assert!(store.export_selected(&[]).is_empty());
        assert_eq!(store.ready_for_export().len(), 1);
    }

    #[test]
    fn count_by_status_tallies_each_status() {
        let mut store = DocumentStore::new();
        store.add_document(make_doc("a", DocumentStatus::Pending));
        store.add_document(make_doc("b", DocumentStatus::ReadyForExport));
        store.add_document(make_doc("c", DocumentStatus::ReadyForExport));
        store.add_document(make_doc("d", DocumentStatus::Exported));

        let counts = store.count_by_status();
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.ready_for_export, 2);
        assert_eq!(counts.exported, 1);
        assert_eq!(counts.rejected, 0);
    }

    #[test]
    fn select_and_current() {
        let mut store = DocumentStore::new();
        assert!(store.current().is_none());

        let doc = make_doc("a.pdf", DocumentStatus::Reviewing);
        store.add_document(doc.clone());
        store.select(&doc.id).unwrap();
        assert_eq!(store.current().unwrap().id, doc.id);

        assert!(store.select(&Uuid::new_v4()).is_err());
        // Failed selection keeps the previous one
        assert_eq!(store.current().unwrap().id, doc.id);
    }
}
