//! Transport-agnostic application state.
//!
//! `CoreState` owns the document store and every per-screen state of the
//! dashboard, and implements the workflows that cross screens (upload →
//! review → dashboard, export → history). The HTTP layer holds it behind
//! an `Arc`; each sub-state has its own lock so screens never block each
//! other. Simulated delays are awaited with no lock held.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::assistant::{self, AssistantSession, Message};
use crate::config::AppConfig;
use crate::dashboard::DashboardSummary;
use crate::export::{self, ExportArtifact, ExportError, ExportRow, ExportSelection};
use crate::history::{ExportHistory, ExportRecord, ExportSummary};
use crate::models::{
    Document, DocumentStatus, ExportFormat, FieldValue, LineItemColumn, OcrData, View,
};
use crate::navigation::{self, Navigator};
use crate::pipeline::{
    DocumentProcessor, ExtractionError, FormatDetection, MockOcrEngine, OcrEngine, UploadedFile,
};
use crate::review::{ReviewData, ReviewError, ReviewOutcome, ReviewSession};
use crate::store::{DocumentStore, StoreError};
use crate::templates::{
    FormAction, FormOutcome, RegisterEntry, RegisterEntryForm, SavedEntry, TemplateError,
    TemplateScreen, TemplateWorkspace,
};

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Review(#[from] ReviewError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

// ═══════════════════════════════════════════════════════════
// Workflow results
// ═══════════════════════════════════════════════════════════

/// Result of the upload-complete workflow.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    pub document: Document,
    pub format: FormatDetection,
    pub review: ReviewData,
    pub active_view: View,
}

/// Result of the export-complete workflow.
#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    pub record: ExportSummary,
    pub artifact: ExportArtifact,
    pub active_view: View,
}

/// Export screen contents: candidates plus checkbox state.
#[derive(Debug, Clone, Serialize)]
pub struct ExportScreen {
    pub candidates: Vec<Document>,
    pub selected: Vec<Uuid>,
    pub all_selected: bool,
}

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    config: AppConfig,
    processor: DocumentProcessor,
    store: RwLock<DocumentStore>,
    navigator: RwLock<Navigator>,
    /// The open review, if any. One document is reviewed at a time.
    review: Mutex<Option<ReviewSession>>,
    /// Assistant transcripts keyed by document id.
    assistant: Mutex<HashMap<Uuid, AssistantSession>>,
    export_selection: Mutex<ExportSelection>,
    history: RwLock<ExportHistory>,
    templates: Mutex<TemplateWorkspace>,
}

impl CoreState {
    /// State backed by the mock OCR engine.
    pub fn new(config: AppConfig) -> Self {
        let engine = Arc::new(MockOcrEngine::new(config.ocr_delay));
        Self::with_engine(config, engine)
    }

    pub fn with_engine(config: AppConfig, engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            config,
            processor: DocumentProcessor::new(engine),
            store: RwLock::new(DocumentStore::new()),
            navigator: RwLock::new(Navigator::new()),
            review: Mutex::new(None),
            assistant: Mutex::new(HashMap::new()),
            export_selection: Mutex::new(ExportSelection::new()),
            history: RwLock::new(ExportHistory::new()),
            templates: Mutex::new(TemplateWorkspace::new()),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // ── Lock access ─────────────────────────────────────────

    pub fn read_store(&self) -> Result<RwLockReadGuard<'_, DocumentStore>, CoreError> {
        self.store.read().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn write_store(&self) -> Result<RwLockWriteGuard<'_, DocumentStore>, CoreError> {
        self.store.write().map_err(|_| CoreError::LockPoisoned)
    }

    fn write_navigator(&self) -> Result<RwLockWriteGuard<'_, Navigator>, CoreError> {
        self.navigator.write().map_err(|_| CoreError::LockPoisoned)
    }

    fn lock_review(&self) -> Result<MutexGuard<'_, Option<ReviewSession>>, CoreError> {
        self.review.lock().map_err(|_| CoreError::LockPoisoned)
    }

    fn lock_assistant(&self) -> Result<MutexGuard<'_, HashMap<Uuid, AssistantSession>>, CoreError> {
        self.assistant.lock().map_err(|_| CoreError::LockPoisoned)
    }

    fn lock_export_selection(&self) -> Result<MutexGuard<'_, ExportSelection>, CoreError> {
        self.export_selection.lock().map_err(|_| CoreError::LockPoisoned)
    }

    fn read_history(&self) -> Result<RwLockReadGuard<'_, ExportHistory>, CoreError> {
        self.history.read().map_err(|_| CoreError::LockPoisoned)
    }

    fn lock_templates(&self) -> Result<MutexGuard<'_, TemplateWorkspace>, CoreError> {
        self.templates.lock().map_err(|_| CoreError::LockPoisoned)
    }

    // ── Navigation ──────────────────────────────────────────

    pub fn active_view(&self) -> Result<View, CoreError> {
        let nav = self.navigator.read().map_err(|_| CoreError::LockPoisoned)?;
        Ok(nav.active())
    }

    pub fn navigate(&self, view: View) -> Result<View, CoreError> {
        Ok(self.write_navigator()?.navigate(view))
    }

    pub fn back(&self) -> Result<View, CoreError> {
        Ok(self.write_navigator()?.back())
    }

    /// Follow a dashboard quick-action tile.
    pub fn dashboard_action(&self, id: &str) -> Result<View, CoreError> {
        let action =
            navigation::dashboard_action(id).ok_or_else(|| CoreError::UnknownAction(id.into()))?;
        self.navigate(action.target)
    }

    pub fn dashboard(&self) -> Result<DashboardSummary, CoreError> {
        let store = self.read_store()?;
        let exports = self.read_history()?.len();
        Ok(DashboardSummary::build(store.documents(), exports))
    }

    // ── Documents ───────────────────────────────────────────

    pub fn documents(&self, status: Option<DocumentStatus>) -> Result<Vec<Document>, CoreError> {
        let store = self.read_store()?;
        Ok(match status {
            Some(s) => store.with_status(s).into_iter().cloned().collect(),
            None => store.documents().to_vec(),
        })
    }

    pub fn document(&self, id: &Uuid) -> Result<Document, CoreError> {
        let store = self.read_store()?;
        store
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(*id).into())
    }

    /// Replace a document wholesale. No transition checks.
    pub fn update_document(&self, doc: Document) -> Result<Document, CoreError> {
        let mut store = self.write_store()?;
        Ok(store.update_document(doc)?.clone())
    }

    // ── Upload workflow ─────────────────────────────────────

    /// Run an upload through OCR, then complete it.
    pub async fn upload(&self, file: UploadedFile) -> Result<UploadResult, CoreError> {
        let outcome = self.processor.process(file).await?;
        let (review, active_view) = self.complete_upload(outcome.document.clone())?;
        Ok(UploadResult {
            document: outcome.document,
            format: outcome.format,
            review,
            active_view,
        })
    }

    /// Upload complete: add the document, select it, open its review and
    /// switch to the review screen, whatever screen was active before.
    pub fn complete_upload(&self, doc: Document) -> Result<(ReviewData, View), CoreError> {
        let id = doc.id;
        {
            let mut store = self.write_store()?;
            store.add_document(doc.clone());
            store.select(&id)?;
        }
        let review = self.start_review(doc)?;
        let view = self.navigate(View::Review)?;
        tracing::info!(document = %id, "Upload complete");
        Ok((review, view))
    }

    // ── Review workflow ─────────────────────────────────────

    /// Select a stored document and open it for review.
    pub fn open_review(&self, id: &Uuid) -> Result<ReviewData, CoreError> {
        let doc = self.write_store()?.select(id)?.clone();
        let review = self.start_review(doc)?;
        self.navigate(View::Review)?;
        Ok(review)
    }

    fn start_review(&self, doc: Document) -> Result<ReviewData, CoreError> {
        let session = ReviewSession::open(doc, &mut rand::thread_rng());
        let data = session.review_data();
        *self.lock_review()? = Some(session);
        Ok(data)
    }

    pub fn review(&self) -> Result<ReviewData, CoreError> {
        let guard = self.lock_review()?;
        let session = guard.as_ref().ok_or(ReviewError::NoActiveReview)?;
        Ok(session.review_data())
    }

    /// Apply `f` to the open review and return the refreshed screen data.
    fn with_review(
        &self,
        f: impl FnOnce(&mut ReviewSession) -> Result<(), ReviewError>,
    ) -> Result<ReviewData, CoreError> {
        let mut guard = self.lock_review()?;
        let session = guard.as_mut().ok_or(ReviewError::NoActiveReview)?;
        f(session)?;
        Ok(session.review_data())
    }

    pub fn approve_field(&self, key: &str) -> Result<ReviewData, CoreError> {
        self.with_review(|s| s.approve_field(key))
    }

    pub fn reject_field(&self, key: &str) -> Result<ReviewData, CoreError> {
        self.with_review(|s| s.reject_field(key))
    }

    pub fn set_editing(&self, editing: bool) -> Result<ReviewData, CoreError> {
        self.with_review(|s| {
            s.set_editing(editing);
            Ok(())
        })
    }

    pub fn update_field(&self, key: &str, value: FieldValue) -> Result<ReviewData, CoreError> {
        self.with_review(|s| s.update_field(key, value))
    }

    pub fn update_line_item(
        &self,
        index: usize,
        column: LineItemColumn,
        value: String,
    ) -> Result<ReviewData, CoreError> {
        self.with_review(|s| s.update_line_item(index, column, value))
    }

    /// Review complete: store the edited document with the outcome's
    /// status, close the review and return to the dashboard.
    pub fn finish_review(&self, outcome: ReviewOutcome) -> Result<Document, CoreError> {
        let mut review = self.lock_review()?;
        let session = review.as_ref().ok_or(ReviewError::NoActiveReview)?;
        let edited = session.edited_document();

        let stored = {
            let mut store = self.write_store()?;
            let stored = match outcome {
                ReviewOutcome::Approve => store.approve(edited)?,
                ReviewOutcome::Reject => store.reject(edited)?,
                ReviewOutcome::Save => store.save_changes(edited)?,
            };
            stored.clone()
        };
        *review = None;
        drop(review);

        self.navigate(View::Dashboard)?;
        tracing::info!(document = %stored.id, status = %stored.status, "Review complete");
        Ok(stored)
    }

    // ── Assistant ───────────────────────────────────────────

    /// The transcript for a document, started on first access.
    pub fn assistant_session(&self, document_id: &Uuid) -> Result<AssistantSession, CoreError> {
        let name = self.document(document_id)?.name;
        let mut sessions = self.lock_assistant()?;
        let session = sessions
            .entry(*document_id)
            .or_insert_with(|| AssistantSession::new(*document_id, &name));
        Ok(session.clone())
    }

    /// Ask the assistant about a document. Blank questions are ignored and
    /// yield `None`; otherwise the reply arrives after the configured delay.
    pub async fn ask_assistant(
        &self,
        document_id: &Uuid,
        question: &str,
    ) -> Result<Option<Message>, CoreError> {
        let name = self.document(document_id)?.name;
        {
            let mut sessions = self.lock_assistant()?;
            let session = sessions
                .entry(*document_id)
                .or_insert_with(|| AssistantSession::new(*document_id, &name));
            if session.push_user(question).is_none() {
                return Ok(None);
            }
        }

        if !self.config.assistant_delay.is_zero() {
            tokio::time::sleep(self.config.assistant_delay).await;
        }

        let data = self.assistant_context(document_id)?;
        let mut sessions = self.lock_assistant()?;
        let session = sessions
            .entry(*document_id)
            .or_insert_with(|| AssistantSession::new(*document_id, &name));
        let reply = session.push_reply(question, &data).clone();
        tracing::debug!(document = %document_id, "Assistant replied");
        Ok(Some(reply))
    }

    pub async fn assistant_quick_action(
        &self,
        document_id: &Uuid,
        action_id: &str,
    ) -> Result<Option<Message>, CoreError> {
        let action = assistant::quick_action(action_id)
            .ok_or_else(|| CoreError::UnknownAction(action_id.into()))?;
        self.ask_assistant(document_id, action.prompt).await
    }

    /// OCR data the assistant sees: the review's working copy when that
    /// document is under review, otherwise the stored data.
    fn assistant_context(&self, document_id: &Uuid) -> Result<OcrData, CoreError> {
        {
            let review = self.lock_review()?;
            if let Some(session) = review.as_ref().filter(|s| s.document_id() == *document_id) {
                return Ok(session.edited_data().clone());
            }
        }
        Ok(self.document(document_id)?.ocr_data)
    }

    // ── Export workflow ─────────────────────────────────────

    pub fn export_screen(&self) -> Result<ExportScreen, CoreError> {
        let candidates: Vec<Document> = self
            .read_store()?
            .ready_for_export()
            .into_iter()
            .cloned()
            .collect();
        let ids: Vec<Uuid> = candidates.iter().map(|d| d.id).collect();
        let selection = self.lock_export_selection()?;
        Ok(ExportScreen {
            selected: selection.ids().to_vec(),
            all_selected: selection.all_selected(&ids),
            candidates,
        })
    }

    pub fn toggle_export_selection(&self, id: Uuid) -> Result<ExportScreen, CoreError> {
        self.lock_export_selection()?.toggle(id);
        self.export_screen()
    }

    pub fn toggle_export_all(&self) -> Result<ExportScreen, CoreError> {
        let ids: Vec<Uuid> = self
            .read_store()?
            .ready_for_export()
            .iter()
            .map(|d| d.id)
            .collect();
        self.lock_export_selection()?.toggle_all(&ids);
        self.export_screen()
    }

    /// Export complete: mark the selected ready documents as exported,
    /// record the export and return to the dashboard.
    ///
    /// `ids` overrides the screen's checkbox selection when given. Only
    /// documents ready for export take part; an empty selection is an
    /// error and changes nothing.
    pub fn export(
        &self,
        ids: Option<Vec<Uuid>>,
        format: ExportFormat,
    ) -> Result<ExportResult, CoreError> {
        let requested = match ids {
            Some(ids) => ids,
            None => self.lock_export_selection()?.ids().to_vec(),
        };

        let now = Utc::now();
        let (record, artifact) = {
            let mut store = self.write_store()?;
            // First occurrence wins so rows and history list each document once.
            let mut seen = HashSet::new();
            let eligible: Vec<Uuid> = requested
                .iter()
                .filter(|id| {
                    store
                        .get(id)
                        .is_some_and(|d| d.status == DocumentStatus::ReadyForExport)
                })
                .filter(|id| seen.insert(**id))
                .copied()
                .collect();
            if eligible.is_empty() {
                return Err(ExportError::NothingSelected.into());
            }

            let rows: Vec<ExportRow> = eligible
                .iter()
                .filter_map(|id| store.get(id))
                .map(ExportRow::from_document)
                .collect();
            // Render before touching the store so an unsupported format
            // leaves every document as it was.
            let artifact = export::render(&rows, format, now.date_naive())?;

            let exported = store.export_selected(&eligible);
            let mut history = self.history.write().map_err(|_| CoreError::LockPoisoned)?;
            let record = ExportSummary::from(history.record(&exported, rows, format, now));
            (record, artifact)
        };

        *self.lock_export_selection()? = ExportSelection::new();
        let active_view = self.navigate(View::Dashboard)?;
        Ok(ExportResult {
            record,
            artifact,
            active_view,
        })
    }

    // ── History ─────────────────────────────────────────────

    pub fn history(&self, format: Option<ExportFormat>) -> Result<Vec<ExportSummary>, CoreError> {
        let history = self.read_history()?;
        Ok(history.list(format).into_iter().map(ExportSummary::from).collect())
    }

    pub fn history_record(&self, id: &Uuid) -> Result<ExportRecord, CoreError> {
        let history = self.read_history()?;
        history
            .get(id)
            .cloned()
            .ok_or_else(|| ExportError::RecordNotFound(*id).into())
    }

    pub fn redownload(&self, id: &Uuid) -> Result<ExportArtifact, CoreError> {
        Ok(self.history_record(id)?.artifact()?)
    }

    // ── Templates ───────────────────────────────────────────

    pub fn template_screen(&self) -> Result<TemplateScreen, CoreError> {
        Ok(self.lock_templates()?.screen())
    }

    pub fn create_template(&self) -> Result<RegisterEntryForm, CoreError> {
        Ok(self.lock_templates()?.create_new()?.clone())
    }

    pub fn use_template(&self, template_id: &str) -> Result<RegisterEntryForm, CoreError> {
        Ok(self.lock_templates()?.use_template(template_id)?.clone())
    }

    pub fn edit_template(&self, template_id: &str) -> Result<RegisterEntryForm, CoreError> {
        Ok(self.lock_templates()?.edit(template_id)?.clone())
    }

    pub fn templates_back(&self) -> Result<TemplateScreen, CoreError> {
        let mut templates = self.lock_templates()?;
        templates.back_to_list();
        Ok(templates.screen())
    }

    pub fn update_form(&self, entry: RegisterEntry) -> Result<RegisterEntryForm, CoreError> {
        Ok(self.lock_templates()?.update_form(entry)?.clone())
    }

    pub fn form_action(&self, action: FormAction) -> Result<FormOutcome, CoreError> {
        Ok(self.lock_templates()?.apply(action)?)
    }

    /// Handle a key press on the form. Keys that are not shortcuts yield `None`.
    pub fn form_shortcut(&self, alt: bool, key: &str) -> Result<Option<FormOutcome>, CoreError> {
        match FormAction::from_shortcut(alt, key) {
            Some(action) => self.form_action(action).map(Some),
            None => Ok(None),
        }
    }

    pub fn saved_entries(&self) -> Result<(Vec<SavedEntry>, Vec<SavedEntry>), CoreError> {
        let templates = self.lock_templates()?;
        Ok((templates.drafts().to_vec(), templates.entries().to_vec()))
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
