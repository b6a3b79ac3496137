//! Extraction templates and the register-entry form built from them.
//!
//! The template screen has three modes: the template list, "create" (a
//! fresh form from a template) and "edit". Forms support reset, save-draft
//! and submit, also reachable through Alt+R / Alt+D / Alt+S.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const REGISTER_BASIC: &str = "register-basic";
pub const REGISTER_GST: &str = "register-gst";

static CAMEL_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([A-Z])").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),
    #[error("No register entry form is open")]
    NoOpenForm,
    #[error("Register entry is invalid: {}", summarize(.0))]
    Invalid(Vec<FieldIssue>),
}

/// A validation problem on one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

// ═══════════════════════════════════════════
// Template catalog
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub fields: &'static [&'static str],
}

impl Template {
    pub fn has_gst(&self) -> bool {
        self.id == REGISTER_GST
    }

    /// Field names as shown on template cards.
    pub fn field_labels(&self) -> Vec<String> {
        self.fields.iter().map(|f| humanize_field(f)).collect()
    }
}

pub const TEMPLATES: &[Template] = &[
    Template {
        id: REGISTER_BASIC,
        name: "Register Entry - Basic",
        description: "Basic register entry with Supplier, Party, Bill Number, Date, and Amount",
        fields: &["supplier", "party", "billNumber", "registerDate", "amount"],
    },
    Template {
        id: REGISTER_GST,
        name: "Register Entry - With GST",
        description: "Register entry with additional GST Percentage field",
        fields: &["supplier", "party", "billNumber", "registerDate", "amount", "gstPercentage"],
    },
];

pub fn find_template(id: &str) -> Result<&'static Template, TemplateError> {
    TEMPLATES
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| TemplateError::NotFound(id.to_string()))
}

/// `billNumber` → `Bill Number`
pub fn humanize_field(name: &str) -> String {
    let spaced = CAMEL_BOUNDARY.replace_all(name, " $1");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const SUPPLIERS: &[SelectOption] = &[
    SelectOption { value: "supplier1", label: "ABC Corp" },
    SelectOption { value: "supplier2", label: "XYZ Ltd" },
    SelectOption { value: "supplier3", label: "Global Supplies Inc" },
    SelectOption { value: "supplier4", label: "Metro Trading Co" },
];

pub const PARTIES: &[SelectOption] = &[
    SelectOption { value: "party1", label: "Client A" },
    SelectOption { value: "party2", label: "Client B" },
    SelectOption { value: "party3", label: "Client C" },
    SelectOption { value: "party4", label: "Internal Department" },
];

// ═══════════════════════════════════════════
// Register-entry form
// ═══════════════════════════════════════════

/// Form values. Numbers stay as typed until submit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterEntry {
    pub supplier: String,
    pub party: String,
    pub bill_number: String,
    pub register_date: Option<NaiveDate>,
    pub amount: String,
    pub gst_percentage: String,
}

impl RegisterEntry {
    /// Check the entry against `template`, collecting every issue.
    pub fn validate(&self, template: &Template) -> Result<(), TemplateError> {
        let mut issues = Vec::new();
        let mut issue = |field: &'static str, message: &str| {
            issues.push(FieldIssue {
                field,
                message: message.to_string(),
            })
        };

        if self.supplier.is_empty() {
            issue("supplier", "is required");
        } else if !SUPPLIERS.iter().any(|o| o.value == self.supplier) {
            issue("supplier", "is not a known supplier");
        }
        if self.party.is_empty() {
            issue("party", "is required");
        } else if !PARTIES.iter().any(|o| o.value == self.party) {
            issue("party", "is not a known party");
        }
        if self.bill_number.trim().is_empty() {
            issue("billNumber", "is required");
        }
        if self.register_date.is_none() {
            issue("registerDate", "is required");
        }
        match parse_number(&self.amount) {
            None if self.amount.trim().is_empty() => issue("amount", "is required"),
            None => issue("amount", "must be a number"),
            Some(v) if v < 0.0 => issue("amount", "must not be negative"),
            Some(_) => {}
        }
        if template.has_gst() {
            match parse_number(&self.gst_percentage) {
                None if self.gst_percentage.trim().is_empty() => issue("gstPercentage", "is required"),
                None => issue("gstPercentage", "must be a number"),
                Some(v) if !(0.0..=100.0).contains(&v) => {
                    issue("gstPercentage", "must be between 0 and 100")
                }
                Some(_) => {}
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(TemplateError::Invalid(issues))
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Form actions and their keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormAction {
    Reset,
    SaveDraft,
    Submit,
}

impl FormAction {
    /// Map a key press to an action. Only Alt-chords are shortcuts.
    pub fn from_shortcut(alt: bool, key: &str) -> Option<Self> {
        if !alt {
            return None;
        }
        match key.to_lowercase().as_str() {
            "r" => Some(Self::Reset),
            "d" => Some(Self::SaveDraft),
            "s" => Some(Self::Submit),
            _ => None,
        }
    }

    pub fn shortcut(&self) -> &'static str {
        match self {
            Self::Reset => "Alt+R",
            Self::SaveDraft => "Alt+D",
            Self::Submit => "Alt+S",
        }
    }
}

/// A draft or submitted register entry.
#[derive(Debug, Clone, Serialize)]
pub struct SavedEntry {
    pub id: Uuid,
    pub template_id: &'static str,
    pub entry: RegisterEntry,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "entry", rename_all = "snake_case")]
pub enum FormOutcome {
    Reset,
    DraftSaved(SavedEntry),
    Submitted(SavedEntry),
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterEntryForm {
    pub template: &'static Template,
    pub editing: bool,
    pub entry: RegisterEntry,
}

impl RegisterEntryForm {
    pub fn new(template: &'static Template, editing: bool) -> Self {
        Self {
            template,
            editing,
            entry: RegisterEntry::default(),
        }
    }

    pub fn title(&self) -> &'static str {
        match (self.editing, self.template.has_gst()) {
            (true, true) => "Edit Register Entry - With GST Template",
            (true, false) => "Edit Register Entry - Basic Template",
            (false, true) => "Register Entry Template - With GST",
            (false, false) => "Register Entry Template - Basic",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        if self.editing {
            "Modify your register entry form template"
        } else {
            "Create and customize your register entry form"
        }
    }

    fn snapshot(&self) -> SavedEntry {
        SavedEntry {
            id: Uuid::new_v4(),
            template_id: self.template.id,
            entry: self.entry.clone(),
            saved_at: Utc::now(),
        }
    }
}

// ═══════════════════════════════════════════
// Template screen
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateMode {
    #[default]
    List,
    Create,
    Edit,
}

/// What the template screen currently shows.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateScreen {
    pub mode: TemplateMode,
    pub title: &'static str,
    pub subtitle: Option<&'static str>,
    pub form: Option<RegisterEntryForm>,
}

/// Template screen state plus the drafts and entries saved from it.
#[derive(Debug, Default)]
pub struct TemplateWorkspace {
    mode: TemplateMode,
    form: Option<RegisterEntryForm>,
    drafts: Vec<SavedEntry>,
    entries: Vec<SavedEntry>,
}

impl TemplateWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> TemplateScreen {
        match &self.form {
            Some(form) => TemplateScreen {
                mode: self.mode,
                title: form.title(),
                subtitle: Some(form.subtitle()),
                form: Some(form.clone()),
            },
            None => TemplateScreen {
                mode: TemplateMode::List,
                title: "Manage Templates",
                subtitle: None,
                form: None,
            },
        }
    }

    /// "Create New Template": a blank basic form.
    pub fn create_new(&mut self) -> Result<&RegisterEntryForm, TemplateError> {
        self.open(REGISTER_BASIC, TemplateMode::Create)
    }

    /// "Use Template": a blank form from `template_id`.
    pub fn use_template(&mut self, template_id: &str) -> Result<&RegisterEntryForm, TemplateError> {
        self.open(template_id, TemplateMode::Create)
    }

    pub fn edit(&mut self, template_id: &str) -> Result<&RegisterEntryForm, TemplateError> {
        self.open(template_id, TemplateMode::Edit)
    }

    fn open(&mut self, template_id: &str, mode: TemplateMode) -> Result<&RegisterEntryForm, TemplateError> {
        let template = find_template(template_id)?;
        self.mode = mode;
        let form = self
            .form
            .insert(RegisterEntryForm::new(template, mode == TemplateMode::Edit));
        Ok(&*form)
    }

    pub fn back_to_list(&mut self) {
        self.mode = TemplateMode::List;
        self.form = None;
    }

    pub fn update_form(&mut self, entry: RegisterEntry) -> Result<&RegisterEntryForm, TemplateError> {
        let form = self.form.as_mut().ok_or(TemplateError::NoOpenForm)?;
        form.entry = entry;
        Ok(&*form)
    }

    pub fn apply(&mut self, action: FormAction) -> Result<FormOutcome, TemplateError> {
        let form = self.form.as_mut().ok_or(TemplateError::NoOpenForm)?;
        match action {
            FormAction::Reset => {
                form.entry = RegisterEntry::default();
                Ok(FormOutcome::Reset)
            }
            FormAction::SaveDraft => {
                let saved = form.snapshot();
                tracing::debug!(id = %saved.id, template = saved.template_id, "Draft saved");
                self.drafts.push(saved.clone());
                Ok(FormOutcome::DraftSaved(saved))
            }
            FormAction::Submit => {
                form.entry.validate(form.template)?;
                let saved = form.snapshot();
                tracing::info!(id = %saved.id, template = saved.template_id, "Register entry submitted");
                self.entries.push(saved.clone());
                Ok(FormOutcome::Submitted(saved))
            }
        }
    }

    pub fn drafts(&self) -> &[SavedEntry] {
        &self.drafts
    }

    pub fn entries(&self) -> &[SavedEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_entry() -> RegisterEntry {
        RegisterEntry {
            supplier: "supplier1".into(),
            party: "party4".into(),
            bill_number: "B-100".into(),
            register_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            amount: "1500.00".into(),
            gst_percentage: String::new(),
        }
    }

    fn issue_fields(err: TemplateError) -> Vec<&'static str> {
        match err {
            TemplateError::Invalid(issues) => issues.into_iter().map(|i| i.field).collect(),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn humanizes_camel_case_fields() {
        assert_eq!(humanize_field("billNumber"), "Bill Number");
        assert_eq!(humanize_field("gstPercentage"), "Gst Percentage");
        assert_eq!(humanize_field("supplier"), "Supplier");
        assert_eq!(humanize_field(""), "");
    }

    #[test]
    fn catalog_has_basic_and_gst() {
        let basic = find_template(REGISTER_BASIC).unwrap();
        let gst = find_template(REGISTER_GST).unwrap();
        assert!(!basic.has_gst());
        assert!(gst.has_gst());
        assert_eq!(gst.fields.len(), basic.fields.len() + 1);
        assert_eq!(
            basic.field_labels(),
            ["Supplier", "Party", "Bill Number", "Register Date", "Amount"]
        );
        assert!(matches!(find_template("invoice-v2"), Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn register_entry_uses_camel_case_json() {
        let json = serde_json::to_value(valid_entry()).unwrap();
        assert_eq!(json["billNumber"], "B-100");
        assert_eq!(json["registerDate"], "2024-06-01");

        let parsed: RegisterEntry = serde_json::from_str(r#"{"supplier":"supplier2"}"#).unwrap();
        assert_eq!(parsed.supplier, "supplier2");
        assert!(parsed.register_date.is_none());
    }

    #[test]
    fn valid_basic_entry_passes() {
        let basic = find_template(REGISTER_BASIC).unwrap();
        assert!(valid_entry().validate(basic).is_ok());
    }

    #[test]
    fn blank_entry_reports_every_required_field() {
        let gst = find_template(REGISTER_GST).unwrap();
        let err = RegisterEntry::default().validate(gst).unwrap_err();
        assert_eq!(
            issue_fields(err),
            ["supplier", "party", "billNumber", "registerDate", "amount", "gstPercentage"]
        );
    }

    #[test]
    fn amount_and_gst_ranges() {
        let gst = find_template(REGISTER_GST).unwrap();

        let mut entry = valid_entry();
        entry.amount = "-1".into();
        entry.gst_percentage = "18".into();
        assert_eq!(issue_fields(entry.validate(gst).unwrap_err()), ["amount"]);

        let mut entry = valid_entry();
        entry.gst_percentage = "101".into();
        assert_eq!(issue_fields(entry.validate(gst).unwrap_err()), ["gstPercentage"]);

        let mut entry = valid_entry();
        entry.gst_percentage = "0".into();
        entry.amount = "0".into();
        assert!(entry.validate(gst).is_ok());
    }

    #[test]
    fn unknown_options_are_rejected() {
        let basic = find_template(REGISTER_BASIC).unwrap();
        let mut entry = valid_entry();
        entry.supplier = "supplier9".into();
        assert_eq!(issue_fields(entry.validate(basic).unwrap_err()), ["supplier"]);
    }

    #[test]
    fn shortcuts_need_alt() {
        assert_eq!(FormAction::from_shortcut(true, "R"), Some(FormAction::Reset));
        assert_eq!(FormAction::from_shortcut(true, "d"), Some(FormAction::SaveDraft));
        assert_eq!(FormAction::from_shortcut(true, "s"), Some(FormAction::Submit));
        assert_eq!(FormAction::from_shortcut(false, "s"), None);
        assert_eq!(FormAction::from_shortcut(true, "x"), None);
        assert_eq!(FormAction::Submit.shortcut(), "Alt+S");
    }

    #[test]
    fn form_titles() {
        let basic = find_template(REGISTER_BASIC).unwrap();
        let gst = find_template(REGISTER_GST).unwrap();
        assert_eq!(RegisterEntryForm::new(basic, false).title(), "Register Entry Template - Basic");
        assert_eq!(RegisterEntryForm::new(gst, false).title(), "Register Entry Template - With GST");
        assert_eq!(RegisterEntryForm::new(basic, true).title(), "Edit Register Entry - Basic Template");
        assert_eq!(RegisterEntryForm::new(gst, true).title(), "Edit Register Entry - With GST Template");
    }

    #[test]
    fn screen_modes() {
        let mut ws = TemplateWorkspace::new();
        assert_eq!(ws.screen().mode, TemplateMode::List);

        ws.create_new().unwrap();
        let screen = ws.screen();
        assert_eq!(screen.mode, TemplateMode::Create);
        assert_eq!(screen.form.unwrap().template.id, REGISTER_BASIC);

        ws.edit(REGISTER_GST).unwrap();
        assert_eq!(ws.screen().title, "Edit Register Entry - With GST Template");

        ws.back_to_list();
        assert_eq!(ws.screen().mode, TemplateMode::List);
        assert!(ws.screen().form.is_none());
    }

    #[test]
    fn actions_need_an_open_form() {
        let mut ws = TemplateWorkspace::new();
        assert!(matches!(ws.apply(FormAction::Reset), Err(TemplateError::NoOpenForm)));
        assert!(matches!(
            ws.update_form(valid_entry()),
            Err(TemplateError::NoOpenForm)
        ));
    }

    #[test]
    fn draft_submit_and_reset() {
        let mut ws = TemplateWorkspace::new();
        ws.use_template(REGISTER_BASIC).unwrap();

        // Drafts skip validation
        ws.update_form(RegisterEntry {
            bill_number: "WIP".into(),
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(ws.apply(FormAction::SaveDraft), Ok(FormOutcome::DraftSaved(_))));
        assert_eq!(ws.drafts().len(), 1);

        // Invalid submit keeps nothing
        assert!(matches!(ws.apply(FormAction::Submit), Err(TemplateError::Invalid(_))));
        assert!(ws.entries().is_empty());

        ws.update_form(valid_entry()).unwrap();
        match ws.apply(FormAction::Submit).unwrap() {
            FormOutcome::Submitted(saved) => assert_eq!(saved.entry, valid_entry()),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(ws.entries().len(), 1);

        ws.apply(FormAction::Reset).unwrap();
        assert_eq!(ws.screen().form.unwrap().entry, RegisterEntry::default());
    }
}
