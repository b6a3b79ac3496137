//! Active-view state for the dashboard shell.
//!
//! A single value selects the screen. There is no history stack: going
//! back always lands on the dashboard.

use serde::Serialize;

use crate::models::View;

#[derive(Debug, Default)]
pub struct Navigator {
    active: View,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> View {
        self.active
    }

    /// Switch to `view`. No guards.
    pub fn navigate(&mut self, view: View) -> View {
        if self.active != view {
            tracing::debug!(from = %self.active, to = %view, "Navigate");
        }
        self.active = view;
        view
    }

    pub fn back(&mut self) -> View {
        self.navigate(View::Dashboard)
    }
}

/// Dashboard shortcut tile.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NavAction {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub target: View,
}

pub const DASHBOARD_ACTIONS: &[NavAction] = &[
    NavAction {
        id: "upload",
        label: "Upload New Invoices",
        description: "Add invoices for OCR processing",
        target: View::Upload,
    },
    NavAction {
        id: "review",
        label: "Review Pending",
        description: "Verify extracted data",
        target: View::Review,
    },
    NavAction {
        id: "history",
        label: "View Processed",
        description: "Access completed invoices",
        target: View::History,
    },
    NavAction {
        id: "templates",
        label: "Manage Templates",
        description: "Configure extraction rules",
        target: View::Templates,
    },
];

pub fn dashboard_action(id: &str) -> Option<&'static NavAction> {
    DASHBOARD_ACTIONS.iter().find(|a| a.id == id)
}
