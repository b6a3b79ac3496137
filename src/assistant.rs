//! Review assistant: a rule-based responder that answers questions about
//! the document under review.
//!
//! Rules are evaluated in order and the first keyword hit wins. Replies
//! interpolate the document's OCR fields; anything else falls back to a
//! generic prompt echoing the question.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{keys, MessageRole, OcrData};

/// Shown in place of a field the OCR data does not carry.
const NOT_DETECTED: &str = "not detected";

// ═══════════════════════════════════════════
// Responder
// ═══════════════════════════════════════════

/// What a question is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Vendor,
    Amount,
    Date,
    LineItems,
    General,
}

/// Ordered topic rules. Keywords are lowercase.
const RULES: &[(Topic, &[&str])] = &[
    (Topic::Vendor, &["vendor", "company"]),
    (Topic::Amount, &["amount", "total"]),
    (Topic::Date, &["date"]),
    (Topic::LineItems, &["line items", "items"]),
];

impl Topic {
    /// Classify a question by case-insensitive keyword match.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        RULES
            .iter()
            .find(|(_, triggers)| triggers.iter().any(|t| lower.contains(t)))
            .map(|(topic, _)| *topic)
            .unwrap_or(Topic::General)
    }
}

/// Produce the assistant's reply to `message` for a document's OCR data.
pub fn respond(message: &str, data: &OcrData) -> String {
    let field = |key: &str| data.text(key).unwrap_or_else(|| NOT_DETECTED.to_string());

    match Topic::classify(message) {
        Topic::Vendor => format!(
            "Based on the document, I can see the vendor name appears to be \"{}\". \
             This looks correct based on typical invoice formats. \
             Would you like me to suggest any corrections?",
            field(keys::VENDOR_NAME)
        ),
        Topic::Amount => format!(
            "The total amount detected is ${}. I can help verify this by checking if the \
             subtotal (${}) plus tax (${}) equals the total. Would you like me to recalculate?",
            field(keys::TOTAL_AMOUNT),
            field(keys::SUBTOTAL),
            field(keys::TAX_AMOUNT)
        ),
        Topic::Date => format!(
            "I see the invoice date is {} and due date is {}. These dates look properly \
             formatted. Do you need help with date validation or reformatting?",
            field(keys::INVOICE_DATE),
            field(keys::DUE_DATE)
        ),
        Topic::LineItems => format!(
            "I found {} line items. I can help verify quantities, prices, and descriptions. \
             Would you like me to check the calculations for each line item?",
            data.line_items().map_or(0, <[_]>::len)
        ),
        Topic::General => format!(
            "I understand you need help with \"{message}\". I can assist with field \
             validation, data correction suggestions, or help fill in missing information. \
             Could you be more specific about which field you'd like help with?"
        ),
    }
}

// ═══════════════════════════════════════════
// Quick actions
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuickAction {
    pub id: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction {
        id: "validate-amounts",
        label: "Validate all amounts",
        prompt: "Please validate all monetary amounts in this document",
    },
    QuickAction {
        id: "check-vendor",
        label: "Check vendor information",
        prompt: "Help me verify the vendor information",
    },
    QuickAction {
        id: "review-line-items",
        label: "Review line items",
        prompt: "Can you help me review the line items for accuracy?",
    },
];

pub fn quick_action(id: &str) -> Option<&'static QuickAction> {
    QUICK_ACTIONS.iter().find(|a| a.id == id)
}

// ═══════════════════════════════════════════
// Session transcript
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: MessageRole, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            timestamp: Utc::now(),
        }
    }
}

/// Conversation with the assistant about one document.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantSession {
    pub document_id: Uuid,
    pub messages: Vec<Message>,
}

impl AssistantSession {
    /// Start a transcript with the welcome message.
    pub fn new(document_id: Uuid, document_name: &str) -> Self {
        let welcome = format!(
            "Hello! I'm here to help you review and correct the OCR data for {document_name}. \
             I can help clarify field values, suggest corrections, or auto-fill missing \
             information. What would you like assistance with?"
        );
        Self {
            document_id,
            messages: vec![Message::new(MessageRole::Assistant, welcome)],
        }
    }

    /// Append a user message. Blank input is ignored and yields `None`.
    pub fn push_user(&mut self, content: &str) -> Option<&Message> {
        if content.trim().is_empty() {
            return None;
        }
        self.messages
            .push(Message::new(MessageRole::User, content.to_string()));
        self.messages.last()
    }

    /// Answer `question` against `data` and append the reply.
    pub fn push_reply(&mut self, question: &str, data: &OcrData) -> &Message {
        let reply = respond(question, data);
        self.messages.push(Message::new(MessageRole::Assistant, reply));
        &self.messages[self.messages.len() - 1]
    }
}
