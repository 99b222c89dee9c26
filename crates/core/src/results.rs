//! Normalization of raw HTML_CodeSniffer records into `Message`s.

use serde::{Deserialize, Serialize};

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Error,
    Warning,
    Notice,
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageType::Error => write!(f, "error"),
            MessageType::Warning => write!(f, "warning"),
            MessageType::Notice => write!(f, "notice"),
        }
    }
}

/// One normalized finding. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// Rule identifier, opaque to us (e.g. `WCAG2AA.Principle1...`).
    pub code: String,
    pub message: String,
    /// Markup snippet implicating the offending node, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// CSS-ish locator for the offending node, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

/// Severity as HTML_CodeSniffer emits it: numeric (1 error, 2 warning,
/// 3 notice) or already textual.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawType {
    Numeric(u64),
    Text(String),
}

/// One record as read back out of the page, tolerant of absent fields.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    #[serde(rename = "type")]
    pub message_type: Option<RawType>,
    #[serde(default)]
    pub code: String,
    #[serde(default, alias = "msg")]
    pub message: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub selector: Option<String>,
}

fn normalize_type(raw: Option<&RawType>) -> MessageType {
    match raw {
        Some(RawType::Numeric(1)) => MessageType::Error,
        Some(RawType::Numeric(2)) => MessageType::Warning,
        Some(RawType::Text(text)) => match text.to_ascii_lowercase().as_str() {
            "error" => MessageType::Error,
            "warning" => MessageType::Warning,
            _ => MessageType::Notice,
        },
        // Unknown codes downgrade to notice rather than failing the audit.
        _ => MessageType::Notice,
    }
}

/// Builds the normalized message list. Pure: equal length, input order
/// preserved, `code`/`message` copied verbatim.
pub fn build_messages(raw: Vec<RawMessage>) -> Vec<Message> {
    raw.into_iter()
        .map(|record| Message {
            message_type: normalize_type(record.message_type.as_ref()),
            code: record.code,
            message: record.message,
            context: record.context,
            selector: record.selector,
        })
        .collect()
}
