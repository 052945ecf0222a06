//! Completion response model and plain-text extraction.
//!
//! The completion backend does not commit to a single response schema, so
//! every output item is classified into an [`OutputItem`] variant up front.
//! [`extract_text`] then walks the variants in a fixed precedence order and
//! returns the first text it finds. Only the flattened `output_text` field
//! must be non-empty to count; an empty string found in an output item is
//! still the first match and callers decide whether it is usable.

use serde::Deserialize;
use serde_json::Value;

/// Discriminant marking an output item or nested entry as a text block.
pub const TEXT_BLOCK_TAG: &str = "output_text";

// ---------------------------------------------------------------------------
// Response model
// ---------------------------------------------------------------------------

/// Raw result of a text-completion call.
///
/// Deserializes from any JSON value: unknown or malformed parts are kept as
/// [`OutputItem::Unrecognized`] instead of failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct CompletionResponse {
    direct_text: Option<String>,
    output_items: Vec<OutputItem>,
}

impl CompletionResponse {
    pub fn new(direct_text: Option<String>, output_items: Vec<OutputItem>) -> Self {
        Self {
            direct_text,
            output_items,
        }
    }

    /// Flattened convenience text, present only for some backends.
    pub fn direct_text(&self) -> Option<&str> {
        self.direct_text.as_deref()
    }

    pub fn output_items(&self) -> &[OutputItem] {
        &self.output_items
    }
}

impl From<Value> for CompletionResponse {
    fn from(value: Value) -> Self {
        let direct_text = value
            .get("output_text")
            .and_then(Value::as_str)
            .map(str::to_owned);

        let output_items = value
            .get("output")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(OutputItem::from_value).collect())
            .unwrap_or_default();

        Self {
            direct_text,
            output_items,
        }
    }
}

/// One element of the response's `output` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputItem {
    /// Tagged `output_text` item whose `content` is a plain string.
    TextBlock(String),
    /// Item carrying a nested `content` list. `text` is the item's own
    /// top-level string `text`, consulted only when no entry yields text.
    ContentList {
        entries: Vec<ContentEntry>,
        text: Option<String>,
    },
    /// Last resort: an untagged record that merely has a string `text`.
    UntypedRecord(String),
    /// Nothing text-like was found on the item.
    Unrecognized,
}

impl OutputItem {
    /// Classify a raw JSON output item.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::Unrecognized;
        };

        let tag = object.get("type").and_then(Value::as_str);
        let text = object.get("text").and_then(Value::as_str).map(str::to_owned);

        match object.get("content") {
            Some(Value::String(content)) if tag == Some(TEXT_BLOCK_TAG) => {
                Self::TextBlock(content.clone())
            }
            Some(Value::Array(entries)) => Self::ContentList {
                entries: entries.iter().map(ContentEntry::from_value).collect(),
                text,
            },
            _ => match text {
                Some(text) => Self::UntypedRecord(text),
                None => Self::Unrecognized,
            },
        }
    }

    /// First text carried by this item, if any. May be empty.
    ///
    /// Within a content list a tagged entry beats an untagged one, even
    /// when the untagged entry comes first.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::TextBlock(text) | Self::UntypedRecord(text) => Some(text.as_str()),
            Self::ContentList { entries, text } => entries
                .iter()
                .find_map(ContentEntry::tagged_text)
                .or_else(|| entries.iter().find_map(ContentEntry::untyped_text))
                .or(text.as_deref()),
            Self::Unrecognized => None,
        }
    }
}

/// One entry of a nested content list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEntry {
    TextBlock(String),
    Untyped(String),
    Other,
}

impl ContentEntry {
    pub fn from_value(value: &Value) -> Self {
        let tag = value.get("type").and_then(Value::as_str);
        match value.get("text").and_then(Value::as_str) {
            Some(text) if tag == Some(TEXT_BLOCK_TAG) => Self::TextBlock(text.to_owned()),
            Some(text) => Self::Untyped(text.to_owned()),
            None => Self::Other,
        }
    }

    fn tagged_text(&self) -> Option<&str> {
        match self {
            Self::TextBlock(text) => Some(text.as_str()),
            _ => None,
        }
    }

    fn untyped_text(&self) -> Option<&str> {
        match self {
            Self::Untyped(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Recover a single answer text from a completion response.
///
/// Precedence, first match wins:
///
/// 1. non-empty `direct_text`
/// 2. each output item in order, see [`OutputItem::text`]
///
/// Returns `None` when no item carries text. That is an empty result,
/// not a transport or backend failure. A `Some("")` from an output item
/// ends the scan; later items are not consulted.
pub fn extract_text(response: &CompletionResponse) -> Option<&str> {
    if let Some(text) = response.direct_text().filter(|text| !text.is_empty()) {
        return Some(text);
    }
    response.output_items().iter().find_map(OutputItem::text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
