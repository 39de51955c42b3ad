//! The uniform response envelope every tool call returns.
//!
//! Shape on the wire:
//! `{ content: [{type:"text", text}], structuredContent?, isError?, _meta? }`
//!
//! `isError` is set only when an underlying data operation fails or a lookup
//! target is missing. Validation gaps (missing name or title) come back as
//! non-error envelopes that route to a collection widget, so a conversational
//! caller can recover by asking the user.

use crate::error::ToolError;
use crate::resources::widgets::WidgetKind;
use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct Envelope {
    /// Human-readable summary, always present.
    pub text: String,
    /// Operation-specific payload.
    pub structured: Option<Value>,
    /// True only on failure.
    pub is_error: bool,
    /// Which widget the chat host should surface for this result, if any.
    pub widget: Option<WidgetKind>,
}

impl Envelope {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            structured: None,
            is_error: false,
            widget: None,
        }
    }

    pub fn with_structured(mut self, structured: Value) -> Self {
        self.structured = Some(structured);
        self
    }

    pub fn with_widget(mut self, widget: WidgetKind) -> Self {
        self.widget = Some(widget);
        self
    }

    /// Render a tool error as the error envelope. This is the single point
    /// where the internal not-found/failure convention becomes wire shape.
    pub fn from_error(err: ToolError) -> Self {
        let structured = serde_json::to_value(&err).ok();
        Self {
            text: err.to_string(),
            structured,
            is_error: true,
            widget: None,
        }
    }

    /// Full envelope JSON, used by the web bridge and by tests.
    pub fn to_json(&self) -> Value {
        let mut obj = json!({
            "content": [{ "type": "text", "text": self.text }],
        });
        if let Some(structured) = &self.structured {
            obj["structuredContent"] = structured.clone();
        }
        if self.is_error {
            obj["isError"] = json!(true);
        }
        if let Some(widget) = self.widget {
            obj["_meta"] = widget.meta_json();
        }
        obj
    }
}
