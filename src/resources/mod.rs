//! MCP resource implementations: the embeddable widget documents.

pub mod widgets;

use crate::error::{ToolError, ToolResult};
use crate::web::templates;
use rmcp::model::{Annotated, RawResource, Resource};
use widgets::WidgetKind;

/// One widget document as exposed over `resources/read`.
#[derive(Debug)]
pub struct Widget {
    pub kind: WidgetKind,
    pub html: String,
}

/// Resource handler serving the widget set.
///
/// The HTML is snapshotted once at construction; `resources/read` never
/// re-renders, so every client sees the same document for a given process.
pub struct ResourceHandler {
    widgets: Vec<Widget>,
    base_url: String,
}

impl ResourceHandler {
    pub fn new(base_url: &str) -> Self {
        let widgets = WidgetKind::ALL
            .iter()
            .map(|&kind| {
                let template = match kind {
                    WidgetKind::Home => templates::HOME,
                    WidgetKind::TaskList => templates::TASK_LIST,
                    WidgetKind::TaskForm => templates::TASK_FORM,
                    WidgetKind::UserInfo => templates::USER_INFO,
                };
                Widget {
                    kind,
                    html: templates::render(template, base_url),
                }
            })
            .collect();
        Self {
            widgets,
            base_url: base_url.to_string(),
        }
    }

    /// Get all available resources. The widget set is fixed, so there are no
    /// parameterized templates.
    pub fn get_resources(&self) -> Vec<Resource> {
        self.widgets
            .iter()
            .map(|widget| {
                let mut meta = widget.kind.meta_json();
                if !self.base_url.is_empty() {
                    meta["openai/widgetDomain"] = self.base_url.clone().into();
                }
                Annotated::new(
                    RawResource {
                        uri: widget.kind.template_uri().into(),
                        name: widget.kind.name().into(),
                        title: Some(widget.kind.title().into()),
                        description: Some(widget.kind.description().into()),
                        mime_type: Some("text/html+skybridge".into()),
                        size: None,
                        icons: None,
                        meta: serde_json::from_value(meta).ok(),
                    },
                    None,
                )
            })
            .collect()
    }

    /// Read a widget document by URI.
    pub fn read_resource(&self, uri: &str) -> ToolResult<&Widget> {
        self.widgets
            .iter()
            .find(|widget| widget.kind.template_uri() == uri)
            .ok_or_else(|| ToolError::unknown_resource(uri))
    }
}
