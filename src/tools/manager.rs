//! The task-manager entry tool.

use super::{Envelope, make_tool};
use crate::error::ToolResult;
use crate::resources::widgets::WidgetKind;
use rmcp::model::Tool;
use serde_json::{Value, json};

pub fn get_tools() -> Vec<Tool> {
    vec![make_tool(
        "show_task_manager",
        "Display the task manager interface with options to create tasks, \
         view tasks, and manage your task list.",
        json!({}),
        vec![],
    )]
}

/// No side effects: a static greeting plus a timestamp, routed to the home
/// widget.
pub fn show_task_manager(_args: &Value) -> ToolResult<Envelope> {
    Ok(Envelope::text(
        "Task Manager is ready! Use the interface to manage your tasks.",
    )
    .with_structured(json!({
        "message": "Task Manager loaded",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
    .with_widget(WidgetKind::Home))
}
