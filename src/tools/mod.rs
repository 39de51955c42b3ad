//! MCP tool implementations: the dispatch adapter between named tool calls
//! and the data layer.

pub mod envelope;
pub mod manager;
pub mod session;
pub mod tasks;

pub use envelope::Envelope;

use crate::db::Database;
use crate::error::ToolError;
use rmcp::model::Tool;
use serde_json::Value;
use std::sync::Arc;

/// Tool handler that processes MCP tool calls.
pub struct ToolHandler {
    pub db: Arc<Database>,
}

impl ToolHandler {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get all available tools.
    pub fn get_tools(&self) -> Vec<Tool> {
        let mut tools = Vec::new();
        tools.extend(manager::get_tools());
        tools.extend(tasks::get_tools());
        tools
    }

    /// Call a tool by name.
    ///
    /// Always returns an envelope: handler errors (not-found, store failures,
    /// unknown tool) are converted to the error envelope at this single point.
    pub fn call_tool(&self, name: &str, arguments: Value) -> Envelope {
        let result = match name {
            "show_task_manager" => manager::show_task_manager(&arguments),
            "create_task" => tasks::create_task(&self.db, &arguments),
            "list_tasks" => tasks::list_tasks(&self.db, &arguments),
            "get_task" => tasks::get_task(&self.db, &arguments),
            "update_task" => tasks::update_task(&self.db, &arguments),
            "delete_task" => tasks::delete_task(&self.db, &arguments),
            _ => Err(ToolError::unknown_tool(name)),
        };

        result.unwrap_or_else(Envelope::from_error)
    }
}

/// Helper to create a tool definition.
pub fn make_tool(name: &str, description: &str, properties: Value, required: Vec<&str>) -> Tool {
    let input_schema = rmcp::model::JsonObject::from_iter([
        ("type".to_string(), serde_json::json!("object")),
        ("properties".to_string(), properties),
        ("required".to_string(), serde_json::json!(required)),
    ]);

    Tool::new(name.to_string(), description.to_string(), input_schema)
}

/// Helper to get a string from arguments.
pub fn get_string(args: &Value, key: &str) -> Option<String> {
    args.get(key).and_then(|v| v.as_str().map(String::from))
}

/// Helper to get a trimmed, non-empty string from arguments.
pub fn get_trimmed(args: &Value, key: &str) -> Option<String> {
    get_string(args, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
