//! Task CRUD tools.
//!
//! Missing identity or missing task fields are not failures here: they come
//! back as non-error envelopes routed to the collection widgets, so the chat
//! host can gather the rest. `isError` is reserved for unknown ids and store
//! failures.

use super::session::Session;
use super::{Envelope, get_string, get_trimmed, make_tool};
use crate::db::Database;
use crate::error::{ToolError, ToolResult};
use crate::resources::widgets::WidgetKind;
use crate::types::{TaskPatch, TaskStatus};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rmcp::model::Tool;
use serde_json::{Value, json};

pub fn get_tools() -> Vec<Tool> {
    vec![
        make_tool(
            "create_task",
            "Create a new task for a user. If the user's name is missing, a \
             form is shown to collect it; if task details are missing, a task \
             form is shown instead.",
            json!({
                "firstName": {
                    "type": "string",
                    "description": "User's first name. A full name here is split on the first space.",
                },
                "lastName": { "type": "string", "description": "User's last name." },
                "title": { "type": "string", "description": "Task title." },
                "description": { "type": "string", "description": "Task description." },
                "status": {
                    "type": "string",
                    "enum": ["todo", "in-progress", "done"],
                    "description": "Initial status. Defaults to todo.",
                },
                "dueDate": {
                    "type": "string",
                    "description": "Due date, RFC 3339 or YYYY-MM-DD.",
                },
            }),
            vec![],
        ),
        make_tool(
            "list_tasks",
            "List all tasks for a user, newest first.",
            json!({
                "firstName": { "type": "string", "description": "User's first name." },
                "lastName": { "type": "string", "description": "User's last name." },
            }),
            vec![],
        ),
        make_tool(
            "get_task",
            "Get a single task by its ID.",
            json!({
                "taskId": { "type": "string", "description": "ID of the task." },
            }),
            vec!["taskId"],
        ),
        make_tool(
            "update_task",
            "Update fields of an existing task. Only the provided fields change.",
            json!({
                "taskId": { "type": "string", "description": "ID of the task." },
                "title": { "type": "string", "description": "New title." },
                "description": { "type": "string", "description": "New description. Null clears it." },
                "status": {
                    "type": "string",
                    "enum": ["todo", "in-progress", "done"],
                    "description": "New status.",
                },
                "dueDate": {
                    "type": "string",
                    "description": "New due date, RFC 3339 or YYYY-MM-DD. Null clears it.",
                },
            }),
            vec!["taskId"],
        ),
        make_tool(
            "delete_task",
            "Delete a task by its ID.",
            json!({
                "taskId": { "type": "string", "description": "ID of the task." },
            }),
            vec!["taskId"],
        ),
    ]
}

/// Parse a due date: RFC 3339 first, then a bare date taken as midnight UTC.
fn parse_due_date(raw: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).timestamp_millis());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_time(NaiveTime::MIN).and_utc();
    Some(midnight.timestamp_millis())
}

fn parse_due_date_arg(raw: &str) -> ToolResult<i64> {
    parse_due_date(raw).ok_or_else(|| {
        ToolError::invalid_value(
            "dueDate",
            format!("Invalid due date: {} (expected RFC 3339 or YYYY-MM-DD)", raw),
        )
    })
}

fn parse_status_arg(raw: &str) -> ToolResult<TaskStatus> {
    TaskStatus::parse(raw).ok_or_else(|| {
        ToolError::invalid_value(
            "status",
            format!("Invalid status: {} (expected todo, in-progress, or done)", raw),
        )
    })
}

fn session_from(args: &Value) -> Option<Session> {
    Session::from_args(
        args.get("firstName").and_then(Value::as_str),
        args.get("lastName").and_then(Value::as_str),
    )
}

pub fn create_task(db: &Database, args: &Value) -> ToolResult<Envelope> {
    let Some(session) = session_from(args) else {
        return Ok(Envelope::text(
            "Please enter your first and last name in the form below.",
        )
        .with_structured(json!({ "message": "User info collection" }))
        .with_widget(WidgetKind::UserInfo));
    };

    // Validate optional fields up front so a bad value fails before any row
    // is written.
    let status = match get_trimmed(args, "status") {
        Some(raw) => Some(parse_status_arg(&raw)?),
        None => None,
    };
    let due_date = match get_trimmed(args, "dueDate") {
        Some(raw) => Some(parse_due_date_arg(&raw)?),
        None => None,
    };

    let user = db.get_or_create_user(&session.first_name, &session.last_name)?;

    let title = get_trimmed(args, "title");
    let description = get_trimmed(args, "description");

    if let (Some(title), Some(description)) = (&title, &description) {
        let task = db.create_task(&user.id, title, Some(description), status, due_date)?;
        return Ok(
            Envelope::text(format!("Task \"{}\" created successfully!", task.title))
                .with_structured(json!({
                    "taskId": task.id,
                    "firstName": session.first_name,
                    "lastName": session.last_name,
                    "title": task.title,
                    "description": task.description,
                    "message": "Task created",
                }))
                .with_widget(WidgetKind::TaskForm),
        );
    }

    // Incomplete task details: hand back a pre-filled form.
    Ok(Envelope::text(format!(
        "Task creation form is ready for {}. Please fill in the task details.",
        session.full_name()
    ))
    .with_structured(json!({
        "firstName": session.first_name,
        "lastName": session.last_name,
        "title": title.unwrap_or_default(),
        "description": description.unwrap_or_default(),
        "status": status.unwrap_or_default(),
        "dueDate": get_trimmed(args, "dueDate"),
        "message": "Task form ready",
    }))
    .with_widget(WidgetKind::TaskForm))
}

pub fn list_tasks(db: &Database, args: &Value) -> ToolResult<Envelope> {
    let Some(session) = session_from(args) else {
        return Ok(Envelope::text(
            "Please provide your first and last name to view your tasks.",
        )
        .with_structured(json!({
            "tasks": [],
            "count": 0,
            "message": "User info needed",
        }))
        .with_widget(WidgetKind::TaskList));
    };

    // Listing never creates a user as a side effect.
    let Some(user) = db.get_user_by_name(&session.first_name, &session.last_name)? else {
        return Ok(Envelope::text(format!(
            "No user found for {}. Create a task first to get started.",
            session.full_name()
        ))
        .with_structured(json!({
            "tasks": [],
            "count": 0,
            "firstName": session.first_name,
            "lastName": session.last_name,
            "message": "User not found",
        }))
        .with_widget(WidgetKind::TaskList));
    };

    let tasks = db.list_tasks_for_user(&user.id)?;
    let by_status = db.list_tasks_by_status(&user.id)?;
    let due_today = {
        let start = Utc::now()
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis();
        db.list_tasks_due_between(&user.id, start, start + 86_400_000)?
    };

    let text = if tasks.is_empty() {
        format!("No tasks found for {}.", session.full_name())
    } else {
        format!("Found {} task(s) for {}.", tasks.len(), session.full_name())
    };

    Ok(Envelope::text(text)
        .with_structured(json!({
            "tasks": tasks,
            "count": tasks.len(),
            "byStatus": by_status,
            "dueToday": due_today,
            "firstName": session.first_name,
            "lastName": session.last_name,
        }))
        .with_widget(WidgetKind::TaskList))
}

pub fn get_task(db: &Database, args: &Value) -> ToolResult<Envelope> {
    let task_id = get_trimmed(args, "taskId").ok_or_else(|| ToolError::missing_field("taskId"))?;

    let task = db
        .get_task(&task_id)?
        .ok_or_else(|| ToolError::task_not_found(&task_id))?;

    Ok(Envelope::text(format!("Task: {}", task.title))
        .with_structured(serde_json::to_value(&task).map_err(ToolError::internal)?))
}

pub fn update_task(db: &Database, args: &Value) -> ToolResult<Envelope> {
    let task_id = get_trimmed(args, "taskId").ok_or_else(|| ToolError::missing_field("taskId"))?;

    let mut patch = TaskPatch::default();
    if let Some(title) = get_string(args, "title") {
        if title.trim().is_empty() {
            return Err(ToolError::invalid_value("title", "Title cannot be empty"));
        }
        patch.title = Some(title.trim().to_string());
    }
    // For description and dueDate an explicit null clears the stored value.
    match args.get("description") {
        Some(Value::Null) => patch.description = Some(None),
        Some(v) => {
            if let Some(s) = v.as_str() {
                patch.description = Some(Some(s.to_string()));
            }
        }
        None => {}
    }
    if let Some(raw) = get_trimmed(args, "status") {
        patch.status = Some(parse_status_arg(&raw)?);
    }
    match args.get("dueDate") {
        Some(Value::Null) => patch.due_date = Some(None),
        Some(v) => {
            if let Some(s) = v.as_str() {
                patch.due_date = Some(Some(parse_due_date_arg(s.trim())?));
            }
        }
        None => {}
    }

    let task = db
        .update_task(&task_id, &patch)?
        .ok_or_else(|| ToolError::task_not_found(&task_id))?;

    Ok(
        Envelope::text(format!("Task \"{}\" updated successfully!", task.title))
            .with_structured(json!({
                "taskId": task.id,
                "task": task,
                "message": "Task updated",
            }))
            .with_widget(WidgetKind::TaskList),
    )
}

pub fn delete_task(db: &Database, args: &Value) -> ToolResult<Envelope> {
    let task_id = get_trimmed(args, "taskId").ok_or_else(|| ToolError::missing_field("taskId"))?;

    // Fetch first so the confirmation can name the task, and so a second
    // delete of the same id reports not-found instead of silently succeeding.
    let task = db
        .get_task(&task_id)?
        .ok_or_else(|| ToolError::task_not_found(&task_id))?;

    db.delete_task(&task_id)?;

    Ok(Envelope::text(format!(
        "Task \"{}\" has been deleted successfully.",
        task.title
    ))
    .with_structured(json!({
        "taskId": task.id,
        "deletedTask": task,
        "message": "Task deleted",
    }))
    .with_widget(WidgetKind::TaskList))
}
