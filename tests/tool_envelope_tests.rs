//! End-to-end tests for the tool layer: call tools by name through the
//! handler and assert on the wire-shaped envelopes that come back.

use serde_json::{Value, json};
use std::sync::Arc;
use task_manager_mcp::db::Database;
use task_manager_mcp::tools::ToolHandler;

fn setup_handler() -> ToolHandler {
    let db = Database::open_in_memory().expect("Failed to create in-memory database");
    ToolHandler::new(Arc::new(db))
}

fn call(handler: &ToolHandler, name: &str, args: Value) -> Value {
    handler.call_tool(name, args).to_json()
}

fn text_of(envelope: &Value) -> &str {
    envelope["content"][0]["text"].as_str().unwrap()
}

#[test]
fn show_task_manager_routes_to_home_widget() {
    let handler = setup_handler();
    let result = call(&handler, "show_task_manager", json!({}));

    assert!(text_of(&result).contains("Task Manager is ready"));
    assert!(result.get("isError").is_none());
    assert_eq!(
        result["_meta"]["openai/outputTemplate"],
        "ui://widget/task-manager-home.html"
    );
    assert!(result["structuredContent"]["timestamp"].is_string());
}

#[test]
fn unknown_tool_is_an_error_envelope() {
    let handler = setup_handler();
    let result = call(&handler, "explode", json!({}));

    assert_eq!(result["isError"], true);
    assert_eq!(result["structuredContent"]["code"], "UNKNOWN_TOOL");
}

mod create_task {
    use super::*;

    #[test]
    fn without_identity_asks_for_user_info() {
        let handler = setup_handler();
        let result = call(&handler, "create_task", json!({}));

        assert!(result.get("isError").is_none());
        assert!(text_of(&result).contains("first and last name"));
        assert_eq!(
            result["_meta"]["openai/outputTemplate"],
            "ui://widget/user-info.html"
        );
    }

    #[test]
    fn full_name_in_first_field_is_split_and_user_created() {
        let handler = setup_handler();
        let result = call(&handler, "create_task", json!({ "firstName": "Jane Doe" }));

        // Identity resolved, but no task details: form envelope, no task row.
        assert!(result.get("isError").is_none());
        assert_eq!(result["structuredContent"]["firstName"], "Jane");
        assert_eq!(result["structuredContent"]["lastName"], "Doe");
        assert_eq!(
            result["_meta"]["openai/outputTemplate"],
            "ui://widget/task-form.html"
        );

        // The user exists as a side effect, with the synthesized email.
        let user = handler
            .db
            .get_user_by_name("Jane", "Doe")
            .unwrap()
            .unwrap();
        assert_eq!(user.email, "jane.doe@taskmanager.com");
        assert!(handler.db.list_tasks_for_user(&user.id).unwrap().is_empty());
    }

    #[test]
    fn complete_arguments_create_the_task() {
        let handler = setup_handler();
        let result = call(
            &handler,
            "create_task",
            json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "title": "Ship it",
                "description": "Before Friday",
                "status": "in-progress",
                "dueDate": "2026-09-04",
            }),
        );

        assert!(result.get("isError").is_none());
        assert!(text_of(&result).contains("created successfully"));
        let task_id = result["structuredContent"]["taskId"].as_str().unwrap();

        let task = handler.db.get_task(task_id).unwrap().unwrap();
        assert_eq!(task.title, "Ship it");
        assert_eq!(task.status.as_str(), "in-progress");
        assert!(task.due_date.is_some());
    }

    #[test]
    fn recapitalized_name_still_creates_tasks() {
        let handler = setup_handler();
        for (first, last, title) in [("Jane", "Doe", "first"), ("JANE", "DOE", "second")] {
            let result = call(
                &handler,
                "create_task",
                json!({
                    "firstName": first,
                    "lastName": last,
                    "title": title,
                    "description": "d",
                }),
            );
            assert!(result.get("isError").is_none(), "failed for {first} {last}");
            assert!(text_of(&result).contains("created successfully"));
        }

        // Both spellings resolve to one user owning both tasks.
        let user = handler
            .db
            .get_user_by_email("jane.doe@taskmanager.com")
            .unwrap()
            .unwrap();
        assert_eq!(handler.db.list_tasks_for_user(&user.id).unwrap().len(), 2);
    }

    #[test]
    fn invalid_status_is_an_error() {
        let handler = setup_handler();
        let result = call(
            &handler,
            "create_task",
            json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "title": "t",
                "description": "d",
                "status": "cancelled",
            }),
        );

        assert_eq!(result["isError"], true);
        assert_eq!(result["structuredContent"]["code"], "INVALID_FIELD_VALUE");
        assert_eq!(result["structuredContent"]["field"], "status");
    }
}

mod list_tasks {
    use super::*;

    #[test]
    fn unknown_user_yields_empty_non_error_and_no_user_row() {
        let handler = setup_handler();
        let result = call(
            &handler,
            "list_tasks",
            json!({ "firstName": "Ghost", "lastName": "User" }),
        );

        assert!(result.get("isError").is_none());
        assert!(text_of(&result).contains("No user found for Ghost User"));
        assert_eq!(result["structuredContent"]["count"], 0);

        // Listing never creates users.
        assert!(handler.db.get_user_by_name("Ghost", "User").unwrap().is_none());
    }

    #[test]
    fn missing_identity_prompts_without_error() {
        let handler = setup_handler();
        let result = call(&handler, "list_tasks", json!({}));

        assert!(result.get("isError").is_none());
        assert_eq!(result["structuredContent"]["count"], 0);
        assert_eq!(
            result["_meta"]["openai/outputTemplate"],
            "ui://widget/task-list.html"
        );
    }

    #[test]
    fn returns_tasks_newest_first_with_count() {
        let handler = setup_handler();
        for title in ["one", "two"] {
            call(
                &handler,
                "create_task",
                json!({
                    "firstName": "Jane",
                    "lastName": "Doe",
                    "title": title,
                    "description": "d",
                }),
            );
        }

        let result = call(
            &handler,
            "list_tasks",
            json!({ "firstName": "Jane", "lastName": "Doe" }),
        );

        assert!(text_of(&result).contains("Found 2 task(s) for Jane Doe"));
        assert_eq!(result["structuredContent"]["count"], 2);
        let tasks = result["structuredContent"]["tasks"].as_array().unwrap();
        assert_eq!(tasks[0]["title"], "two");
        assert_eq!(tasks[1]["title"], "one");
    }

    #[test]
    fn groups_by_status_and_flags_tasks_due_today() {
        let handler = setup_handler();
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        call(
            &handler,
            "create_task",
            json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "title": "due now",
                "description": "d",
                "dueDate": today,
            }),
        );
        call(
            &handler,
            "create_task",
            json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "title": "someday",
                "description": "d",
                "status": "done",
            }),
        );

        let result = call(
            &handler,
            "list_tasks",
            json!({ "firstName": "Jane", "lastName": "Doe" }),
        );
        let structured = &result["structuredContent"];

        assert_eq!(structured["byStatus"]["todo"].as_array().unwrap().len(), 1);
        assert_eq!(structured["byStatus"]["done"].as_array().unwrap().len(), 1);
        assert!(structured["byStatus"]["inProgress"].as_array().unwrap().is_empty());

        let due_today = structured["dueToday"].as_array().unwrap();
        assert_eq!(due_today.len(), 1);
        assert_eq!(due_today[0]["title"], "due now");
    }
}

mod get_update_delete {
    use super::*;

    fn create_one(handler: &ToolHandler, title: &str) -> String {
        let result = call(
            handler,
            "create_task",
            json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "title": title,
                "description": "d",
            }),
        );
        result["structuredContent"]["taskId"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn get_task_returns_the_record_or_not_found() {
        let handler = setup_handler();
        let task_id = create_one(&handler, "Findable");

        let result = call(&handler, "get_task", json!({ "taskId": task_id }));
        assert_eq!(text_of(&result), "Task: Findable");
        assert_eq!(result["structuredContent"]["title"], "Findable");

        let missing = call(&handler, "get_task", json!({ "taskId": "nope" }));
        assert_eq!(missing["isError"], true);
        assert_eq!(missing["structuredContent"]["code"], "TASK_NOT_FOUND");
        assert!(text_of(&missing).contains("Task with ID nope not found"));
    }

    #[test]
    fn get_task_requires_the_id() {
        let handler = setup_handler();
        let result = call(&handler, "get_task", json!({}));

        assert_eq!(result["isError"], true);
        assert_eq!(
            result["structuredContent"]["code"],
            "MISSING_REQUIRED_FIELD"
        );
        assert_eq!(result["structuredContent"]["field"], "taskId");
    }

    #[test]
    fn status_only_update_leaves_other_fields() {
        let handler = setup_handler();
        let task_id = create_one(&handler, "Patch me");

        let result = call(
            &handler,
            "update_task",
            json!({ "taskId": task_id, "status": "done" }),
        );

        assert!(result.get("isError").is_none());
        assert!(text_of(&result).contains("updated successfully"));
        assert_eq!(result["structuredContent"]["task"]["status"], "done");
        assert_eq!(result["structuredContent"]["task"]["title"], "Patch me");
        assert_eq!(result["structuredContent"]["task"]["description"], "d");
    }

    #[test]
    fn update_of_unknown_task_is_not_found() {
        let handler = setup_handler();
        let result = call(
            &handler,
            "update_task",
            json!({ "taskId": "nope", "status": "done" }),
        );

        assert_eq!(result["isError"], true);
        assert_eq!(result["structuredContent"]["code"], "TASK_NOT_FOUND");
    }

    #[test]
    fn delete_succeeds_once_then_reports_not_found() {
        let handler = setup_handler();
        let task_id = create_one(&handler, "Doomed");

        let first = call(&handler, "delete_task", json!({ "taskId": &task_id }));
        assert!(first.get("isError").is_none());
        assert!(text_of(&first).contains("deleted successfully"));
        assert_eq!(first["structuredContent"]["deletedTask"]["title"], "Doomed");

        let second = call(&handler, "delete_task", json!({ "taskId": &task_id }));
        assert_eq!(second["isError"], true);
        assert_eq!(second["structuredContent"]["code"], "TASK_NOT_FOUND");
    }
}
