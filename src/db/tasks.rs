//! Task CRUD and filtered listings.

use super::{Database, now_ms};
use crate::types::{Task, TaskPatch, TaskStatus, TasksByStatus};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, Row, params};
use uuid::Uuid;

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let status: String = row.get("status")?;
    Ok(Task {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        // The CHECK constraint keeps the column in range; fall back to the
        // default rather than poisoning reads if it is ever violated.
        status: TaskStatus::parse(&status).unwrap_or_default(),
        due_date: row.get("due_date")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn get_task_internal(conn: &Connection, task_id: &str) -> Result<Option<Task>> {
    let mut stmt = conn.prepare("SELECT * FROM tasks WHERE id = ?1")?;
    match stmt.query_row(params![task_id], parse_task_row) {
        Ok(task) => Ok(Some(task)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Database {
    /// Get a task by id.
    pub fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, task_id))
    }

    /// All tasks for one owner, newest first by creation.
    /// This is the only ordering guarantee in the system; id breaks ties for
    /// rows created within the same millisecond.
    pub fn list_tasks_for_user(&self, user_id: &str) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM tasks WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )?;
            let tasks = stmt
                .query_map(params![user_id], parse_task_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tasks)
        })
    }

    /// One owner's tasks partitioned by status, each bucket newest first.
    pub fn list_tasks_by_status(&self, user_id: &str) -> Result<TasksByStatus> {
        let tasks = self.list_tasks_for_user(user_id)?;
        let mut grouped = TasksByStatus {
            todo: Vec::new(),
            in_progress: Vec::new(),
            done: Vec::new(),
        };
        for task in tasks {
            match task.status {
                TaskStatus::Todo => grouped.todo.push(task),
                TaskStatus::InProgress => grouped.in_progress.push(task),
                TaskStatus::Done => grouped.done.push(task),
            }
        }
        Ok(grouped)
    }

    /// One owner's tasks due in `[start_ms, end_ms)`.
    pub fn list_tasks_due_between(
        &self,
        user_id: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM tasks
                 WHERE user_id = ?1 AND due_date >= ?2 AND due_date < ?3
                 ORDER BY due_date ASC",
            )?;
            let tasks = stmt
                .query_map(params![user_id, start_ms, end_ms], parse_task_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tasks)
        })
    }

    /// Create a task. Status defaults to todo; the data layer sets both
    /// timestamps to the same instant.
    pub fn create_task(
        &self,
        user_id: &str,
        title: &str,
        description: Option<&str>,
        status: Option<TaskStatus>,
        due_date: Option<i64>,
    ) -> Result<Task> {
        if title.trim().is_empty() {
            return Err(anyhow!("title must be non-empty"));
        }

        let now = now_ms();
        let task = Task {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            description: description.map(String::from),
            status: status.unwrap_or_default(),
            due_date,
            created_at: now,
            updated_at: now,
        };

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (id, user_id, title, description, status, due_date, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    &task.id,
                    &task.user_id,
                    &task.title,
                    &task.description,
                    task.status.as_str(),
                    task.due_date,
                    task.created_at,
                    task.updated_at,
                ],
            )?;
            Ok(())
        })?;

        Ok(task)
    }

    /// Apply a partial patch. Fields absent from the patch are untouched.
    /// Returns the post-update record, or None when the id is unknown.
    ///
    /// updated_at is bumped to max(now, old + 1) so it strictly increases
    /// even when two mutations land inside one clock millisecond.
    pub fn update_task(&self, task_id: &str, patch: &TaskPatch) -> Result<Option<Task>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let Some(current) = get_task_internal(&tx, task_id)? else {
                return Ok(None);
            };

            let title = patch.title.as_deref().unwrap_or(&current.title);
            if title.trim().is_empty() {
                return Err(anyhow!("title must be non-empty"));
            }
            let description = match &patch.description {
                Some(value) => value.as_deref(),
                None => current.description.as_deref(),
            };
            let status = patch.status.unwrap_or(current.status);
            let due_date = match patch.due_date {
                Some(value) => value,
                None => current.due_date,
            };
            let updated_at = now_ms().max(current.updated_at + 1);

            tx.execute(
                "UPDATE tasks
                 SET title = ?1, description = ?2, status = ?3, due_date = ?4, updated_at = ?5
                 WHERE id = ?6",
                params![title, description, status.as_str(), due_date, updated_at, task_id],
            )?;

            let updated = get_task_internal(&tx, task_id)?;
            tx.commit()?;
            Ok(updated)
        })
    }

    /// Hard delete. Returns whether a row existed. No cascade, no soft-delete.
    pub fn delete_task(&self, task_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            Ok(changed > 0)
        })
    }
}
