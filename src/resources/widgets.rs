//! Widget identities: the fixed set of HTML surfaces a tool result can route
//! the chat host to.

use serde_json::{Value, json};

/// The four embeddable widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Home,
    TaskList,
    TaskForm,
    UserInfo,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 4] = [
        WidgetKind::Home,
        WidgetKind::TaskList,
        WidgetKind::TaskForm,
        WidgetKind::UserInfo,
    ];

    /// Stable resource URI, also used as the output template reference in
    /// tool result metadata.
    pub fn template_uri(&self) -> &'static str {
        match self {
            WidgetKind::Home => "ui://widget/task-manager-home.html",
            WidgetKind::TaskList => "ui://widget/task-list.html",
            WidgetKind::TaskForm => "ui://widget/task-form.html",
            WidgetKind::UserInfo => "ui://widget/user-info.html",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::Home => "task-manager-home",
            WidgetKind::TaskList => "task-list",
            WidgetKind::TaskForm => "task-form",
            WidgetKind::UserInfo => "user-info",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WidgetKind::Home => "Task Manager Home",
            WidgetKind::TaskList => "Task List",
            WidgetKind::TaskForm => "Task Form",
            WidgetKind::UserInfo => "User Info",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WidgetKind::Home => "Task manager home screen with quick actions",
            WidgetKind::TaskList => "List of tasks for a user",
            WidgetKind::TaskForm => "Form for creating a task",
            WidgetKind::UserInfo => "Form for collecting the user's name",
        }
    }

    fn invoking(&self) -> &'static str {
        match self {
            WidgetKind::Home => "Opening Task Manager",
            WidgetKind::TaskList => "Loading tasks",
            WidgetKind::TaskForm => "Preparing task form",
            WidgetKind::UserInfo => "Collecting user info",
        }
    }

    fn invoked(&self) -> &'static str {
        match self {
            WidgetKind::Home => "Task Manager opened",
            WidgetKind::TaskList => "Tasks loaded",
            WidgetKind::TaskForm => "Task form ready",
            WidgetKind::UserInfo => "User info form ready",
        }
    }

    /// Metadata attached both to the widget's resource listing and to tool
    /// results that route to it. Keys follow the embedding host's contract.
    pub fn meta_json(&self) -> Value {
        json!({
            "openai/outputTemplate": self.template_uri(),
            "openai/toolInvocation/invoking": self.invoking(),
            "openai/toolInvocation/invoked": self.invoked(),
            "openai/widgetAccessible": false,
            "openai/widgetPrefersBorder": true,
            "openai/resultCanProduceWidget": true,
        })
    }
}
