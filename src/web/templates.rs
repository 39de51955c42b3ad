//! Embedded HTML pages. The same documents back both the browser UI and the
//! widget resources; `{{BASE_URL}}` is the only substitution point.

pub const HOME: &str = include_str!("templates/home.html");
pub const TASK_LIST: &str = include_str!("templates/tasks.html");
pub const TASK_FORM: &str = include_str!("templates/task_form.html");
pub const TASK_DETAIL: &str = include_str!("templates/task_detail.html");
pub const USER_INFO: &str = include_str!("templates/user_info.html");

/// Fill the base-URL placeholder. The browser UI passes "" so the page talks
/// to the origin that served it; widget snapshots get an absolute base.
pub fn render(template: &str, base_url: &str) -> String {
    template.replace("{{BASE_URL}}", base_url)
}
