//! Server-rendered pages for the web UI. View models are plain structs
//! rendered to HTML strings; escaping is applied to every interpolated value.

use std::fmt::Write;

use crate::domain::query::Page;
use crate::domain::task::{Category, Task, TaskStatus};

/// Prefilled form values, kept as raw strings so invalid input re-renders
/// exactly what the user typed.
#[derive(Debug, Clone, Default)]
pub struct TaskFormView {
    /// Form post target: `/tasks` for create, `/tasks/{id}` for update.
    pub action: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub due_date: String,
    pub category_id: String,
}

impl TaskFormView {
    pub fn for_create() -> Self {
        Self { action: "/tasks".into(), status: "pending".into(), ..Self::default() }
    }

    pub fn for_task(task: &Task) -> Self {
        Self {
            action: format!("/tasks/{}", task.id),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status.as_str().into(),
            due_date: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            category_id: task.category_id.map(|c| c.to_string()).unwrap_or_default(),
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

pub fn index_page() -> String {
    layout(
        "Taskboard",
        "<h1>Taskboard</h1>\n<p><a href=\"/tasks\">Tasks</a> · <a href=\"/tasks/new\">New task</a></p>",
    )
}

pub fn task_list_page(page: &Page<Task>, categories: &[Category]) -> String {
    let mut body = String::new();
    body.push_str("<h1>Tasks</h1>\n");
    body.push_str("<p><a href=\"/\">Home</a> · <a href=\"/tasks/new\">New task</a></p>\n");
    let _ = writeln!(body, "<p>{} task(s)</p>", page.total);
    body.push_str("<table>\n<tr><th>Title</th><th>Status</th><th>Due</th><th>Category</th><th></th></tr>\n");
    for task in &page.items {
        let due = task.due_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
        let category = task
            .category_id
            .and_then(|id| categories.iter().find(|c| c.id == id))
            .map(|c| c.name.as_str())
            .unwrap_or("");
        let _ = writeln!(
            body,
            "<tr><td><a href=\"/tasks/{id}\">{title}</a></td><td>{status}</td><td>{due}</td><td>{category}</td>\
             <td><form method=\"post\" action=\"/tasks/{id}\"><input type=\"hidden\" name=\"_method\" value=\"DELETE\">\
             <button type=\"submit\">Delete</button></form></td></tr>",
            id = task.id,
            title = escape(&task.title),
            status = task.status.as_str(),
            due = due,
            category = escape(category),
        );
    }
    body.push_str("</table>");
    layout("Tasks", &body)
}

pub fn task_form_page(form: &TaskFormView, categories: &[Category], errors: &[String]) -> String {
    let mut body = String::new();
    let heading = if form.action == "/tasks" { "New task" } else { "Edit task" };
    let _ = writeln!(body, "<h1>{heading}</h1>");
    body.push_str("<p><a href=\"/tasks\">Back to tasks</a></p>\n");
    if !errors.is_empty() {
        body.push_str("<ul class=\"errors\">\n");
        for error in errors {
            let _ = writeln!(body, "<li>{}</li>", escape(error));
        }
        body.push_str("</ul>\n");
    }
    let _ = writeln!(body, "<form method=\"post\" action=\"{}\">", escape(&form.action));
    let _ = writeln!(
        body,
        "<p><label>Title <input type=\"text\" name=\"title\" value=\"{}\"></label></p>",
        escape(&form.title)
    );
    let _ = writeln!(
        body,
        "<p><label>Description <textarea name=\"description\">{}</textarea></label></p>",
        escape(&form.description)
    );
    body.push_str("<p><label>Status <select name=\"status\">\n");
    for status in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Done] {
        let selected = if form.status == status.as_str() { " selected" } else { "" };
        let _ = writeln!(body, "<option value=\"{0}\"{1}>{0}</option>", status.as_str(), selected);
    }
    body.push_str("</select></label></p>\n");
    let _ = writeln!(
        body,
        "<p><label>Due date <input type=\"date\" name=\"due_date\" value=\"{}\"></label></p>",
        escape(&form.due_date)
    );
    body.push_str("<p><label>Category <select name=\"category_id\">\n<option value=\"\"></option>\n");
    for category in categories {
        let id = category.id.to_string();
        let selected = if form.category_id == id { " selected" } else { "" };
        let _ = writeln!(
            body,
            "<option value=\"{}\"{}>{}</option>",
            id,
            selected,
            escape(&category.name)
        );
    }
    body.push_str("</select></label></p>\n");
    body.push_str("<p><button type=\"submit\">Save</button></p>\n</form>");
    layout(heading, &body)
}

pub fn error_page(message: &str) -> String {
    layout(
        "Error",
        &format!("<h1>Something went wrong</h1>\n<p>{}</p>\n<p><a href=\"/tasks\">Back to tasks</a></p>", escape(message)),
    )
}
