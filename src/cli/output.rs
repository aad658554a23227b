use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::project::Project;
use crate::model::section::Section;
use crate::model::selection::{FixedScope, SidebarScope, TagFilter};
use crate::model::task::Task;
use crate::ops::counts::{SidebarCounts, TaskCounts};
use crate::ops::view::VisibleSection;
use crate::store::Confirmation;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSectionJson<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub due_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_time: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<&'a str>,
    pub is_completed: bool,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct ViewJson<'a> {
    pub scope: String,
    pub tag: &'static str,
    pub sections: Vec<ViewSectionJson<'a>>,
}

#[derive(Serialize)]
pub struct CountsJson {
    pub scope: String,
    pub sidebar: SidebarCounts,
    pub tags: TaskCounts,
}

#[derive(Serialize)]
pub struct ProjectListEntryJson<'a> {
    #[serde(flatten)]
    pub project: &'a Project,
    pub count: usize,
}

/// Result of a write command
#[derive(Serialize)]
pub struct MutationJson<'a> {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<&'a Confirmation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn visible_to_json<'a>(visible: &VisibleSection<'a>) -> ViewSectionJson<'a> {
    let section = visible.section;
    ViewSectionJson {
        id: &section.id,
        title: &section.title,
        due_date: section.due_date,
        due_time: section.due_time.as_deref(),
        project_id: section.project_id.as_deref(),
        is_completed: section.is_completed,
        tasks: visible.tasks.clone(),
    }
}

pub fn view_to_json<'a>(
    scope: &SidebarScope,
    tag: TagFilter,
    visible: &[VisibleSection<'a>],
) -> ViewJson<'a> {
    ViewJson {
        scope: scope.to_string(),
        tag: tag.as_str(),
        sections: visible.iter().map(visible_to_json).collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn checkbox(done: bool) -> &'static str {
    if done { "[x]" } else { "[ ]" }
}

fn format_due(date: DateTime<Utc>, time: Option<&str>) -> String {
    match time {
        Some(t) => format!("@{} {}", date.format("%Y-%m-%d"), t),
        None => format!("@{}", date.format("%Y-%m-%d")),
    }
}

/// One task line. The date shown is the task's effective date; the time is
/// the task's own and never falls back to the section's.
pub fn format_task_line(section: &Section, task: &Task) -> String {
    let star = if task.is_starred { " *" } else { "" };
    let title = if task.title.is_empty() {
        "(untitled)"
    } else {
        task.title.as_str()
    };
    format!(
        "{} {} {}{}  {}",
        checkbox(task.is_completed),
        task.id,
        title,
        star,
        format_due(section.effective_date(task), task.due_time.as_deref())
    )
}

pub fn format_section_header(section: &Section, projects: &[Project]) -> String {
    let project = section
        .project_id
        .as_deref()
        .map(|id| {
            let name = projects
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.name.as_str())
                .unwrap_or(id);
            format!(" [{}]", name)
        })
        .unwrap_or_default();
    format!(
        "{} {} {}  {}{}",
        checkbox(section.is_completed),
        section.id,
        section.title,
        format_due(section.due_date, section.due_time.as_deref()),
        project
    )
}

/// Visible sections, each followed by its visible tasks indented
pub fn format_view(visible: &[VisibleSection<'_>], projects: &[Project]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, v) in visible.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format_section_header(v.section, projects));
        for task in &v.tasks {
            lines.push(format!("  {}", format_task_line(v.section, task)));
        }
    }
    lines
}

pub fn format_project_line(project: &Project, count: usize) -> String {
    let mut extras = Vec::new();
    if let Some(icon) = &project.icon {
        extras.push(format!("icon={}", icon));
    }
    if let Some(color) = &project.color {
        extras.push(format!("color={}", color));
    }
    let extras = if extras.is_empty() {
        String::new()
    } else {
        format!("  {}", extras.join(" "))
    };
    format!("{} {} ({}){}", project.id, project.name, count, extras)
}

pub fn format_counts(
    sidebar: &SidebarCounts,
    projects: &[Project],
    scope: &SidebarScope,
    tags: &TaskCounts,
) -> Vec<String> {
    let mut lines = Vec::new();
    for fixed in FixedScope::ALL {
        lines.push(format!("{:<10}{}", fixed.as_str(), sidebar.fixed(fixed)));
    }
    for (id, count) in &sidebar.projects {
        let name = projects
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.name.as_str())
            .unwrap_or(id);
        lines.push(format!("{:<10}{}", name, count));
    }
    lines.push(String::new());
    lines.push(format!("-- {} --", scope));
    for tag in TagFilter::ALL {
        lines.push(format!("{:<10}{}", tag.as_str(), tags.get(tag)));
    }
    lines
}

pub fn format_prompt(confirmation: &Confirmation) -> String {
    let confirm = confirmation.confirm_text.as_deref().unwrap_or("Confirm");
    let cancel = confirmation.cancel_text.as_deref().unwrap_or("Cancel");
    format!(
        "{}\n{}\n[y] {} / [n] {}: ",
        confirmation.title, confirmation.message, confirm, cancel
    )
}
