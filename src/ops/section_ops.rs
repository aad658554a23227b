//! Pure transformations of the section collection.
//!
//! Every function takes the current collection by reference and returns a
//! fresh one, or an [`OpError`] when the target does not exist. Callers
//! treat an error as "nothing changed".

use chrono::{DateTime, Utc};

use crate::model::section::Section;
use crate::model::task::Task;

/// Error type for section/task/project operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OpError {
    #[error("section not found: {0}")]
    SectionNotFound(String),
    #[error("task not found: {task_id} in section {section_id}")]
    TaskNotFound { section_id: String, task_id: String },
    #[error("project not found: {0}")]
    ProjectNotFound(String),
    #[error("title must not be empty")]
    EmptyTitle,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Copy `sections`, replacing the one with `section_id` by `f(section)`.
fn update_section(
    sections: &[Section],
    section_id: &str,
    f: impl FnOnce(&Section) -> Result<Section, OpError>,
) -> Result<Vec<Section>, OpError> {
    let idx = sections
        .iter()
        .position(|s| s.id == section_id)
        .ok_or_else(|| OpError::SectionNotFound(section_id.to_string()))?;
    let updated = f(&sections[idx])?;
    let mut next = sections.to_vec();
    next[idx] = updated;
    Ok(next)
}

/// Copy `sections`, replacing one task by `f(task)`.
fn update_task(
    sections: &[Section],
    section_id: &str,
    task_id: &str,
    f: impl FnOnce(&Task) -> Task,
) -> Result<Vec<Section>, OpError> {
    update_section(sections, section_id, |section| {
        let idx = section
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| OpError::TaskNotFound {
                section_id: section_id.to_string(),
                task_id: task_id.to_string(),
            })?;
        let mut updated = section.clone();
        updated.tasks[idx] = f(&section.tasks[idx]);
        Ok(updated)
    })
}

fn trimmed_title(title: &str) -> Result<String, OpError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err(OpError::EmptyTitle)
    } else {
        Ok(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Append a new empty section due `now`.
pub fn add_section(
    sections: &[Section],
    id: &str,
    title: &str,
    project_id: Option<String>,
    now: DateTime<Utc>,
) -> Result<Vec<Section>, OpError> {
    let mut section = Section::new(id, trimmed_title(title)?, now);
    section.project_id = project_id;
    let mut next = sections.to_vec();
    next.push(section);
    Ok(next)
}

pub fn update_section_title(
    sections: &[Section],
    section_id: &str,
    title: &str,
) -> Result<Vec<Section>, OpError> {
    let title = trimmed_title(title)?;
    update_section(sections, section_id, |s| {
        Ok(Section {
            title,
            ..s.clone()
        })
    })
}

/// Change the section's own date. Existing tasks keep theirs.
pub fn update_section_date(
    sections: &[Section],
    section_id: &str,
    due_date: DateTime<Utc>,
) -> Result<Vec<Section>, OpError> {
    update_section(sections, section_id, |s| {
        Ok(Section {
            due_date,
            ..s.clone()
        })
    })
}

pub fn update_section_time(
    sections: &[Section],
    section_id: &str,
    due_time: Option<String>,
) -> Result<Vec<Section>, OpError> {
    update_section(sections, section_id, |s| {
        Ok(Section {
            due_time,
            ..s.clone()
        })
    })
}

pub fn set_section_completed(
    sections: &[Section],
    section_id: &str,
    is_completed: bool,
) -> Result<Vec<Section>, OpError> {
    update_section(sections, section_id, |s| {
        Ok(Section {
            is_completed,
            ..s.clone()
        })
    })
}

/// Mark every task in the section completed.
pub fn complete_all_tasks(sections: &[Section], section_id: &str) -> Result<Vec<Section>, OpError> {
    update_section(sections, section_id, |s| {
        let mut updated = s.clone();
        for task in &mut updated.tasks {
            task.is_completed = true;
        }
        Ok(updated)
    })
}

pub fn assign_section_to_project(
    sections: &[Section],
    section_id: &str,
    project_id: Option<String>,
) -> Result<Vec<Section>, OpError> {
    update_section(sections, section_id, |s| {
        Ok(Section {
            project_id,
            ..s.clone()
        })
    })
}

/// Unlink every section that points at `project_id`. Sections survive.
pub fn clear_project(sections: &[Section], project_id: &str) -> Vec<Section> {
    sections
        .iter()
        .map(|s| {
            if s.project_id.as_deref() == Some(project_id) {
                Section {
                    project_id: None,
                    ..s.clone()
                }
            } else {
                s.clone()
            }
        })
        .collect()
}

pub fn delete_section(sections: &[Section], section_id: &str) -> Result<Vec<Section>, OpError> {
    if !sections.iter().any(|s| s.id == section_id) {
        return Err(OpError::SectionNotFound(section_id.to_string()));
    }
    Ok(sections
        .iter()
        .filter(|s| s.id != section_id)
        .cloned()
        .collect())
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Append a blank task whose due date/time are copied from the section.
pub fn add_task(sections: &[Section], section_id: &str, task_id: &str) -> Result<Vec<Section>, OpError> {
    update_section(sections, section_id, |s| {
        let mut task = Task::new(task_id);
        task.due_date = Some(s.due_date);
        task.due_time = s.due_time.clone();
        let mut updated = s.clone();
        updated.tasks.push(task);
        Ok(updated)
    })
}

pub fn toggle_task_complete(
    sections: &[Section],
    section_id: &str,
    task_id: &str,
) -> Result<Vec<Section>, OpError> {
    update_task(sections, section_id, task_id, |t| Task {
        is_completed: !t.is_completed,
        ..t.clone()
    })
}

pub fn toggle_task_star(
    sections: &[Section],
    section_id: &str,
    task_id: &str,
) -> Result<Vec<Section>, OpError> {
    update_task(sections, section_id, task_id, |t| Task {
        is_starred: !t.is_starred,
        ..t.clone()
    })
}

/// Set a task's title verbatim (empty titles are allowed, new tasks start empty).
pub fn update_task_title(
    sections: &[Section],
    section_id: &str,
    task_id: &str,
    title: &str,
) -> Result<Vec<Section>, OpError> {
    update_task(sections, section_id, task_id, |t| Task {
        title: title.to_string(),
        ..t.clone()
    })
}

pub fn update_task_notes(
    sections: &[Section],
    section_id: &str,
    task_id: &str,
    notes: Option<String>,
) -> Result<Vec<Section>, OpError> {
    let notes = notes.filter(|n| !n.trim().is_empty());
    update_task(sections, section_id, task_id, |t| Task {
        notes,
        ..t.clone()
    })
}

pub fn update_task_date(
    sections: &[Section],
    section_id: &str,
    task_id: &str,
    due_date: DateTime<Utc>,
) -> Result<Vec<Section>, OpError> {
    update_task(sections, section_id, task_id, |t| Task {
        due_date: Some(due_date),
        ..t.clone()
    })
}

pub fn update_task_time(
    sections: &[Section],
    section_id: &str,
    task_id: &str,
    due_time: Option<String>,
) -> Result<Vec<Section>, OpError> {
    update_task(sections, section_id, task_id, |t| Task {
        due_time,
        ..t.clone()
    })
}

pub fn delete_task(
    sections: &[Section],
    section_id: &str,
    task_id: &str,
) -> Result<Vec<Section>, OpError> {
    update_section(sections, section_id, |s| {
        if s.find_task(task_id).is_none() {
            return Err(OpError::TaskNotFound {
                section_id: section_id.to_string(),
                task_id: task_id.to_string(),
            });
        }
        let mut updated = s.clone();
        updated.tasks.retain(|t| t.id != task_id);
        Ok(updated)
    })
}

/// Move a task to the end of another section, unchanged.
///
/// Both sections must exist and the task must be in `from`; otherwise
/// nothing moves. Moving within one section sends the task to the end.
pub fn move_task_to_section(
    sections: &[Section],
    task_id: &str,
    from_section_id: &str,
    to_section_id: &str,
) -> Result<Vec<Section>, OpError> {
    let from = sections
        .iter()
        .position(|s| s.id == from_section_id)
        .ok_or_else(|| OpError::SectionNotFound(from_section_id.to_string()))?;
    let to = sections
        .iter()
        .position(|s| s.id == to_section_id)
        .ok_or_else(|| OpError::SectionNotFound(to_section_id.to_string()))?;
    let task_idx = sections[from]
        .tasks
        .iter()
        .position(|t| t.id == task_id)
        .ok_or_else(|| OpError::TaskNotFound {
            section_id: from_section_id.to_string(),
            task_id: task_id.to_string(),
        })?;

    let mut next = sections.to_vec();
    let task = next[from].tasks.remove(task_idx);
    next[to].tasks.push(task);
    Ok(next)
}
