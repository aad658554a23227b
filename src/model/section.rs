use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::task::Task;
use crate::util::dates::deserialize_or_now;

/// A dated group of tasks, optionally filed under a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "tasks_or_empty")]
    pub tasks: Vec<Task>,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_or_now")]
    pub due_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_completed: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A missing or non-array `tasks` field loads as empty; malformed task
/// records are still an error.
fn tasks_or_empty<'de, D>(deserializer: D) -> Result<Vec<Task>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(D::Error::custom))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

impl Section {
    /// An empty section due at `due_date`
    pub fn new(id: impl Into<String>, title: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Section {
            id: id.into(),
            title: title.into(),
            tasks: Vec::new(),
            due_date,
            due_time: None,
            project_id: None,
            is_completed: false,
        }
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// True when the section has at least one task and every task is done
    pub fn all_tasks_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.is_completed)
    }

    pub fn has_incomplete_tasks(&self) -> bool {
        self.tasks.iter().any(|t| !t.is_completed)
    }

    /// The date a task is filtered and displayed by: its own, else ours
    pub fn effective_date(&self, task: &Task) -> DateTime<Utc> {
        task.due_date.unwrap_or(self.due_date)
    }
}
