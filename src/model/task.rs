use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::dates::{deserialize_some_or_now, now_some};

/// A single to-do item, owned by exactly one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_starred: bool,
    /// Own due date. `None` means the parent section's date applies.
    #[serde(
        default = "now_some",
        deserialize_with = "deserialize_some_or_now",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<DateTime<Utc>>,
    /// Free-form `HH:MM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_time: Option<String>,
}

impl Task {
    /// A blank, incomplete, unstarred task with no date of its own
    pub fn new(id: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            title: String::new(),
            notes: None,
            is_completed: false,
            is_starred: false,
            due_date: None,
            due_time: None,
        }
    }
}
