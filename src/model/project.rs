use serde::{Deserialize, Serialize};

/// A user-defined label that groups sections in the sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Project {
            id: id.into(),
            name: name.into(),
            color: None,
            icon: None,
        }
    }
}

/// Partial update for a project. Outer `None` leaves a field alone;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub color: Option<Option<String>>,
    pub icon: Option<Option<String>>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.icon.is_none()
    }

    /// Apply the patch to a copy of `project`
    pub fn applied_to(&self, project: &Project) -> Project {
        let mut updated = project.clone();
        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(color) = &self.color {
            updated.color = color.clone();
        }
        if let Some(icon) = &self.icon {
            updated.icon = icon.clone();
        }
        updated
    }
}
