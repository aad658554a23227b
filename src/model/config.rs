use serde::{Deserialize, Serialize};

use super::project::Project;

/// Configuration from `config.toml` in the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    /// Projects seeded when no project collection has been stored yet
    #[serde(default = "default_projects")]
    pub default_projects: Vec<ProjectSeed>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            storage: StorageConfig::default(),
            default_projects: default_projects(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_sections_key")]
    pub sections_key: String,
    #[serde(default = "default_projects_key")]
    pub projects_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            sections_key: default_sections_key(),
            projects_key: default_projects_key(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSeed {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl From<&ProjectSeed> for Project {
    fn from(seed: &ProjectSeed) -> Self {
        Project {
            id: seed.id.clone(),
            name: seed.name.clone(),
            color: seed.color.clone(),
            icon: seed.icon.clone(),
        }
    }
}

fn default_sections_key() -> String {
    "things_sections".to_string()
}

fn default_projects_key() -> String {
    "things_projects".to_string()
}

fn default_projects() -> Vec<ProjectSeed> {
    [("family", "Family"), ("work", "Work"), ("hobbies", "Hobbies")]
        .into_iter()
        .map(|(id, name)| ProjectSeed {
            id: id.to_string(),
            name: name.to_string(),
            color: None,
            icon: None,
        })
        .collect()
}
