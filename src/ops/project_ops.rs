use crate::model::project::{Project, ProjectPatch};
use crate::ops::section_ops::OpError;

pub fn add_project(projects: &[Project], id: &str, name: &str) -> Result<Vec<Project>, OpError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(OpError::EmptyTitle);
    }
    let mut next = projects.to_vec();
    next.push(Project::new(id, name));
    Ok(next)
}

/// Merge `patch` into the project. A patch that would blank the name is rejected.
pub fn update_project(
    projects: &[Project],
    project_id: &str,
    patch: &ProjectPatch,
) -> Result<Vec<Project>, OpError> {
    let idx = projects
        .iter()
        .position(|p| p.id == project_id)
        .ok_or_else(|| OpError::ProjectNotFound(project_id.to_string()))?;
    let mut patch = patch.clone();
    if let Some(name) = patch.name.take() {
        let name = name.trim();
        if name.is_empty() {
            return Err(OpError::EmptyTitle);
        }
        patch.name = Some(name.to_string());
    }
    let mut next = projects.to_vec();
    next[idx] = patch.applied_to(&projects[idx]);
    Ok(next)
}

/// Remove a project. Sections pointing at it are unlinked separately.
pub fn delete_project(projects: &[Project], project_id: &str) -> Result<Vec<Project>, OpError> {
    if !projects.iter().any(|p| p.id == project_id) {
        return Err(OpError::ProjectNotFound(project_id.to_string()));
    }
    Ok(projects
        .iter()
        .filter(|p| p.id != project_id)
        .cloned()
        .collect())
}

pub fn find_project<'a>(projects: &'a [Project], project_id: &str) -> Option<&'a Project> {
    projects.iter().find(|p| p.id == project_id)
}
