//! The domain store: canonical projects and sections, the current
//! selection, draft input state and the confirmation slot.
//!
//! Collections are immutable `Arc<Vec<_>>` snapshots. Every mutation
//! builds a new vector through `ops`, swaps it in and writes the whole
//! collection back to storage. A mutation that targets an unknown id leaves
//! the snapshot (and its `Arc`) untouched.

pub mod confirm;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::io::kv::KeyValueStore;
use crate::io::persist;
use crate::model::config::{AppConfig, StorageConfig};
use crate::model::project::{Project, ProjectPatch};
use crate::model::section::Section;
use crate::model::selection::{Selection, SidebarScope, TagFilter};
use crate::ops::counts::{self, SidebarCounts, TaskCounts};
use crate::ops::ids::IdGenerator;
use crate::ops::section_ops::{self, OpError};
use crate::ops::project_ops;
use crate::ops::view::{ViewContext, VisibleSection};

pub use confirm::{ConfirmOptions, Confirmation, ConfirmationSlot, PendingAction};

pub const ALL_TASKS_COMPLETE_TITLE: &str = "All Tasks Complete!";
pub const COMPLETE_ALL_TASKS_TITLE: &str = "Complete All Tasks?";

/// Not-yet-submitted input for the "new section" and "new project" fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub new_section_title: String,
    pub is_adding_section: bool,
    pub new_section_project_id: Option<String>,
    pub new_project_name: String,
    pub is_adding_project: bool,
    pub is_editing_projects: bool,
}

pub struct Store<S: KeyValueStore> {
    kv: S,
    keys: StorageConfig,
    sections: Arc<Vec<Section>>,
    projects: Arc<Vec<Project>>,
    selection: Selection,
    draft: Draft,
    confirmation: ConfirmationSlot,
    ids: IdGenerator,
    clock: fn() -> DateTime<Utc>,
}

impl<S: KeyValueStore> Store<S> {
    /// Load both collections from `kv`. Seeded default projects are written
    /// back immediately.
    pub fn open(mut kv: S, config: &AppConfig) -> Self {
        let keys = config.storage.clone();
        let sections = persist::load_sections(&mut kv, &keys.sections_key);

        let mut seeded = false;
        let projects = persist::load_projects(&mut kv, &keys.projects_key, || {
            seeded = true;
            config.default_projects.iter().map(Project::from).collect()
        });
        if seeded {
            tracing::debug!(count = projects.len(), "seeding default projects");
            persist::save(&mut kv, &keys.projects_key, &projects);
        }

        Store {
            kv,
            keys,
            sections: Arc::new(sections),
            projects: Arc::new(projects),
            selection: Selection::default(),
            draft: Draft::default(),
            confirmation: ConfirmationSlot::default(),
            ids: IdGenerator::new(),
            clock: Utc::now,
        }
    }

    /// Replace the clock used for due dates, ids and views
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    pub fn sections(&self) -> Arc<Vec<Section>> {
        Arc::clone(&self.sections)
    }

    pub fn projects(&self) -> Arc<Vec<Project>> {
        Arc::clone(&self.projects)
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        project_ops::find_project(&self.projects, project_id)
    }

    // -----------------------------------------------------------------------
    // Commit helpers
    // -----------------------------------------------------------------------

    fn commit_sections(&mut self, op: &str, result: Result<Vec<Section>, OpError>) -> bool {
        match result {
            Ok(next) if next == *self.sections => false,
            Ok(next) => {
                self.sections = Arc::new(next);
                persist::save(&mut self.kv, &self.keys.sections_key, self.sections.as_slice());
                true
            }
            Err(e) => {
                tracing::debug!(op, error = %e, "mutation ignored");
                false
            }
        }
    }

    fn commit_projects(&mut self, op: &str, result: Result<Vec<Project>, OpError>) -> bool {
        match result {
            Ok(next) if next == *self.projects => false,
            Ok(next) => {
                self.projects = Arc::new(next);
                persist::save(&mut self.kv, &self.keys.projects_key, self.projects.as_slice());
                true
            }
            Err(e) => {
                tracing::debug!(op, error = %e, "mutation ignored");
                false
            }
        }
    }

    fn next_section_id(&mut self, now: DateTime<Utc>) -> String {
        let sections = &self.sections;
        self.ids
            .next_id(now, |candidate| sections.iter().any(|s| s.id == candidate))
    }

    fn next_task_id(&mut self, now: DateTime<Utc>) -> String {
        let sections = &self.sections;
        self.ids.next_id(now, |candidate| {
            sections
                .iter()
                .any(|s| s.tasks.iter().any(|t| t.id == candidate))
        })
    }

    fn next_project_id(&mut self, now: DateTime<Utc>) -> String {
        let projects = &self.projects;
        self.ids
            .next_id(now, |candidate| projects.iter().any(|p| p.id == candidate))
    }

    // -----------------------------------------------------------------------
    // Sections
    // -----------------------------------------------------------------------

    /// Create a section due now. Without an explicit project the draft's
    /// pending project is used. Returns the new id, or `None` for a blank
    /// title.
    pub fn add_section(&mut self, title: &str, project_id: Option<&str>) -> Option<String> {
        let now = self.now();
        let project_id = project_id
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .or_else(|| self.draft.new_section_project_id.clone());
        let id = self.next_section_id(now);
        let result = section_ops::add_section(&self.sections, &id, title, project_id, now);
        if !self.commit_sections("add_section", result) {
            return None;
        }
        self.draft.new_section_title.clear();
        self.draft.new_section_project_id = None;
        self.draft.is_adding_section = false;
        Some(id)
    }

    pub fn update_section_title(&mut self, section_id: &str, title: &str) -> bool {
        let result = section_ops::update_section_title(&self.sections, section_id, title);
        self.commit_sections("update_section_title", result)
    }

    pub fn update_section_date(&mut self, section_id: &str, due_date: DateTime<Utc>) -> bool {
        let result = section_ops::update_section_date(&self.sections, section_id, due_date);
        self.commit_sections("update_section_date", result)
    }

    pub fn update_section_time(&mut self, section_id: &str, due_time: Option<String>) -> bool {
        let result = section_ops::update_section_time(&self.sections, section_id, due_time);
        self.commit_sections("update_section_time", result)
    }

    /// Flip the section's completion. Completing a section that still has
    /// open tasks asks whether to complete them too; declining leaves the
    /// section complete and the tasks as they were.
    pub fn toggle_section_complete(&mut self, section_id: &str) -> bool {
        let Some(section) = self.section(section_id) else {
            tracing::debug!(section_id, "toggle_section_complete: unknown section");
            return false;
        };
        let completing = !section.is_completed;
        let open = section.tasks.iter().filter(|t| !t.is_completed).count();
        let title = section.title.clone();

        let result = section_ops::set_section_completed(&self.sections, section_id, completing);
        if !self.commit_sections("toggle_section_complete", result) {
            return false;
        }

        if completing && open > 0 {
            let noun = if open == 1 { "task" } else { "tasks" };
            self.confirmation.show(
                COMPLETE_ALL_TASKS_TITLE,
                format!(
                    "\"{}\" still has {} incomplete {}. Mark them as complete too?",
                    title, open, noun
                ),
                PendingAction::CompleteAllTasks {
                    section_id: section_id.to_string(),
                },
                ConfirmOptions {
                    confirm_text: Some("Complete All".to_string()),
                    cancel_text: Some("Leave Open".to_string()),
                },
            );
        }
        true
    }

    pub fn assign_section_to_project(&mut self, section_id: &str, project_id: Option<&str>) -> bool {
        let project_id = project_id.filter(|p| !p.is_empty()).map(str::to_string);
        let result = section_ops::assign_section_to_project(&self.sections, section_id, project_id);
        self.commit_sections("assign_section_to_project", result)
    }

    pub fn delete_section(&mut self, section_id: &str) -> bool {
        let result = section_ops::delete_section(&self.sections, section_id);
        self.commit_sections("delete_section", result)
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    /// Append a blank task that inherits the section's date and time
    pub fn add_task(&mut self, section_id: &str) -> Option<String> {
        let now = self.now();
        let id = self.next_task_id(now);
        let result = section_ops::add_task(&self.sections, section_id, &id);
        self.commit_sections("add_task", result).then_some(id)
    }

    /// Flip a task's completion. When that leaves every task in an open
    /// section completed, offer to complete the section.
    pub fn toggle_task_complete(&mut self, section_id: &str, task_id: &str) -> bool {
        let result = section_ops::toggle_task_complete(&self.sections, section_id, task_id);
        if !self.commit_sections("toggle_task_complete", result) {
            return false;
        }

        if let Some(section) = self.section(section_id)
            && section.all_tasks_completed()
            && !section.is_completed
        {
            let message = format!(
                "Every task in \"{}\" is done. Mark the section as complete?",
                section.title
            );
            self.confirmation.show(
                ALL_TASKS_COMPLETE_TITLE,
                message,
                PendingAction::CompleteSection {
                    section_id: section_id.to_string(),
                },
                ConfirmOptions {
                    confirm_text: Some("Complete Section".to_string()),
                    cancel_text: Some("Not Now".to_string()),
                },
            );
        }
        true
    }

    pub fn toggle_task_star(&mut self, section_id: &str, task_id: &str) -> bool {
        let result = section_ops::toggle_task_star(&self.sections, section_id, task_id);
        self.commit_sections("toggle_task_star", result)
    }

    pub fn update_task_title(&mut self, section_id: &str, task_id: &str, title: &str) -> bool {
        let result = section_ops::update_task_title(&self.sections, section_id, task_id, title);
        self.commit_sections("update_task_title", result)
    }

    pub fn update_task_notes(
        &mut self,
        section_id: &str,
        task_id: &str,
        notes: Option<String>,
    ) -> bool {
        let result = section_ops::update_task_notes(&self.sections, section_id, task_id, notes);
        self.commit_sections("update_task_notes", result)
    }

    pub fn update_task_date(
        &mut self,
        section_id: &str,
        task_id: &str,
        due_date: DateTime<Utc>,
    ) -> bool {
        let result = section_ops::update_task_date(&self.sections, section_id, task_id, due_date);
        self.commit_sections("update_task_date", result)
    }

    pub fn update_task_time(
        &mut self,
        section_id: &str,
        task_id: &str,
        due_time: Option<String>,
    ) -> bool {
        let result = section_ops::update_task_time(&self.sections, section_id, task_id, due_time);
        self.commit_sections("update_task_time", result)
    }

    pub fn move_task_to_section(
        &mut self,
        task_id: &str,
        from_section_id: &str,
        to_section_id: &str,
    ) -> bool {
        let result = section_ops::move_task_to_section(
            &self.sections,
            task_id,
            from_section_id,
            to_section_id,
        );
        self.commit_sections("move_task_to_section", result)
    }

    pub fn delete_task(&mut self, section_id: &str, task_id: &str) -> bool {
        let result = section_ops::delete_task(&self.sections, section_id, task_id);
        self.commit_sections("delete_task", result)
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    pub fn add_project(&mut self, name: &str) -> Option<String> {
        let now = self.now();
        let id = self.next_project_id(now);
        let result = project_ops::add_project(&self.projects, &id, name);
        if !self.commit_projects("add_project", result) {
            return None;
        }
        self.draft.new_project_name.clear();
        self.draft.is_adding_project = false;
        Some(id)
    }

    pub fn update_project(&mut self, project_id: &str, patch: &ProjectPatch) -> bool {
        let result = project_ops::update_project(&self.projects, project_id, patch);
        self.commit_projects("update_project", result)
    }

    /// Remove a project and unlink its sections. A sidebar pointing at the
    /// project falls back to the inbox.
    pub fn delete_project(&mut self, project_id: &str) -> bool {
        let result = project_ops::delete_project(&self.projects, project_id);
        if !self.commit_projects("delete_project", result) {
            return false;
        }
        let unlinked = section_ops::clear_project(&self.sections, project_id);
        self.commit_sections("delete_project", Ok(unlinked));
        if self.selection.sidebar().project_id() == Some(project_id) {
            self.selection.set_sidebar(SidebarScope::INBOX);
        }
        true
    }

    // -----------------------------------------------------------------------
    // Confirmation
    // -----------------------------------------------------------------------

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.current()
    }

    /// Accept the pending prompt and run its action
    pub fn confirm(&mut self) -> bool {
        let Some(action) = self.confirmation.confirm() else {
            return false;
        };
        match action {
            PendingAction::CompleteSection { section_id } => {
                let result = section_ops::set_section_completed(&self.sections, &section_id, true);
                self.commit_sections("confirm_complete_section", result)
            }
            PendingAction::CompleteAllTasks { section_id } => {
                let result = section_ops::complete_all_tasks(&self.sections, &section_id);
                self.commit_sections("confirm_complete_all_tasks", result)
            }
        }
    }

    /// Dismiss the pending prompt without running it
    pub fn cancel_confirmation(&mut self) {
        self.confirmation.cancel();
    }

    // -----------------------------------------------------------------------
    // Selection and draft state
    // -----------------------------------------------------------------------

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_sidebar(&mut self, scope: SidebarScope) {
        self.selection.set_sidebar(scope);
    }

    pub fn set_tag(&mut self, tag: TagFilter) {
        self.selection.set_tag(tag);
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn set_new_section_title(&mut self, title: &str) {
        self.draft.new_section_title = title.to_string();
    }

    pub fn set_adding_section(&mut self, adding: bool) {
        self.draft.is_adding_section = adding;
    }

    pub fn set_new_section_project(&mut self, project_id: Option<&str>) {
        self.draft.new_section_project_id = project_id.map(str::to_string);
    }

    pub fn set_new_project_name(&mut self, name: &str) {
        self.draft.new_project_name = name.to_string();
    }

    pub fn set_adding_project(&mut self, adding: bool) {
        self.draft.is_adding_project = adding;
    }

    pub fn set_editing_projects(&mut self, editing: bool) {
        self.draft.is_editing_projects = editing;
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn view_context(&self) -> ViewContext<'_> {
        ViewContext::new(&self.sections, &self.projects, self.now())
    }

    /// Sections and tasks for the current selection
    pub fn visible_sections(&self) -> Vec<VisibleSection<'_>> {
        self.view_context()
            .filter(self.selection.sidebar(), self.selection.tag())
    }

    /// Tag counts for the current sidebar scope
    pub fn task_counts(&self) -> TaskCounts {
        counts::task_counts(&self.view_context(), self.selection.sidebar())
    }

    pub fn sidebar_counts(&self) -> SidebarCounts {
        counts::sidebar_counts(&self.view_context())
    }
}
