//! Visibility rules for the sidebar scope and tag filter.
//!
//! Everything here is pure: the same collections, selection and `now`
//! always produce the same view. Dates are compared through
//! [`Section::effective_date`] only.

use chrono::{DateTime, Duration, Utc};

use crate::model::project::Project;
use crate::model::section::Section;
use crate::model::selection::{FixedScope, SidebarScope, TagFilter};
use crate::model::task::Task;
use crate::util::dates::same_day;

/// How far ahead a date must be to count as "someday"
pub const SOMEDAY_HORIZON_DAYS: i64 = 7;

/// The collections and clock a view is computed against
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub sections: &'a [Section],
    pub projects: &'a [Project],
    pub now: DateTime<Utc>,
}

/// A visible section with the subset of its tasks that pass the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleSection<'a> {
    pub section: &'a Section,
    pub tasks: Vec<&'a Task>,
}

impl<'a> ViewContext<'a> {
    pub fn new(sections: &'a [Section], projects: &'a [Project], now: DateTime<Utc>) -> Self {
        ViewContext {
            sections,
            projects,
            now,
        }
    }

    fn is_today(&self, date: DateTime<Utc>) -> bool {
        same_day(date, self.now)
    }

    fn is_upcoming(&self, date: DateTime<Utc>) -> bool {
        date > self.now
    }

    fn is_someday(&self, date: DateTime<Utc>) -> bool {
        date > self.now + Duration::days(SOMEDAY_HORIZON_DAYS)
    }

    fn project_exists(&self, project_id: &str) -> bool {
        self.projects.iter().any(|p| p.id == project_id)
    }

    /// Section date or any task's effective date satisfies `pred`
    fn any_date(&self, section: &Section, pred: impl Fn(DateTime<Utc>) -> bool) -> bool {
        pred(section.due_date) || section.tasks.iter().any(|t| pred(section.effective_date(t)))
    }

    pub fn section_visible(&self, section: &Section, scope: &SidebarScope, tag: TagFilter) -> bool {
        match tag {
            TagFilter::Important => {
                if !section.tasks.iter().any(|t| t.is_starred) {
                    return false;
                }
            }
            TagFilter::Today => {
                return section
                    .tasks
                    .iter()
                    .any(|t| self.is_today(section.effective_date(t)));
            }
            TagFilter::All => {}
        }

        match scope {
            SidebarScope::Fixed(FixedScope::Inbox) => true,
            SidebarScope::Fixed(FixedScope::Today) => self.any_date(section, |d| self.is_today(d)),
            SidebarScope::Fixed(FixedScope::Upcoming) => {
                self.any_date(section, |d| self.is_upcoming(d))
            }
            SidebarScope::Fixed(FixedScope::Someday) => {
                self.any_date(section, |d| self.is_someday(d))
            }
            SidebarScope::Fixed(FixedScope::Logbook) => {
                section.is_completed || section.tasks.iter().any(|t| t.is_completed)
            }
            SidebarScope::Project(id) => {
                self.project_exists(id) && section.project_id.as_deref() == Some(id.as_str())
            }
        }
    }

    /// Only meaningful for tasks of a section that is already visible.
    pub fn task_visible(
        &self,
        section: &Section,
        task: &Task,
        scope: &SidebarScope,
        tag: TagFilter,
    ) -> bool {
        let effective = section.effective_date(task);
        match tag {
            TagFilter::Important if !task.is_starred => return false,
            TagFilter::Important => {}
            TagFilter::Today => return self.is_today(effective),
            TagFilter::All => return true,
        }

        match scope {
            SidebarScope::Fixed(FixedScope::Upcoming) => self.is_upcoming(effective),
            SidebarScope::Fixed(FixedScope::Logbook) => task.is_completed,
            SidebarScope::Fixed(_) | SidebarScope::Project(_) => true,
        }
    }

    /// Visible sections, in collection order, each with its visible tasks
    pub fn filter(&self, scope: &SidebarScope, tag: TagFilter) -> Vec<VisibleSection<'a>> {
        let sections: &'a [Section] = self.sections;
        sections
            .iter()
            .filter(|s| self.section_visible(s, scope, tag))
            .map(|section| VisibleSection {
                section,
                tasks: section
                    .tasks
                    .iter()
                    .filter(|t| self.task_visible(section, t, scope, tag))
                    .collect(),
            })
            .collect()
    }

    /// Number of tasks [`filter`](Self::filter) would show
    pub fn count_visible_tasks(&self, scope: &SidebarScope, tag: TagFilter) -> usize {
        self.filter(scope, tag).iter().map(|v| v.tasks.len()).sum()
    }
}
