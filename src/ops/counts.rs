//! Badge counts, always derived from the full collections.
//!
//! Counts go through [`ViewContext::count_visible_tasks`], so a badge
//! always equals the number of tasks the matching list would show.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::selection::{FixedScope, SidebarScope, TagFilter};
use crate::ops::view::ViewContext;

/// Per-tag counts within one sidebar scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub all: usize,
    pub important: usize,
    pub today: usize,
}

impl TaskCounts {
    pub fn get(&self, tag: TagFilter) -> usize {
        match tag {
            TagFilter::All => self.all,
            TagFilter::Important => self.important,
            TagFilter::Today => self.today,
        }
    }
}

/// Counts for every sidebar entry: what selecting it would show with the
/// tag filter reset to `All`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SidebarCounts {
    pub inbox: usize,
    pub today: usize,
    pub upcoming: usize,
    pub someday: usize,
    pub logbook: usize,
    /// Keyed by project id, in project order
    pub projects: IndexMap<String, usize>,
}

impl SidebarCounts {
    pub fn fixed(&self, scope: FixedScope) -> usize {
        match scope {
            FixedScope::Inbox => self.inbox,
            FixedScope::Today => self.today,
            FixedScope::Upcoming => self.upcoming,
            FixedScope::Someday => self.someday,
            FixedScope::Logbook => self.logbook,
        }
    }

    /// `None` for a project that no longer exists
    pub fn get(&self, scope: &SidebarScope) -> Option<usize> {
        match scope {
            SidebarScope::Fixed(fixed) => Some(self.fixed(*fixed)),
            SidebarScope::Project(id) => self.projects.get(id).copied(),
        }
    }
}

pub fn task_counts(ctx: &ViewContext<'_>, scope: &SidebarScope) -> TaskCounts {
    TaskCounts {
        all: ctx.count_visible_tasks(scope, TagFilter::All),
        important: ctx.count_visible_tasks(scope, TagFilter::Important),
        today: ctx.count_visible_tasks(scope, TagFilter::Today),
    }
}

pub fn sidebar_counts(ctx: &ViewContext<'_>) -> SidebarCounts {
    let count = |fixed: FixedScope| ctx.count_visible_tasks(&SidebarScope::Fixed(fixed), TagFilter::All);
    SidebarCounts {
        inbox: count(FixedScope::Inbox),
        today: count(FixedScope::Today),
        upcoming: count(FixedScope::Upcoming),
        someday: count(FixedScope::Someday),
        logbook: count(FixedScope::Logbook),
        projects: ctx
            .projects
            .iter()
            .map(|p| {
                let n = ctx.count_visible_tasks(&SidebarScope::Project(p.id.clone()), TagFilter::All);
                (p.id.clone(), n)
            })
            .collect(),
    }
}
