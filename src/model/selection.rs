use serde::{Deserialize, Serialize};

/// The built-in sidebar entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedScope {
    Inbox,
    Today,
    Upcoming,
    Someday,
    Logbook,
}

impl FixedScope {
    pub const ALL: [FixedScope; 5] = [
        FixedScope::Inbox,
        FixedScope::Today,
        FixedScope::Upcoming,
        FixedScope::Someday,
        FixedScope::Logbook,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FixedScope::Inbox => "inbox",
            FixedScope::Today => "today",
            FixedScope::Upcoming => "upcoming",
            FixedScope::Someday => "someday",
            FixedScope::Logbook => "logbook",
        }
    }

    pub fn parse_scope(s: &str) -> Option<Self> {
        FixedScope::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for FixedScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the sidebar is pointing at: a built-in list or a project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum SidebarScope {
    Fixed(FixedScope),
    Project(String),
}

impl SidebarScope {
    pub const INBOX: SidebarScope = SidebarScope::Fixed(FixedScope::Inbox);

    /// Built-in names match case-insensitively; anything else is a project id.
    pub fn parse_scope(s: &str) -> Self {
        match FixedScope::parse_scope(s) {
            Some(fixed) => SidebarScope::Fixed(fixed),
            None => SidebarScope::Project(s.trim().to_string()),
        }
    }

    pub fn project_id(&self) -> Option<&str> {
        match self {
            SidebarScope::Project(id) => Some(id),
            SidebarScope::Fixed(_) => None,
        }
    }
}

impl Default for SidebarScope {
    fn default() -> Self {
        SidebarScope::INBOX
    }
}

impl std::fmt::Display for SidebarScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SidebarScope::Fixed(fixed) => write!(f, "{}", fixed),
            SidebarScope::Project(id) => write!(f, "project:{}", id),
        }
    }
}

/// Secondary filter applied within the current sidebar scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagFilter {
    #[default]
    All,
    Important,
    Today,
}

impl TagFilter {
    pub const ALL: [TagFilter; 3] = [TagFilter::All, TagFilter::Important, TagFilter::Today];

    pub fn as_str(self) -> &'static str {
        match self {
            TagFilter::All => "all",
            TagFilter::Important => "important",
            TagFilter::Today => "today",
        }
    }

    pub fn parse_tag(s: &str) -> Option<Self> {
        TagFilter::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// Current sidebar scope and tag filter.
///
/// The tag resets to `All` whenever the sidebar is set, so a filter chosen
/// in one scope never silently hides everything in the next.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    sidebar: SidebarScope,
    tag: TagFilter,
}

impl Selection {
    pub fn sidebar(&self) -> &SidebarScope {
        &self.sidebar
    }

    pub fn tag(&self) -> TagFilter {
        self.tag
    }

    pub fn set_sidebar(&mut self, scope: SidebarScope) {
        self.sidebar = scope;
        self.tag = TagFilter::All;
    }

    pub fn set_tag(&mut self, tag: TagFilter) {
        self.tag = tag;
    }
}
