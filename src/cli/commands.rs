use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tl", about = concat!("tasklane v", env!("CARGO_PKG_VERSION"), " - sections, tasks and projects"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Data directory (default: ./.tasklane)
    #[arg(short = 'C', long = "data-dir", env = "TASKLANE_DIR", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage sections
    Section(SectionCmd),
    /// Manage tasks inside a section
    Task(TaskCmd),
    /// Manage projects
    Project(ProjectCmd),
    /// Show sections and tasks for a sidebar scope
    View(ViewArgs),
    /// Show sidebar and tag counts
    Counts(CountsArgs),
}

// ---------------------------------------------------------------------------
// Shared args
// ---------------------------------------------------------------------------

/// Answer a confirmation prompt without asking
#[derive(Args, Clone, Copy, Default)]
pub struct AnswerArgs {
    /// Accept the follow-up prompt
    #[arg(long, conflicts_with = "no")]
    pub yes: bool,
    /// Decline the follow-up prompt
    #[arg(long)]
    pub no: bool,
}

#[derive(Args)]
pub struct SectionIdArg {
    /// Section ID
    pub id: String,
}

#[derive(Args)]
pub struct TaskRefArgs {
    /// Section ID
    pub section: String,
    /// Task ID
    pub task: String,
}

// ---------------------------------------------------------------------------
// Section commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SectionCmd {
    #[command(subcommand)]
    pub action: SectionAction,
}

#[derive(Subcommand)]
pub enum SectionAction {
    /// Create a section due today
    Add(SectionAddArgs),
    /// List all sections
    List,
    /// Rename a section
    Title(SectionTitleArgs),
    /// Set a section's due date
    Date(SectionDateArgs),
    /// Set or clear a section's due time
    Time(SectionTimeArgs),
    /// Toggle a section's completion
    Done(SectionDoneArgs),
    /// Link a section to a project, or unlink it
    Assign(SectionAssignArgs),
    /// Delete a section and its tasks
    Rm(SectionIdArg),
}

#[derive(Args)]
pub struct SectionAddArgs {
    /// Section title
    pub title: String,
    /// Project to link the section to
    #[arg(long)]
    pub project: Option<String>,
}

#[derive(Args)]
pub struct SectionTitleArgs {
    /// Section ID
    pub id: String,
    /// New title
    pub title: String,
}

#[derive(Args)]
pub struct SectionDateArgs {
    /// Section ID
    pub id: String,
    /// today, tomorrow, YYYY-MM-DD or RFC 3339
    pub date: String,
}

#[derive(Args)]
pub struct SectionTimeArgs {
    /// Section ID
    pub id: String,
    /// HH:MM (omit to clear)
    pub time: Option<String>,
}

#[derive(Args)]
pub struct SectionDoneArgs {
    /// Section ID
    pub id: String,
    #[command(flatten)]
    pub answer: AnswerArgs,
}

#[derive(Args)]
pub struct SectionAssignArgs {
    /// Section ID
    pub id: String,
    /// Project ID (omit to unlink)
    pub project: Option<String>,
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TaskCmd {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Append a task to a section
    Add(TaskAddArgs),
    /// Toggle a task's completion
    Done(TaskDoneArgs),
    /// Toggle a task's star
    Star(TaskRefArgs),
    /// Rename a task
    Title(TaskTitleArgs),
    /// Set or clear a task's notes
    Note(TaskNoteArgs),
    /// Set a task's due date
    Date(TaskDateArgs),
    /// Set or clear a task's due time
    Time(TaskTimeArgs),
    /// Move a task to another section
    Mv(TaskMvArgs),
    /// Delete a task
    Rm(TaskRefArgs),
}

#[derive(Args)]
pub struct TaskAddArgs {
    /// Section ID
    pub section: String,
    /// Task title (default: empty)
    pub title: Option<String>,
}

#[derive(Args)]
pub struct TaskDoneArgs {
    #[command(flatten)]
    pub task: TaskRefArgs,
    #[command(flatten)]
    pub answer: AnswerArgs,
}

#[derive(Args)]
pub struct TaskTitleArgs {
    #[command(flatten)]
    pub task: TaskRefArgs,
    /// New title
    pub title: String,
}

#[derive(Args)]
pub struct TaskNoteArgs {
    #[command(flatten)]
    pub task: TaskRefArgs,
    /// Note text (omit to clear)
    pub text: Option<String>,
}

#[derive(Args)]
pub struct TaskDateArgs {
    #[command(flatten)]
    pub task: TaskRefArgs,
    /// today, tomorrow, YYYY-MM-DD or RFC 3339
    pub date: String,
}

#[derive(Args)]
pub struct TaskTimeArgs {
    #[command(flatten)]
    pub task: TaskRefArgs,
    /// HH:MM (omit to clear)
    pub time: Option<String>,
}

#[derive(Args)]
pub struct TaskMvArgs {
    /// Task ID
    pub task: String,
    /// Section the task is in
    pub from: String,
    /// Destination section
    pub to: String,
}

// ---------------------------------------------------------------------------
// Project commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectCmd {
    #[command(subcommand)]
    pub action: ProjectAction,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project
    Add(ProjectAddArgs),
    /// List projects with their task counts
    List,
    /// Change a project's name, color or icon
    Edit(ProjectEditArgs),
    /// Delete a project and unlink its sections
    Rm(ProjectIdArg),
}

#[derive(Args)]
pub struct ProjectAddArgs {
    /// Project name
    pub name: String,
}

#[derive(Args)]
pub struct ProjectIdArg {
    /// Project ID
    pub id: String,
}

#[derive(Args)]
pub struct ProjectEditArgs {
    /// Project ID
    pub id: String,
    /// New name
    #[arg(long)]
    pub name: Option<String>,
    /// New color (empty string clears)
    #[arg(long)]
    pub color: Option<String>,
    /// New icon (empty string clears)
    #[arg(long)]
    pub icon: Option<String>,
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ViewArgs {
    /// inbox, today, upcoming, someday, logbook or a project ID
    #[arg(default_value = "inbox")]
    pub scope: String,
    /// Tag filter: all, important or today
    #[arg(long, default_value = "all")]
    pub tag: String,
}

#[derive(Args)]
pub struct CountsArgs {
    /// Sidebar scope for the tag counts
    #[arg(default_value = "inbox")]
    pub scope: String,
}
