use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::kv::FileStore;
use crate::io::lock::FileLock;
use crate::model::project::ProjectPatch;
use crate::model::section::Section;
use crate::model::selection::{SidebarScope, TagFilter};
use crate::ops::view::VisibleSection;
use crate::store::{Confirmation, Store};
use crate::util::dates::{parse_due, parse_due_time};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

const DEFAULT_DATA_DIR: &str = ".tasklane";

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let data_dir = resolve_data_dir(cli.data_dir.as_deref());
    let kv = FileStore::open(&data_dir)?;
    // Opening may seed projects or drop corrupt keys, so reads lock too
    let lock = FileLock::acquire_default(&data_dir)?;
    tracing::debug!(lock = %lock.path().display(), "data directory locked");
    let config = config_io::read_config(&data_dir)?;
    let mut store = Store::open(kv, &config);
    tracing::debug!(data_dir = %data_dir.display(), "store opened");

    match cli.command {
        Commands::Section(cmd) => cmd_section(&mut store, cmd.action, json),
        Commands::Task(cmd) => cmd_task(&mut store, cmd.action, json),
        Commands::Project(cmd) => cmd_project(&mut store, cmd.action, json),
        Commands::View(args) => cmd_view(&mut store, args, json),
        Commands::Counts(args) => cmd_counts(&mut store, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_data_dir(flag: Option<&str>) -> PathBuf {
    match flag {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => Path::new(".").join(DEFAULT_DATA_DIR),
    }
}

fn require_section<'a>(store: &'a Store<FileStore>, section_id: &str) -> Result<&'a Section, String> {
    store
        .section(section_id)
        .ok_or_else(|| format!("section not found: {}", section_id))
}

fn require_task(store: &Store<FileStore>, section_id: &str, task_id: &str) -> Result<(), String> {
    let section = require_section(store, section_id)?;
    if section.find_task(task_id).is_none() {
        return Err(format!("task not found: {} in section {}", task_id, section_id));
    }
    Ok(())
}

fn require_project(store: &Store<FileStore>, project_id: &str) -> Result<(), String> {
    match store.project(project_id) {
        Some(_) => Ok(()),
        None => Err(format!("project not found: {}", project_id)),
    }
}

fn parse_time_arg(time: Option<&str>) -> Result<Option<String>, String> {
    time.map(parse_due_time).transpose()
}

/// Answer whatever the last mutation put in the confirmation slot.
/// Returns the prompt and whether it was accepted.
fn resolve_prompt(
    store: &mut Store<FileStore>,
    answer: AnswerArgs,
    json: bool,
) -> Result<Option<(Confirmation, bool)>, Box<dyn std::error::Error>> {
    let Some(confirmation) = store.confirmation().cloned() else {
        return Ok(None);
    };
    let accepted = if answer.yes {
        true
    } else if answer.no {
        false
    } else {
        ask(&confirmation, json)?
    };
    if accepted {
        store.confirm();
    } else {
        store.cancel_confirmation();
    }
    tracing::debug!(title = %confirmation.title, accepted, "confirmation answered");
    Ok(Some((confirmation, accepted)))
}

/// Prompt on stderr and read one line from stdin; anything but `y` declines.
fn ask(confirmation: &Confirmation, json: bool) -> io::Result<bool> {
    if !json {
        let mut stderr = io::stderr();
        write!(stderr, "{}", format_prompt(confirmation))?;
        stderr.flush()?;
    }
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Report a write. Text mode prints created ids only.
fn report(json: bool, changed: bool, id: Option<&str>, prompt: Option<(Confirmation, bool)>) -> CmdResult {
    if json {
        let (prompt, confirmed) = match &prompt {
            Some((c, accepted)) => (Some(c), Some(*accepted)),
            None => (None, None),
        };
        return print_json(&MutationJson {
            changed,
            id,
            prompt,
            confirmed,
        });
    }
    if let Some(id) = id {
        println!("{}", id);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Section commands
// ---------------------------------------------------------------------------

fn cmd_section(store: &mut Store<FileStore>, action: SectionAction, json: bool) -> CmdResult {
    match action {
        SectionAction::Add(args) => {
            if let Some(ref project_id) = args.project {
                require_project(store, project_id)?;
            }
            let id = store
                .add_section(&args.title, args.project.as_deref())
                .ok_or("section title must not be empty")?;
            report(json, true, Some(id.as_str()), None)
        }
        SectionAction::List => {
            let sections = store.sections();
            if json {
                return print_json(&*sections);
            }
            let all: Vec<VisibleSection<'_>> = sections
                .iter()
                .map(|section| VisibleSection {
                    section,
                    tasks: section.tasks.iter().collect(),
                })
                .collect();
            for line in format_view(&all, &store.projects()) {
                println!("{}", line);
            }
            Ok(())
        }
        SectionAction::Title(args) => {
            require_section(store, &args.id)?;
            if args.title.trim().is_empty() {
                return Err("section title must not be empty".into());
            }
            let changed = store.update_section_title(&args.id, &args.title);
            report(json, changed, None, None)
        }
        SectionAction::Date(args) => {
            require_section(store, &args.id)?;
            let due = parse_due(&args.date, store.now())?;
            let changed = store.update_section_date(&args.id, due);
            report(json, changed, None, None)
        }
        SectionAction::Time(args) => {
            require_section(store, &args.id)?;
            let time = parse_time_arg(args.time.as_deref())?;
            let changed = store.update_section_time(&args.id, time);
            report(json, changed, None, None)
        }
        SectionAction::Done(args) => {
            require_section(store, &args.id)?;
            let changed = store.toggle_section_complete(&args.id);
            let prompt = resolve_prompt(store, args.answer, json)?;
            report(json, changed, None, prompt)
        }
        SectionAction::Assign(args) => {
            require_section(store, &args.id)?;
            if let Some(ref project_id) = args.project {
                require_project(store, project_id)?;
            }
            let changed = store.assign_section_to_project(&args.id, args.project.as_deref());
            report(json, changed, None, None)
        }
        SectionAction::Rm(args) => {
            require_section(store, &args.id)?;
            let changed = store.delete_section(&args.id);
            report(json, changed, None, None)
        }
    }
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

fn cmd_task(store: &mut Store<FileStore>, action: TaskAction, json: bool) -> CmdResult {
    match action {
        TaskAction::Add(args) => {
            require_section(store, &args.section)?;
            let id = store
                .add_task(&args.section)
                .ok_or_else(|| format!("section not found: {}", args.section))?;
            if let Some(ref title) = args.title {
                store.update_task_title(&args.section, &id, title);
            }
            report(json, true, Some(id.as_str()), None)
        }
        TaskAction::Done(args) => {
            let TaskRefArgs { section, task } = &args.task;
            require_task(store, section, task)?;
            let changed = store.toggle_task_complete(section, task);
            let prompt = resolve_prompt(store, args.answer, json)?;
            report(json, changed, None, prompt)
        }
        TaskAction::Star(args) => {
            require_task(store, &args.section, &args.task)?;
            let changed = store.toggle_task_star(&args.section, &args.task);
            report(json, changed, None, None)
        }
        TaskAction::Title(args) => {
            let TaskRefArgs { section, task } = &args.task;
            require_task(store, section, task)?;
            let changed = store.update_task_title(section, task, &args.title);
            report(json, changed, None, None)
        }
        TaskAction::Note(args) => {
            let TaskRefArgs { section, task } = &args.task;
            require_task(store, section, task)?;
            let changed = store.update_task_notes(section, task, args.text);
            report(json, changed, None, None)
        }
        TaskAction::Date(args) => {
            let TaskRefArgs { section, task } = &args.task;
            require_task(store, section, task)?;
            let due = parse_due(&args.date, store.now())?;
            let changed = store.update_task_date(section, task, due);
            report(json, changed, None, None)
        }
        TaskAction::Time(args) => {
            let TaskRefArgs { section, task } = &args.task;
            require_task(store, section, task)?;
            let time = parse_time_arg(args.time.as_deref())?;
            let changed = store.update_task_time(section, task, time);
            report(json, changed, None, None)
        }
        TaskAction::Mv(args) => {
            require_task(store, &args.from, &args.task)?;
            require_section(store, &args.to)?;
            let changed = store.move_task_to_section(&args.task, &args.from, &args.to);
            report(json, changed, None, None)
        }
        TaskAction::Rm(args) => {
            require_task(store, &args.section, &args.task)?;
            let changed = store.delete_task(&args.section, &args.task);
            report(json, changed, None, None)
        }
    }
}

// ---------------------------------------------------------------------------
// Project commands
// ---------------------------------------------------------------------------

fn cmd_project(store: &mut Store<FileStore>, action: ProjectAction, json: bool) -> CmdResult {
    match action {
        ProjectAction::Add(args) => {
            let id = store
                .add_project(&args.name)
                .ok_or("project name must not be empty")?;
            report(json, true, Some(id.as_str()), None)
        }
        ProjectAction::List => {
            let projects = store.projects();
            let counts = store.sidebar_counts();
            let count = |id: &str| counts.projects.get(id).copied().unwrap_or(0);
            if json {
                let entries: Vec<ProjectListEntryJson<'_>> = projects
                    .iter()
                    .map(|project| ProjectListEntryJson {
                        project,
                        count: count(&project.id),
                    })
                    .collect();
                return print_json(&entries);
            }
            for project in projects.iter() {
                println!("{}", format_project_line(project, count(&project.id)));
            }
            Ok(())
        }
        ProjectAction::Edit(args) => {
            require_project(store, &args.id)?;
            let clearable = |v: Option<String>| v.map(|s| Some(s).filter(|s| !s.is_empty()));
            let patch = ProjectPatch {
                name: args.name,
                color: clearable(args.color),
                icon: clearable(args.icon),
            };
            if patch.is_empty() {
                return Err("nothing to change (use --name, --color or --icon)".into());
            }
            if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
                return Err("project name must not be empty".into());
            }
            let changed = store.update_project(&args.id, &patch);
            report(json, changed, None, None)
        }
        ProjectAction::Rm(args) => {
            require_project(store, &args.id)?;
            let changed = store.delete_project(&args.id);
            report(json, changed, None, None)
        }
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn parse_scope_arg(store: &Store<FileStore>, scope: &str) -> Result<SidebarScope, String> {
    let scope = SidebarScope::parse_scope(scope);
    if let Some(project_id) = scope.project_id() {
        require_project(store, project_id)?;
    }
    Ok(scope)
}

fn cmd_view(store: &mut Store<FileStore>, args: ViewArgs, json: bool) -> CmdResult {
    let scope = parse_scope_arg(store, &args.scope)?;
    let tag = TagFilter::parse_tag(&args.tag).ok_or_else(|| {
        format!(
            "unknown tag '{}' (expected: all, important, today)",
            args.tag
        )
    })?;
    store.set_sidebar(scope.clone());
    store.set_tag(tag);

    let visible = store.visible_sections();
    if json {
        return print_json(&view_to_json(&scope, tag, &visible));
    }
    for line in format_view(&visible, &store.projects()) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_counts(store: &mut Store<FileStore>, args: CountsArgs, json: bool) -> CmdResult {
    let scope = parse_scope_arg(store, &args.scope)?;
    store.set_sidebar(scope.clone());

    let sidebar = store.sidebar_counts();
    let tags = store.task_counts();
    if json {
        return print_json(&CountsJson {
            scope: scope.to_string(),
            sidebar,
            tags,
        });
    }
    for line in format_counts(&sidebar, &store.projects(), &scope, &tags) {
        println!("{}", line);
    }
    Ok(())
}
