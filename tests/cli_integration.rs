//! Integration tests for the `tl` CLI.
//!
//! Each test works in a temp directory, runs `tl` as a subprocess,
//! and verifies stdout and/or the stored JSON files.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde_json::Value;

/// Get the path to the built `tl` binary.
fn tl_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tl");
    path
}

fn tl_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(tl_bin());
    cmd.args(args)
        .current_dir(dir)
        .env_remove("TASKLANE_DIR")
        .env_remove("TASKLANE_LOG");
    cmd
}

/// Run `tl` with args in the given directory, return (stdout, stderr, success).
fn run_tl(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = tl_command(dir, args).output().expect("failed to run tl");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tl` expecting success, return stdout.
fn run_tl_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tl(dir, args);
    if !success {
        panic!(
            "tl {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `tl` feeding `input` on stdin.
fn run_tl_with_input(dir: &Path, args: &[&str], input: &str) -> String {
    let mut child = tl_command(dir, args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn tl");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(
        output.status.success(),
        "tl {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    serde_json::from_str(&run_tl_ok(dir, &full)).unwrap()
}

/// Create a section with one titled task; returns (section id, task id).
fn section_with_task(dir: &Path, title: &str) -> (String, String) {
    let section = run_tl_ok(dir, &["section", "add", title]).trim().to_string();
    let task = run_tl_ok(dir, &["task", "add", &section, "First"])
        .trim()
        .to_string();
    (section, task)
}

fn stored(dir: &Path, key: &str) -> Value {
    let path = dir.join(".tasklane").join(format!("{}.json", key));
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[test]
fn test_section_add_persists() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = run_tl_ok(tmp.path(), &["section", "add", "  Errands "])
        .trim()
        .to_string();
    assert!(id.parse::<i64>().is_ok());

    let sections = stored(tmp.path(), "things_sections");
    assert_eq!(sections[0]["id"], id.as_str());
    assert_eq!(sections[0]["title"], "Errands");
    assert_eq!(sections[0]["tasks"], Value::Array(vec![]));
    assert!(sections[0]["dueDate"].is_string());
}

#[test]
fn test_section_add_blank_title_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_tl(tmp.path(), &["section", "add", "   "]);
    assert!(!success);
    assert!(stderr.contains("must not be empty"));
    assert!(!tmp.path().join(".tasklane/things_sections.json").exists());
}

#[test]
fn test_section_list_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (section, task) = section_with_task(tmp.path(), "Errands");
    let out = run_tl_ok(tmp.path(), &["section", "list"]);
    assert!(out.contains(&format!("[ ] {} Errands", section)));
    assert!(out.contains(&format!("  [ ] {} First", task)));
}

#[test]
fn test_section_date_and_time() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (section, _) = section_with_task(tmp.path(), "Trip");
    run_tl_ok(tmp.path(), &["section", "date", &section, "2031-02-03"]);
    run_tl_ok(tmp.path(), &["section", "time", &section, "7:05"]);

    let sections = stored(tmp.path(), "things_sections");
    assert_eq!(sections[0]["dueDate"], "2031-02-03T00:00:00Z");
    assert_eq!(sections[0]["dueTime"], "07:05");

    run_tl_ok(tmp.path(), &["section", "time", &section]);
    assert!(stored(tmp.path(), "things_sections")[0].get("dueTime").is_none());
}

#[test]
fn test_invalid_date_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (section, _) = section_with_task(tmp.path(), "Trip");
    let (_, stderr, success) = run_tl(tmp.path(), &["section", "date", &section, "someday"]);
    assert!(!success);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_unknown_section_is_not_found() {
    let tmp = tempfile::TempDir::new().unwrap();
    for args in [
        vec!["section", "title", "404", "x"],
        vec!["section", "done", "404", "--yes"],
        vec!["task", "add", "404"],
        vec!["task", "star", "404", "1"],
    ] {
        let (_, stderr, success) = run_tl(tmp.path(), &args);
        assert!(!success, "{:?} should fail", args);
        assert!(stderr.contains("not found"), "{:?}: {}", args, stderr);
    }
}

#[test]
fn test_section_done_cascade_yes() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (section, _) = section_with_task(tmp.path(), "Errands");
    run_tl_ok(tmp.path(), &["task", "add", &section, "Second"]);

    let result = run_json(tmp.path(), &["section", "done", &section, "--yes"]);
    assert_eq!(result["prompt"]["title"], "Complete All Tasks?");
    assert_eq!(result["confirmed"], true);

    let sections = stored(tmp.path(), "things_sections");
    assert_eq!(sections[0]["isCompleted"], true);
    for task in sections[0]["tasks"].as_array().unwrap() {
        assert_eq!(task["isCompleted"], true);
    }
}

#[test]
fn test_section_done_cascade_declined() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (section, _) = section_with_task(tmp.path(), "Errands");
    // No --yes/--no and empty stdin: the prompt is declined
    run_tl_ok(tmp.path(), &["section", "done", &section]);

    let sections = stored(tmp.path(), "things_sections");
    assert_eq!(sections[0]["isCompleted"], true);
    assert_eq!(sections[0]["tasks"][0]["isCompleted"], false);
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[test]
fn test_task_add_inherits_section_date() {
    let tmp = tempfile::TempDir::new().unwrap();
    let section = run_tl_ok(tmp.path(), &["section", "add", "Trip"])
        .trim()
        .to_string();
    run_tl_ok(tmp.path(), &["section", "date", &section, "2031-02-03"]);
    run_tl_ok(tmp.path(), &["section", "time", &section, "09:00"]);
    let task = run_tl_ok(tmp.path(), &["task", "add", &section])
        .trim()
        .to_string();

    let sections = stored(tmp.path(), "things_sections");
    let stored_task = &sections[0]["tasks"][0];
    assert_eq!(stored_task["id"], task.as_str());
    assert_eq!(stored_task["title"], "");
    assert_eq!(stored_task["dueDate"], "2031-02-03T00:00:00Z");
    assert_eq!(stored_task["dueTime"], "09:00");
}

#[test]
fn test_cleared_task_time_does_not_show_section_time() {
    let tmp = tempfile::TempDir::new().unwrap();
    let section = run_tl_ok(tmp.path(), &["section", "add", "Trip"])
        .trim()
        .to_string();
    run_tl_ok(tmp.path(), &["section", "time", &section, "09:30"]);
    let task = run_tl_ok(tmp.path(), &["task", "add", &section, "Pack"])
        .trim()
        .to_string();
    run_tl_ok(tmp.path(), &["task", "time", &section, &task]);

    let sections = stored(tmp.path(), "things_sections");
    assert!(sections[0]["tasks"][0].get("dueTime").is_none());

    let out = run_tl_ok(tmp.path(), &["section", "list"]);
    let header = out
        .lines()
        .find(|l| l.starts_with(&format!("[ ] {} Trip", section)))
        .unwrap();
    let task_line = out
        .lines()
        .find(|l| l.contains(&format!("{} Pack", task)))
        .unwrap();
    assert!(header.contains("09:30"));
    assert!(!task_line.contains("09:30"), "task line: {}", task_line);
}

#[test]
fn test_task_done_offers_section_completion() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (section, task) = section_with_task(tmp.path(), "Errands");

    let result = run_json(tmp.path(), &["task", "done", &section, &task, "--yes"]);
    assert_eq!(result["changed"], true);
    assert_eq!(result["prompt"]["title"], "All Tasks Complete!");
    assert_eq!(result["prompt"]["action"]["kind"], "complete_section");

    let sections = stored(tmp.path(), "things_sections");
    assert_eq!(sections[0]["isCompleted"], true);
    assert_eq!(sections[0]["tasks"][0]["isCompleted"], true);
}

#[test]
fn test_task_done_declined_keeps_section_open() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (section, task) = section_with_task(tmp.path(), "Errands");
    run_tl_ok(tmp.path(), &["task", "done", &section, &task, "--no"]);

    let sections = stored(tmp.path(), "things_sections");
    assert!(sections[0].get("isCompleted").is_none());
    assert_eq!(sections[0]["tasks"][0]["isCompleted"], true);
}

#[test]
fn test_task_done_answer_from_stdin() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (section, task) = section_with_task(tmp.path(), "Errands");
    run_tl_with_input(tmp.path(), &["task", "done", &section, &task], "y\n");
    assert_eq!(stored(tmp.path(), "things_sections")[0]["isCompleted"], true);
}

#[test]
fn test_task_star_note_and_title() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (section, task) = section_with_task(tmp.path(), "Errands");
    run_tl_ok(tmp.path(), &["task", "star", &section, &task]);
    run_tl_ok(tmp.path(), &["task", "title", &section, &task, "Buy milk"]);
    run_tl_ok(tmp.path(), &["task", "note", &section, &task, "2 litres"]);

    let t = &stored(tmp.path(), "things_sections")[0]["tasks"][0];
    assert_eq!(t["isStarred"], true);
    assert_eq!(t["title"], "Buy milk");
    assert_eq!(t["notes"], "2 litres");

    run_tl_ok(tmp.path(), &["task", "note", &section, &task]);
    assert!(stored(tmp.path(), "things_sections")[0]["tasks"][0].get("notes").is_none());
}

#[test]
fn test_task_mv_and_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (from, task) = section_with_task(tmp.path(), "From");
    let to = run_tl_ok(tmp.path(), &["section", "add", "To"])
        .trim()
        .to_string();

    run_tl_ok(tmp.path(), &["task", "mv", &task, &from, &to]);
    let sections = stored(tmp.path(), "things_sections");
    assert_eq!(sections[0]["tasks"], Value::Array(vec![]));
    assert_eq!(sections[1]["tasks"][0]["id"], task.as_str());

    let (_, stderr, success) = run_tl(tmp.path(), &["task", "mv", &task, &from, &to]);
    assert!(!success);
    assert!(stderr.contains("not found"));

    run_tl_ok(tmp.path(), &["task", "rm", &to, &task]);
    assert_eq!(stored(tmp.path(), "things_sections")[1]["tasks"], Value::Array(vec![]));
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[test]
fn test_default_projects_seeded() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tl_ok(tmp.path(), &["project", "list"]);
    assert_eq!(out, "family Family (0)\nwork Work (0)\nhobbies Hobbies (0)\n");
    assert_eq!(
        stored(tmp.path(), "things_projects").as_array().unwrap().len(),
        3
    );
}

#[test]
fn test_project_add_edit_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = run_tl_ok(tmp.path(), &["project", "add", "Side gig"])
        .trim()
        .to_string();
    run_tl_ok(
        tmp.path(),
        &["project", "edit", &id, "--color", "teal", "--icon", "star"],
    );
    let out = run_tl_ok(tmp.path(), &["project", "list"]);
    assert!(out.contains(&format!("{} Side gig (0)  icon=star color=teal", id)));

    run_tl_ok(tmp.path(), &["project", "edit", &id, "--color", ""]);
    let projects = stored(tmp.path(), "things_projects");
    assert!(projects[3].get("color").is_none());

    run_tl_ok(tmp.path(), &["project", "rm", &id]);
    assert_eq!(
        stored(tmp.path(), "things_projects").as_array().unwrap().len(),
        3
    );
}

#[test]
fn test_project_rm_unlinks_sections() {
    let tmp = tempfile::TempDir::new().unwrap();
    for title in ["Laundry", "Groceries"] {
        run_tl_ok(tmp.path(), &["section", "add", title, "--project", "family"]);
    }
    run_tl_ok(tmp.path(), &["project", "rm", "family"]);

    let sections = stored(tmp.path(), "things_sections");
    for section in sections.as_array().unwrap() {
        assert!(section.get("projectId").is_none());
    }
    let (_, stderr, success) = run_tl(tmp.path(), &["view", "family"]);
    assert!(!success);
    assert!(stderr.contains("project not found"));
}

#[test]
fn test_section_add_unknown_project_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_tl(tmp.path(), &["section", "add", "X", "--project", "nope"]);
    assert!(!success);
    assert!(stderr.contains("not found"));
}

// ---------------------------------------------------------------------------
// Views and counts
// ---------------------------------------------------------------------------

#[test]
fn test_view_today_important() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (section, task) = section_with_task(tmp.path(), "Errands");
    let plain = run_tl_ok(tmp.path(), &["task", "add", &section, "Plain"])
        .trim()
        .to_string();
    run_tl_ok(tmp.path(), &["section", "date", &section, "tomorrow"]);
    run_tl_ok(tmp.path(), &["task", "date", &section, &task, "today"]);
    run_tl_ok(tmp.path(), &["task", "star", &section, &task]);

    let view = run_json(tmp.path(), &["view", "today", "--tag", "important"]);
    assert_eq!(view["scope"], "today");
    assert_eq!(view["tag"], "important");
    let tasks = view["sections"][0]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], task.as_str());
    assert_ne!(tasks[0]["id"], plain.as_str());
}

#[test]
fn test_view_unknown_tag_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_tl(tmp.path(), &["view", "inbox", "--tag", "urgent"]);
    assert!(!success);
    assert!(stderr.contains("unknown tag"));
}

#[test]
fn test_counts_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (section, task) = section_with_task(tmp.path(), "Errands");
    run_tl_ok(tmp.path(), &["task", "add", &section, "Second"]);
    run_tl_ok(tmp.path(), &["task", "star", &section, &task]);
    run_tl_ok(tmp.path(), &["section", "assign", &section, "work"]);

    let counts = run_json(tmp.path(), &["counts"]);
    assert_eq!(counts["scope"], "inbox");
    assert_eq!(counts["sidebar"]["inbox"], 2);
    assert_eq!(counts["sidebar"]["today"], 2);
    assert_eq!(counts["sidebar"]["projects"]["work"], 2);
    assert_eq!(counts["sidebar"]["projects"]["family"], 0);
    assert_eq!(counts["tags"]["all"], 2);
    assert_eq!(counts["tags"]["important"], 1);

    let view = run_json(tmp.path(), &["view"]);
    let shown: usize = view["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["tasks"].as_array().unwrap().len())
        .sum();
    assert_eq!(shown, 2);
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

#[test]
fn test_data_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("elsewhere");
    let data_str = data.to_str().unwrap();
    run_tl_ok(tmp.path(), &["-C", data_str, "section", "add", "Remote"]);
    assert!(data.join("things_sections.json").exists());
    assert!(!tmp.path().join(".tasklane").exists());
}

#[test]
fn test_corrupt_sections_are_discarded() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join(".tasklane");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("things_sections.json"), "{\"not\": \"an array\"}").unwrap();

    let out = run_tl_ok(tmp.path(), &["section", "list"]);
    assert_eq!(out, "");
    assert!(!data.join("things_sections.json").exists());
}

#[test]
fn test_config_overrides_keys_and_seeds() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join(".tasklane");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("config.toml"),
        r#"[storage]
sections_key = "my_sections"
projects_key = "my_projects"

[[default_projects]]
id = "garden"
name = "Garden"
"#,
    )
    .unwrap();

    assert_eq!(run_tl_ok(tmp.path(), &["project", "list"]), "garden Garden (0)\n");
    run_tl_ok(tmp.path(), &["section", "add", "Beds"]);
    assert!(data.join("my_sections.json").exists());
    assert!(data.join("my_projects.json").exists());
}

#[test]
fn test_invalid_config_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join(".tasklane");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("config.toml"), "[storage\n").unwrap();
    let (_, stderr, success) = run_tl(tmp.path(), &["counts"]);
    assert!(!success);
    assert!(stderr.contains("could not parse"));
}
