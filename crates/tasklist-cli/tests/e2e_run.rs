//! E2E CLI tests for the scripted runner and the setup commands:
//! - `tl run` over stdin and files, in text and JSON modes
//! - validation failures, `--strict`, and malformed lines
//! - seed selection through flags and config
//! - `tl config` and `tl completions`
//!
//! Each test runs `tl` as a subprocess with an isolated config path.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the `tl` binary with its config under `dir`.
fn tl_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tl"));
    cmd.current_dir(dir);
    cmd.env("TASKLIST_LOG", "error");
    cmd.env("TASKLIST_CONFIG", dir.join("config.toml"));
    cmd.env_remove("FORMAT");
    cmd
}

/// Run a script through stdin in JSON mode and return the parsed report.
fn run_json(dir: &Path, args: &[&str], script: &str) -> Value {
    let output = tl_cmd(dir)
        .args(["run", "--format", "json"])
        .args(args)
        .write_stdin(script)
        .output()
        .expect("run should not crash");
    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("run --format json should produce valid JSON")
}

fn titles(tasks: &Value) -> Vec<String> {
    tasks
        .as_array()
        .expect("task array")
        .iter()
        .map(|t| t["title"].as_str().expect("title").to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// tl run
// ---------------------------------------------------------------------------

#[test]
fn walkthrough_from_empty_list() {
    let dir = TempDir::new().expect("tempdir");
    let report = run_json(
        dir.path(),
        &["--no-seed"],
        "# start empty\n\
         add Buy milk\n\
         add   Walk dog  \n\
         toggle 1\n\
         filter pending\n\
         list\n\
         stats\n",
    );

    let results = report["results"].as_array().expect("results");
    assert_eq!(results.len(), 6);
    assert_eq!(results[0]["line"], 2);
    assert_eq!(results[0]["task"]["id"], 1);
    assert_eq!(results[1]["task"]["title"], "Walk dog");
    assert_eq!(results[2]["message"], "Task completed!");
    assert_eq!(results[3]["filter"], "pending");
    assert_eq!(titles(&results[4]["tasks"]), vec!["Walk dog"]);
    assert_eq!(results[5]["stats"]["completed"], 1);

    let snapshot = &report["snapshot"];
    assert_eq!(snapshot["filter"], "pending");
    assert_eq!(titles(&snapshot["tasks"]), vec!["Walk dog", "Buy milk"]);
    assert_eq!(snapshot["stats"]["total"], 2);
}

#[test]
fn seeded_by_default() {
    let dir = TempDir::new().expect("tempdir");
    let report = run_json(dir.path(), &[], "stats\n");
    assert_eq!(report["snapshot"]["stats"]["total"], 4);
    assert_eq!(report["snapshot"]["stats"]["pending"], 2);
}

#[test]
fn config_can_disable_seed() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("config.toml"), "[store]\nseed = false\n").expect("write");
    let report = run_json(dir.path(), &[], "stats\n");
    assert_eq!(report["snapshot"]["stats"]["total"], 0);

    let report = run_json(dir.path(), &["--seed"], "stats\n");
    assert_eq!(report["snapshot"]["stats"]["total"], 4);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let dir = TempDir::new().expect("tempdir");
    let report = run_json(dir.path(), &[], "delete 4\nadd Fresh\n");
    assert_eq!(report["results"][0]["message"], "Task deleted");
    assert_eq!(report["results"][1]["task"]["id"], 5);
}

#[test]
fn unknown_id_is_reported_as_no_op() {
    let dir = TempDir::new().expect("tempdir");
    let report = run_json(dir.path(), &[], "toggle 99\nrm 99\n");
    for step in report["results"].as_array().expect("results") {
        assert_eq!(step["ok"], true);
        assert_eq!(step["message"], "No such task; nothing changed");
        assert!(step.get("task").is_none());
    }
    assert_eq!(report["snapshot"]["stats"]["total"], 4);
}

#[test]
fn rejected_add_continues_without_strict() {
    let dir = TempDir::new().expect("tempdir");
    let long = "x".repeat(101);
    let report = run_json(
        dir.path(),
        &["--no-seed"],
        &format!("add    \nadd {long}\nadd Valid\n"),
    );

    let results = report["results"].as_array().expect("results");
    assert_eq!(results[0]["ok"], false);
    assert_eq!(results[0]["error"]["error_code"], "E2001");
    assert_eq!(results[1]["error"]["error_code"], "E2002");
    assert_eq!(results[2]["ok"], true);
    assert_eq!(results[2]["task"]["id"], 1);
}

#[test]
fn strict_stops_at_first_rejected_add() {
    let dir = TempDir::new().expect("tempdir");
    let output = tl_cmd(dir.path())
        .args(["run", "--strict", "--no-seed", "--format", "json"])
        .write_stdin("add First\nadd  \nadd Never\n")
        .output()
        .expect("run should not crash");
    assert!(!output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).expect("partial report is JSON");
    assert_eq!(report["results"].as_array().map(Vec::len), Some(2));
    assert_eq!(titles(&report["snapshot"]["tasks"]), vec!["First"]);
}

#[test]
fn malformed_line_aborts_with_error_code() {
    let dir = TempDir::new().expect("tempdir");
    tl_cmd(dir.path())
        .args(["run", "--format", "json"])
        .write_stdin("add ok\nfrobnicate\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("E4001"))
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn malformed_line_json_error_is_printed_once() {
    let dir = TempDir::new().expect("tempdir");
    let output = tl_cmd(dir.path())
        .args(["run", "--format", "json"])
        .write_stdin("toggle abc\n")
        .output()
        .expect("run should not crash");
    assert!(!output.status.success());

    let err: Value = serde_json::from_slice(&output.stderr).expect("stderr is one JSON document");
    assert_eq!(err["error"]["error_code"], "E2004");
    assert_eq!(err["error"]["message"], "line 1: 'abc' is not a valid task id");
}

#[test]
fn bad_filter_reports_filter_code() {
    let dir = TempDir::new().expect("tempdir");
    tl_cmd(dir.path())
        .args(["run", "--format", "text"])
        .write_stdin("filter archived\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid filter"))
        .stderr(predicate::str::contains("suggestion: Use one of: all, pending, completed."));
}

#[test]
fn text_mode_prints_each_step() {
    let dir = TempDir::new().expect("tempdir");
    tl_cmd(dir.path())
        .args(["run", "--format", "text", "--no-seed"])
        .write_stdin("add Buy milk\ntoggle 1\nlist\nstats\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok  add  1  Task added\n"))
        .stdout(predicate::str::contains("ok  toggle  1  Task completed!\n"))
        .stdout(predicate::str::contains("1  completed  Buy milk\n"))
        .stdout(predicate::str::contains("total=1 pending=0 completed=1\n"));
}

#[test]
fn script_file_argument_is_read() {
    let dir = TempDir::new().expect("tempdir");
    let script = dir.path().join("tasks.tl");
    std::fs::write(&script, "filter completed\nlist\n").expect("write");

    tl_cmd(dir.path())
        .args(["run", "--format", "text"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("2  completed  Read a book"))
        .stdout(predicate::str::contains("Buy groceries").not());
}

#[test]
fn missing_script_file_fails() {
    let dir = TempDir::new().expect("tempdir");
    tl_cmd(dir.path())
        .args(["run", "does-not-exist.tl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read script"));
}

// ---------------------------------------------------------------------------
// Config and setup
// ---------------------------------------------------------------------------

#[test]
fn config_reports_effective_settings() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("config.toml"),
        "output = \"json\"\n[tui]\ntick_ms = 50\n",
    )
    .expect("write");

    let output = tl_cmd(dir.path())
        .args(["config", "--no-seed"])
        .output()
        .expect("config should not crash");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("config output is JSON");
    assert_eq!(json["found"], true);
    assert_eq!(json["resolved_output"], "json");
    assert_eq!(json["store"]["seed"], false);
    assert_eq!(json["tui"]["tick_ms"], 50);
}

#[test]
fn format_env_var_is_honoured() {
    let dir = TempDir::new().expect("tempdir");
    tl_cmd(dir.path())
        .env("FORMAT", "text")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolved_output=text"));
}

#[test]
fn malformed_config_fails_with_code() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("config.toml"), "[store\n").expect("write");
    tl_cmd(dir.path())
        .args(["config", "--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1001"))
        .stderr(predicate::str::contains("Error:").not());
}

#[test]
fn completions_generate_for_bash() {
    let dir = TempDir::new().expect("tempdir");
    tl_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_tl"));
}
