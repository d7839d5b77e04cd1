//! Integration tests for the awd binary.
//!
//! Each test builds a throw-away project directory and runs the compiled
//! binary against it with `--project`. Registry traffic only ever goes to a
//! local stub.

mod common;

use std::path::Path;
use std::process::{Command, Output};

fn awd(project: &Path, args: &[&str]) -> Output {
    awd_with_registry(project, "http://127.0.0.1:9", args)
}

fn awd_with_registry(project: &Path, registry_url: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_awd"))
        .arg("--project")
        .arg(project)
        .args(args)
        .env("RUST_LOG", "off")
        .env("MCP_REGISTRY_URL", registry_url)
        .output()
        .expect("Failed to run awd")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).to_string()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).to_string()
}

fn project(manifest: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("awd.yml"), manifest).unwrap();
    dir
}

#[test]
fn test_list_scripts_in_manifest_order() {
    let dir = project("scripts:\n  start: echo start\n  build: echo build\n");
    let out = awd(dir.path(), &["--json", "list"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(value["default"], "start");
    let names: Vec<_> = value["scripts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["start", "build"]);
    assert_eq!(value["scripts"][1]["command"], "echo build");
}

#[test]
fn test_missing_manifest_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let out = awd(dir.path(), &["list"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("No awd.yml found"));
}

#[test]
fn test_run_without_start_lists_scripts_and_fails() {
    let dir = project("scripts:\n  build: echo build\n");
    let out = awd(dir.path(), &["run"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("No script specified"));
    assert!(stdout(&out).contains("build"));
}

#[test]
fn test_run_unknown_script_fails() {
    let dir = project("scripts:\n  start: echo hi\n");
    let out = awd(dir.path(), &["run", "deploy"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Script 'deploy' not found"));
}

#[cfg(unix)]
#[test]
fn test_run_compiles_prompt_and_executes() {
    let dir = project("scripts:\n  show: cat greet.prompt.md\n");
    std::fs::write(
        dir.path().join("greet.prompt.md"),
        "---\ndescription: greeting\n---\nHello {{name}} from {{place}}\n",
    )
    .unwrap();

    let runtimes = tempfile::tempdir().unwrap();
    let out = awd(
        dir.path(),
        &[
            "--runtime-dir",
            runtimes.path().to_str().unwrap(),
            "run",
            "show",
            "-p",
            "name=Ada",
            "-p",
            "ignored",
        ],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("Hello Ada from {{place}}"));
    assert!(dir.path().join(".awd/compiled/greet.txt").is_file());
}

#[cfg(unix)]
#[test]
fn test_run_propagates_nonzero_exit() {
    let dir = project("scripts:\n  start: exit 4\n");
    let runtimes = tempfile::tempdir().unwrap();
    let out = awd(
        dir.path(),
        &["--runtime-dir", runtimes.path().to_str().unwrap(), "run"],
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("exited with code 4"));
}

#[cfg(unix)]
#[test]
fn test_preview_does_not_execute() {
    let dir = project("scripts:\n  start: codex main.prompt.md && touch ran\n");
    std::fs::write(dir.path().join("main.prompt.md"), "Review {{repo}}").unwrap();

    let out = awd(dir.path(), &["--json", "preview", "-p", "repo=awd"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(value["script_name"], "start");
    assert_eq!(value["compiled"], "codex .awd/compiled/main.txt && touch ran");
    assert!(!dir.path().join("ran").exists());
    let rendered = std::fs::read_to_string(dir.path().join(".awd/compiled/main.txt")).unwrap();
    assert_eq!(rendered, "Review awd");
}

#[test]
fn test_deps_list_and_sync() {
    let dir = project(
        "dependencies:\n  mcp: [github]\nscripts:\n  start: codex main.prompt.md\n",
    );
    std::fs::write(
        dir.path().join("main.prompt.md"),
        "---\nmcp: [github, slack]\n---\nHi",
    )
    .unwrap();

    let out = awd(dir.path(), &["--json", "deps", "list"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(value[0]["name"], "github");
    assert_eq!(value[0]["sources"].as_array().unwrap().len(), 2);
    assert_eq!(value[1]["name"], "slack");

    let out = awd(dir.path(), &["--json", "deps", "sync"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(value["added"], serde_json::json!(["slack"]));

    let manifest = std::fs::read_to_string(dir.path().join("awd.yml")).unwrap();
    assert!(manifest.contains("slack"));
}

#[test]
fn test_unsupported_client_fails() {
    let dir = project("dependencies:\n  mcp: [github]\n");
    let out = awd(dir.path(), &["install", "--client", "emacs"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Unsupported client 'emacs'"));
}

#[test]
fn test_runtime_status_and_remove() {
    let dir = project("scripts: {}\n");
    let runtimes = tempfile::tempdir().unwrap();
    std::fs::write(runtimes.path().join("llm"), "").unwrap();
    std::fs::create_dir(runtimes.path().join("llm-venv")).unwrap();
    let runtime_dir = runtimes.path().to_str().unwrap();

    let out = awd(dir.path(), &["--json", "--runtime-dir", runtime_dir, "runtime", "status"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(value["preference"], serde_json::json!(["codex", "llm"]));

    let out = awd(dir.path(), &["--runtime-dir", runtime_dir, "runtime", "remove", "llm", "--yes"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(!runtimes.path().join("llm").exists());
    assert!(!runtimes.path().join("llm-venv").exists());

    let out = awd(dir.path(), &["--runtime-dir", runtime_dir, "runtime", "remove", "llm", "--yes"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_runtime_setup_rejects_unknown_runtime() {
    let dir = project("scripts: {}\n");
    let runtimes = tempfile::tempdir().unwrap();
    let out = awd(
        dir.path(),
        &["--runtime-dir", runtimes.path().to_str().unwrap(), "runtime", "setup", "gpt"],
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Unsupported runtime: gpt"));
}

#[test]
fn test_config_show_reports_project() {
    let dir = project("name: demo\nversion: \"1.2.0\"\ndependencies:\n  mcp: [a, b]\n");
    let out = awd(dir.path(), &["--json", "config", "--show"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(value["project"]["name"], "demo");
    assert_eq!(value["project"]["mcp_dependencies"], 2);
    assert_eq!(value["registry_url"], "http://127.0.0.1:9");
}

#[test]
fn test_install_with_missing_dependency_exits_1_but_configures_the_rest() {
    let dir = project("dependencies:\n  mcp: [github, ghost]\n");
    let listing = serde_json::json!({
        "servers": [{"id": "id-github", "name": "github", "description": "GitHub"}]
    });
    let github = serde_json::json!({
        "id": "id-github",
        "name": "github",
        "description": "GitHub",
        "packages": [{"name": "@modelcontextprotocol/server-github", "runtime_hint": "npx"}]
    });
    let registry = common::serve_registry(vec![
        ("/v0/servers", listing.to_string()),
        ("/v0/servers/id-github", github.to_string()),
    ]);

    let out = awd_with_registry(dir.path(), &registry, &["install"]);
    assert_eq!(out.status.code(), Some(1), "stdout: {}", stdout(&out));
    assert!(stdout(&out).contains("ghost not found in registry"));
    assert!(stderr(&out).contains("1 of 2 dependencies could not be installed"));

    let config: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join(".vscode/mcp.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(config["servers"]["github"]["command"], "npx");
    assert!(config["servers"].get("ghost").is_none());
}

#[test]
fn test_runtime_remove_json_output() {
    let dir = project("scripts: {}\n");
    let runtimes = tempfile::tempdir().unwrap();
    std::fs::write(runtimes.path().join("codex"), "").unwrap();
    let runtime_dir = runtimes.path().to_str().unwrap();

    let out = awd(
        dir.path(),
        &["--json", "--runtime-dir", runtime_dir, "runtime", "remove", "codex", "--yes"],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(value, serde_json::json!({ "runtime": "codex", "removed": true }));
}
