use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Copy the demo fixtures into a scratch directory the CLI may write to.
fn scratch_workspace() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp directory for tests");
    copy_dir(Path::new("tests/fixtures/demo"), dir.path());
    dir
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

fn cli() -> Command {
    Command::cargo_bin("codelite-mak").expect("Failed to locate codelite-mak binary")
}

#[test]
fn writes_workspace_and_project_makefiles() {
    let dir = scratch_workspace();

    cli().arg(dir.path().join("Demo.workspace")).assert().success();

    let workspace = fs::read_to_string(dir.path().join("Demo.workspace.mak")).unwrap();
    assert!(workspace.contains("buildDebug:"));
    let project = fs::read_to_string(dir.path().join("App/App.project.mak")).unwrap();
    assert!(project.contains("OBJECTS_DEBUG = $(INTERMEDIARYDIR_DEBUG)src.main.o"));
}

#[test]
fn dry_run_lists_paths_without_writing() {
    let dir = scratch_workspace();

    cli()
        .arg(dir.path().join("Demo.workspace"))
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo.workspace.mak"))
        .stdout(predicate::str::contains("App.project.mak"));

    assert!(!dir.path().join("Demo.workspace.mak").exists());
}

#[test]
fn custom_root_variable() {
    let dir = scratch_workspace();

    cli()
        .arg(dir.path().join("Demo.workspace"))
        .args(["--root-variable", "ROOT"])
        .assert()
        .success();

    let workspace = fs::read_to_string(dir.path().join("Demo.workspace.mak")).unwrap();
    assert!(workspace.contains("ROOT=\"$(ROOT)\""));
}

#[test]
fn unsupported_type_warns_but_succeeds() {
    let dir = scratch_workspace();

    cli()
        .arg(dir.path().join("Odd.workspace"))
        .assert()
        .success()
        .stderr(predicate::str::contains("unsupported output type"))
        .stderr(predicate::str::contains("1 configuration(s) without a link rule"));

    assert!(dir.path().join("Lib/Lib.project.mak").exists());
}

#[test]
fn missing_project_fails() {
    let dir = scratch_workspace();
    fs::remove_file(dir.path().join("App/App.project")).unwrap();

    cli()
        .arg(dir.path().join("Demo.workspace"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("project file not found"));

    assert!(!dir.path().join("Demo.workspace.mak").exists());
}

#[test]
fn show_workspace_and_project() {
    cli()
        .args(["tests/fixtures/demo/Demo.workspace", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configurations: <Global>, Debug"))
        .stdout(predicate::str::contains("  App (App/App.project)"));

    cli()
        .args([
            "tests/fixtures/demo/Demo.workspace",
            "--show",
            "App",
            "--configuration",
            "Debug",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Output: bin/app"))
        .stdout(predicate::str::contains("Code files:\n  src/main.cpp"));

    cli()
        .args(["tests/fixtures/demo/Demo.workspace", "--show", "App"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Include directories:\n  ../inc"));
}

#[test]
fn show_unknown_project_fails() {
    cli()
        .args(["tests/fixtures/demo/Demo.workspace", "--show", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no project named Nope"));
}
