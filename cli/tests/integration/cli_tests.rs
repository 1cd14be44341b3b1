//! Integration tests for the CLI skeleton: help, version, argument parsing.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn teardown() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("teardown"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    teardown().assert().code(2).stderr(predicate::str::contains(
        "Remove application stacks and track their progress",
    ));
}

#[test]
fn test_cli_help_lists_remove_command() {
    teardown()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("remove"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    teardown()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("teardown"));
}

#[test]
fn test_remove_help_lists_flags() {
    teardown()
        .args(["remove", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--stack"))
        .stdout(predicate::str::contains("--timeout"))
        .stdout(predicate::str::contains("--skip-debug-stack"));
}

#[test]
fn test_remove_rejects_non_numeric_timeout() {
    teardown()
        .args(["remove", "--timeout", "soon"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--timeout"));
}

#[test]
fn test_unknown_command_fails() {
    teardown()
        .arg("deploy")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_no_color_env_accepts_no_color_org_values() {
    for value in ["1", "true", "0", ""] {
        let dir = tempfile::tempdir().expect("tempdir");
        teardown()
            .current_dir(dir.path())
            .env("NO_COLOR", value)
            .env_remove("TEARDOWN_CONFIG")
            .arg("remove")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("No project configuration found"))
            .stderr(predicate::str::contains("invalid value").not());
    }
}
