use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn callboard() -> Command {
    let mut cmd = Command::cargo_bin("callboard").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_main_help_lists_command_groups() {
    callboard()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("auth"))
        .stdout(predicate::str::contains("agent"))
        .stdout(predicate::str::contains("call"))
        .stdout(predicate::str::contains("test-call"))
        .stdout(predicate::str::contains("--workspace"));
}

#[test]
fn test_web_call_help_names_required_flags() {
    callboard()
        .args(["test-call", "web", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--agent"))
        .stdout(predicate::str::contains("--driver"))
        .stdout(predicate::str::contains("--load"));
}

#[test]
fn test_unknown_scenario_is_rejected() {
    callboard()
        .args(["agent", "create", "--name", "X", "--scenario", "weather"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'weather'"));
}
