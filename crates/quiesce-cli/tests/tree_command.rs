mod support;

use predicates::prelude::*;
use std::fs;

use support::{
    assert_timestamp_log_names, new_command_with_temp_home, stdout_lines, write_config,
    write_sample_manifest,
};

#[test]
fn root_help_lists_subcommands() {
    let (mut command, _temp_home) = new_command_with_temp_home();
    command
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: quiesce"))
        .stdout(predicate::str::contains("--diagnostics"))
        .stdout(predicate::str::contains("tree"))
        .stdout(predicate::str::contains("summary"))
        .stdout(predicate::str::contains("browse"));
}

#[test]
fn tree_prints_folders_before_files() {
    let (mut command, temp_home) = new_command_with_temp_home();
    let manifest = write_sample_manifest(temp_home.path());

    let output = command.arg("tree").arg(&manifest).output().expect("run tree");
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output.stdout),
        vec!["▼ dir1", "   M file2", "  M  file3", "?? file1"]
    );
}

#[test]
fn tree_honors_root_and_collapse_flags() {
    let (mut command, temp_home) = new_command_with_temp_home();
    let manifest = write_sample_manifest(temp_home.path());

    let output = command
        .arg("tree")
        .arg(&manifest)
        .args(["--root", "--collapse", "dir1/"])
        .output()
        .expect("run tree");
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output.stdout),
        vec!["▼ /", "  ▶ dir1", "  ?? file1"]
    );
}

#[test]
fn tree_filter_and_line_changes() {
    let (mut command, temp_home) = new_command_with_temp_home();
    let manifest = write_sample_manifest(temp_home.path());

    let output = command
        .arg("tree")
        .arg(&manifest)
        .args(["--filter", "unstaged", "--line-changes"])
        .output()
        .expect("run tree");
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output.stdout),
        vec!["▼ dir1", "   M file2 +3", "?? file1"]
    );
}

#[test]
fn config_default_filter_applies_without_flag() {
    let (mut command, temp_home) = new_command_with_temp_home();
    write_config(
        temp_home.path(),
        "version = 1\n\n[tree]\ndefault_filter = \"staged\"\n",
    );
    let manifest = write_sample_manifest(temp_home.path());

    let output = command.arg("tree").arg(&manifest).output().expect("run tree");
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output.stdout), vec!["▼ dir1", "  M  file3"]);
}

#[test]
fn unknown_filter_is_rejected() {
    let (mut command, temp_home) = new_command_with_temp_home();
    let manifest = write_sample_manifest(temp_home.path());

    command
        .arg("tree")
        .arg(&manifest)
        .args(["--filter", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown display filter 'bogus'"));
}

#[test]
fn missing_manifest_reports_context() {
    let (mut command, temp_home) = new_command_with_temp_home();

    command
        .arg("tree")
        .arg(temp_home.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: failed to refresh files"))
        .stderr(predicate::str::contains("failed to read manifest"));
}

#[test]
fn invalid_config_stops_before_loading() {
    let (mut command, temp_home) = new_command_with_temp_home();
    write_config(temp_home.path(), "version = 2\n");
    let manifest = write_sample_manifest(temp_home.path());

    command
        .arg("tree")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config at"))
        .stderr(predicate::str::contains(".config/quiesce/config.toml"));
}

#[test]
fn summary_counts_every_filter() {
    let (mut command, temp_home) = new_command_with_temp_home();
    let manifest = write_sample_manifest(temp_home.path());

    command
        .arg("summary")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Filter"))
        .stdout(predicate::str::contains("All files"))
        .stdout(predicate::str::contains("Unstaged changes"))
        .stdout(predicate::str::contains("Merge conflicts"));
}

#[test]
fn log_env_enables_debug_output_on_stderr() {
    let (mut command, temp_home) = new_command_with_temp_home();
    let manifest = write_sample_manifest(temp_home.path());

    command
        .env("QUIESCE_LOG", "debug")
        .arg("tree")
        .arg(&manifest)
        .assert()
        .success()
        .stderr(predicate::str::contains("manifest loaded"));
}

#[test]
fn diagnostics_flag_writes_log_file() {
    let (mut command, temp_home) = new_command_with_temp_home();
    let manifest = write_sample_manifest(temp_home.path());

    command
        .arg("--diagnostics")
        .arg("tree")
        .arg(&manifest)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    let diagnostics_dir = temp_home.path().join(".config/quiesce/diagnostics");
    let logs: Vec<_> = fs::read_dir(&diagnostics_dir)
        .expect("diagnostics dir")
        .map(|entry| entry.expect("diagnostics entry"))
        .collect();
    assert_timestamp_log_names(&logs);

    let content = fs::read_to_string(logs[0].path()).expect("read diagnostics log");
    assert!(content.contains("quiesce diagnostics start"));
    assert!(content.contains("diagnostics enabled"));
}
