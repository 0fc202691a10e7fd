#![cfg(unix)]

use std::{fs, os::unix::fs::PermissionsExt, path::Path};

use assert_cmd::Command;
use git2::{Repository, Signature};

fn commit_output(repo: &Repository, dir: &Path, output: &str) {
    fs::write(dir.join("bench.out"), output).unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("bench.out")).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("cob", "cob@example.com").unwrap();
    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, "bench", &tree, &parent_refs)
        .unwrap();
}

/// Repository whose "harness" prints the committed `bench.out`.
fn prepare(prev: &str, head: &str) -> (tempfile::TempDir, tempfile::TempDir, String) {
    let repo_dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(repo_dir.path()).unwrap();
    commit_output(&repo, repo_dir.path(), prev);
    commit_output(&repo, repo_dir.path(), head);

    let tools = tempfile::tempdir().unwrap();
    let harness = tools.path().join("fake-go");
    fs::write(&harness, "#!/bin/sh\ncat bench.out\n").unwrap();
    fs::set_permissions(&harness, fs::Permissions::from_mode(0o755)).unwrap();
    let harness = harness.to_str().unwrap().to_string();
    (repo_dir, tools, harness)
}

#[test]
fn test_cli_exits_with_success_on_help() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cob"));
    cmd.arg("--help");
    cmd.assert().success();
}

#[test]
fn test_cli_fails_outside_repository() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cob"));
    cmd.args(["--repo", dir.path().to_str().unwrap()]);
    cmd.assert().code(2);
}

#[test]
fn test_cli_rejects_bad_threshold() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cob"));
    cmd.args(["--threshold", "fast"]);
    cmd.assert().failure();
}

#[test]
fn test_cli_degression_exit_code() {
    let (repo, _tools, harness) = prepare(
        "BenchmarkA-8 100 100 ns/op\n",
        "BenchmarkA-8 100 150 ns/op\n",
    );
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cob"));
    cmd.env("NO_COLOR", "1").env_remove("COB_THRESHOLD").args([
        "--repo",
        repo.path().to_str().unwrap(),
        "--harness",
        harness.as_str(),
    ]);
    let assert = cmd.assert().code(1);
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("50.00%"), "{stdout}");
    assert_eq!(
        fs::read_to_string(repo.path().join("bench.out")).unwrap(),
        "BenchmarkA-8 100 150 ns/op\n"
    );
}

#[test]
fn test_cli_colours_ratios_when_piped() {
    let (repo, _tools, harness) = prepare(
        "BenchmarkA-8 100 100 ns/op\n",
        "BenchmarkA-8 100 150 ns/op\n",
    );
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cob"));
    cmd.env_remove("NO_COLOR").env_remove("COB_THRESHOLD").args([
        "--repo",
        repo.path().to_str().unwrap(),
        "--harness",
        harness.as_str(),
    ]);
    let assert = cmd.assert().code(1);
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains('\u{1b}'), "{stdout}");
}

#[test]
fn test_cli_passes_within_threshold() {
    let (repo, _tools, harness) = prepare(
        "BenchmarkA-8 100 100 ns/op\n",
        "BenchmarkA-8 100 105 ns/op\n",
    );
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cob"));
    cmd.env_remove("COB_THRESHOLD").args([
        "--repo",
        repo.path().to_str().unwrap(),
        "--harness",
        harness.as_str(),
        "--threshold",
        "0.1",
    ]);
    cmd.assert().success();
}

#[test]
fn test_cli_harness_failure_restores_head() {
    let (repo, _tools, _) = prepare("BenchmarkA-8 1 1 ns/op\n", "BenchmarkA-8 1 2 ns/op\n");
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cob"));
    cmd.args([
        "--repo",
        repo.path().to_str().unwrap(),
        "--harness",
        "false",
    ]);
    cmd.assert().code(2);
    assert_eq!(
        fs::read_to_string(repo.path().join("bench.out")).unwrap(),
        "BenchmarkA-8 1 2 ns/op\n"
    );
}
