use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn write_tmp(dir: &tempfile::TempDir, name: &str, src: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, src).unwrap();
    path
}

#[test]
fn prints_formatted_source() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_tmp(&tmp_dir, "a.rb", "x=1+2\nputs x\n");

    Command::cargo_bin("garnet-fmt")
        .unwrap()
        .arg(&path)
        .assert()
        .success()
        .stdout("x = 1 + 2\nputs(x)\n");
}

#[test]
fn check_flags_unformatted_files() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let messy = write_tmp(&tmp_dir, "messy.rb", "x=1\n");
    let tidy = write_tmp(&tmp_dir, "tidy.rb", "x = 1\n");

    Command::cargo_bin("garnet-fmt")
        .unwrap()
        .arg("--check")
        .arg(&messy)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not formatted"));

    Command::cargo_bin("garnet-fmt")
        .unwrap()
        .arg("--check")
        .arg(&tidy)
        .assert()
        .success()
        .stdout(predicate::str::contains("tidy.rb: ok"));
}

#[test]
fn write_rewrites_in_place() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_tmp(&tmp_dir, "w.rb", "if a then b end\n");

    Command::cargo_bin("garnet-fmt")
        .unwrap()
        .arg("--write")
        .arg(&path)
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "if a\n  b\nend\n");
}

#[test]
fn syntax_errors_fail() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_tmp(&tmp_dir, "bad.rb", "def x(\n");

    Command::cargo_bin("garnet-fmt")
        .unwrap()
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.rb:1: syntax error"));
}

#[test]
fn missing_file_argument_is_a_usage_error() {
    Command::cargo_bin("garnet-fmt")
        .unwrap()
        .arg("--check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage: garnet-fmt"));
}

#[test]
fn flags_may_follow_the_file() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_tmp(&tmp_dir, "g.rb", "x = 1\n\n\n");

    Command::cargo_bin("garnet-fmt")
        .unwrap()
        .arg(&path)
        .arg("--check")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("g.rb: not formatted"));
}

#[test]
fn check_and_write_conflict() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_tmp(&tmp_dir, "c.rb", "x = 1\n");

    Command::cargo_bin("garnet-fmt")
        .unwrap()
        .arg("--check")
        .arg(&path)
        .arg("--write")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "x = 1\n");
}

#[test]
fn extra_files_are_rejected() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let first = write_tmp(&tmp_dir, "one.rb", "x = 1\n");
    let second = write_tmp(&tmp_dir, "two.rb", "y=2\n");

    Command::cargo_bin("garnet-fmt")
        .unwrap()
        .arg(&first)
        .arg(&second)
        .assert()
        .code(2)
        .stdout("");
}
