use predicates::prelude::*;
use assert_cmd::Command;

fn garnet() -> Command {
    Command::cargo_bin("garnet").unwrap()
}

#[test]
fn check_reports_ok_for_valid_files() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("point.rb");
    std::fs::write(&path, "class Point\n  def initialize(x)\n    @x = x\n  end\nend\n").unwrap();

    garnet()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("point.rb: "))
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn check_renders_the_first_diagnostic() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let good = tmp_dir.path().join("good.rb");
    let bad = tmp_dir.path().join("bad.rb");
    std::fs::write(&good, "puts 1\n").unwrap();
    std::fs::write(&bad, "x = 1\ny = \"abc\n").unwrap();

    garnet()
        .arg("check")
        .arg(&good)
        .arg(&bad)
        .assert()
        .failure()
        .stdout(predicate::str::contains("good.rb"))
        .stderr(predicate::str::contains("STRING_HITS_EOF"))
        .stderr(predicate::str::contains("bad.rb:2"))
        .stderr(predicate::str::contains("y = \"abc"))
        .stderr(predicate::str::contains("unterminated string meets end of file"));
}

#[test]
fn check_fails_on_missing_file() {
    garnet()
        .arg("check")
        .arg("does/not/exist.rb")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read does/not/exist.rb"));
}

#[test]
fn dump_inline_code() {
    garnet()
        .args(["dump", "-e", "a.b = 1"])
        .assert()
        .success()
        .stdout("Root -e\n  AttrAssign b=\n    VCall a\n    List\n      Fixnum 1\n");
}

#[test]
fn dump_with_stats() {
    garnet()
        .args(["dump", "--stats", "-e", "x = 1 + 2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nodes: 6\ndepth: 5\n"))
        .stdout(predicate::str::contains("  Fixnum: 2\n"));
}

#[test]
fn dump_reads_stdin() {
    garnet()
        .arg("dump")
        .write_stdin("Foo::BAR = 1\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Root -\n  ConstDecl BAR\n"));
}

#[test]
fn line_offset_shifts_diagnostics() {
    garnet()
        .args(["--line", "10", "dump", "-e", "\n\nself = 1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("INVALID_ASSIGNMENT"))
        .stderr(predicate::str::contains("-e:12"))
        .stderr(predicate::str::contains(" 12 | "))
        .stderr(predicate::str::contains("self = 1"))
        .stderr(predicate::str::contains("Can't change the value of self"));
}

#[test]
fn nesting_limit_is_configurable() {
    garnet()
        .args(["dump", "--max-depth", "8", "-e", "((((((((1))))))))"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nesting deeper than 8 levels"));
}

#[test]
fn parse_error_is_nonzero() {
    let bad = "def x(\n"; // malformed on purpose
    let tmp_dir = tempfile::tempdir().unwrap();
    let bad_path = tmp_dir.path().join("bad.rb");
    std::fs::write(&bad_path, bad).unwrap();

    garnet()
        .arg("check")
        .arg(bad_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("GRAMMAR_ERROR"));
}

#[test]
fn long_expression_chains_are_rejected_cleanly() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("deep.rb");
    std::fs::write(&path, format!("x = 1{}\n", " + 1".repeat(100_000))).unwrap();

    garnet()
        .arg("check")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GRAMMAR_ERROR"))
        .stderr(predicate::str::contains("nesting deeper than 128 levels"));
}
