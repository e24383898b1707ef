// End-to-end checks of the bundled CLI host.
// Requires: assert_cmd, predicates, tempfile crates in [dev-dependencies]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

const SIMPLE_REQUEST: &str = r#"{
  "tests": [
    {
      "method": "ThrowsOnBadInput",
      "attributes": ["[Test]", "[ExpectedException(typeof(System.ArgumentException))]"],
      "body": ["Divide(1, 0);"]
    }
  ]
}"#;

const MIXED_REQUEST: &str = r#"{
  "tests": [
    {
      "method": "GoodTest",
      "attributes": ["[ExpectedException(typeof(MyError))]"],
      "body": []
    },
    {
      "method": "BadTest",
      "attributes": ["[ExpectedException(Unknown = \"x\")]"],
      "body": []
    }
  ]
}"#;

fn unexpect() -> Command {
    Command::cargo_bin("unexpect").unwrap()
}

fn write_request(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn cli_plan_emits_throws_assertions_as_json() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "request.json", SIMPLE_REQUEST);

    unexpect()
        .arg("plan")
        .arg(&request)
        .assert()
        .success()
        .stdout(
            contains("\"plans\"")
                .and(contains("ThrowsOnBadInput"))
                .and(contains("System.ArgumentException"))
                .and(contains("RemoveWholeLine")),
        );
}

#[test]
fn cli_plan_reports_miette_diagnostics_on_bad_annotations() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "request.json", MIXED_REQUEST);

    unexpect()
        .arg("plan")
        .arg(&request)
        .assert()
        .failure()
        .stderr(contains("unexpect::arguments").or(contains("help:")));
}

#[test]
fn cli_plan_diagnostics_name_the_request_file() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "fixture_a.json", MIXED_REQUEST);

    unexpect()
        .arg("plan")
        .arg(&request)
        .assert()
        .failure()
        .stderr(contains("fixture_a.json: BadTest"));
}

#[test]
fn cli_plan_walks_a_directory_of_requests() {
    let dir = TempDir::new().unwrap();
    write_request(&dir, "first.json", SIMPLE_REQUEST);
    write_request(
        &dir,
        "second.json",
        r#"{"tests":[{"method":"AlsoThrows","attributes":["[ExpectedException]"]}]}"#,
    );

    unexpect()
        .arg("plan")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("ThrowsOnBadInput").and(contains("AlsoThrows")));
}

#[test]
fn cli_plan_filter_limits_the_planned_tests() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "request.json", MIXED_REQUEST);

    unexpect()
        .arg("plan")
        .arg(&request)
        .arg("--filter")
        .arg("^Good")
        .assert()
        .success()
        .stdout(contains("GoodTest").and(contains("BadTest").not()));
}

#[test]
fn cli_check_reports_per_test_verdicts() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "request.json", MIXED_REQUEST);

    unexpect()
        .arg("check")
        .arg(&request)
        .assert()
        .failure()
        .stdout(
            contains("ok  GoodTest")
                .and(contains("fail  BadTest"))
                .and(contains("2 checked, 1 failed")),
        );
}

#[test]
fn cli_check_warns_about_undeclared_handlers() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        "request.json",
        r#"{
  "tests": [
    {
      "method": "HandledElsewhere",
      "attributes": ["[ExpectedException(Handler = \"OnError\")]"],
      "body": [],
      "fixture": { "expects_exception": false, "methods": ["SetUp"] }
    }
  ]
}"#,
    );

    unexpect()
        .arg("check")
        .arg(&request)
        .assert()
        .success()
        .stdout(contains("warning: handler method 'OnError' is not declared"));
}

#[test]
fn cli_check_warns_about_invalid_regex_messages() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        "request.json",
        r#"{
  "tests": [
    {
      "method": "BadPattern",
      "attributes": ["[ExpectedException(ExpectedMessage = \"(unclosed\", MatchType = MessageMatch.Regex)]"],
      "body": []
    }
  ]
}"#,
    );

    unexpect()
        .arg("check")
        .arg(&request)
        .assert()
        .success()
        .stdout(contains("regex-mode expected message is not a valid pattern"));
}

#[test]
fn cli_preview_shows_the_body_and_attribute_diffs() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "request.json", SIMPLE_REQUEST);

    unexpect()
        .arg("preview")
        .arg(&request)
        .assert()
        .success()
        .stdout(
            contains("--- ThrowsOnBadInput ---")
                .and(contains("+Throws<System.ArgumentException>"))
                .and(contains("edit: remove attribute line 1"))
                .and(contains("-[ExpectedException(typeof(System.ArgumentException))]")),
        );
}

#[test]
fn cli_args_prints_the_extracted_argument_model() {
    unexpect()
        .arg("args")
        .arg("[Test, ExpectedException(typeof(MyError), ExpectedMessage = \"boom\")]")
        .assert()
        .success()
        .stdout(
            contains("entry 2 of 2")
                .and(contains("positional typeof(MyError)"))
                .and(contains("named      ExpectedMessage = \"boom\"")),
        );
}

#[test]
fn cli_args_without_an_annotation_is_an_error() {
    unexpect()
        .arg("args")
        .arg("[Test]")
        .assert()
        .failure()
        .stderr(contains("unexpect::arguments::annotation_not_found"));
}

#[test]
fn cli_missing_request_file_is_a_host_error() {
    unexpect()
        .arg("plan")
        .arg("no/such/request.json")
        .assert()
        .failure()
        .stderr(contains("unexpect::host::invalid_path"));
}

#[test]
fn cli_malformed_request_json_is_a_host_error() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "request.json", "{ not json");

    unexpect()
        .arg("plan")
        .arg(&request)
        .assert()
        .failure()
        .stderr(contains("unexpect::host::malformed_request"));
}
