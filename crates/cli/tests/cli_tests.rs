//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("copydeck")
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

#[test]
fn test_cli_file_input() {
    cmd().arg(get_fixture_path("landing_page.html")).assert().success();
}

#[test]
fn test_cli_stdin_input() {
    let html = std::fs::read_to_string(get_fixture_path("landing_page.html")).unwrap();
    cmd().arg("-").write_stdin(html).assert().success();
}

#[test]
fn test_cli_html_format_round_trips_doctype() {
    cmd()
        .args(["-f", "html", &get_fixture_path("landing_page.html")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("Stoneware mugs"));
}

#[test]
fn test_cli_fields_format() {
    cmd()
        .args(["-f", "fields", &get_fixture_path("article_fragment.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("[general] General"))
        .stdout(predicate::str::contains("textContent"));
}

#[test]
fn test_cli_json_format() {
    cmd()
        .args(["-f", "json", &get_fixture_path("landing_page.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("elementId"))
        .stdout(predicate::str::contains("originalValue"));
}

#[test]
fn test_cli_preview_format_is_sandboxed() {
    cmd()
        .args(["-f", "preview", &get_fixture_path("article_fragment.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Content-Security-Policy"))
        .stdout(predicate::str::contains("script-src 'none'"));
}

#[test]
fn test_cli_set_edit() {
    cmd()
        .args(["--set", "0-textContent=Studio letter, April 2004"])
        .arg(get_fixture_path("legacy_doctype.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Studio letter, April 2004"));
}

#[test]
fn test_cli_set_rejects_malformed_pair() {
    cmd()
        .args(["--set", "0-textContent"])
        .arg(get_fixture_path("legacy_doctype.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --set value"));
}

#[test]
fn test_cli_unknown_field_warns_but_succeeds() {
    cmd()
        .args(["--set", "999-textContent=nothing"])
        .arg(get_fixture_path("legacy_doctype.html"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Unknown field id"));
}

#[test]
fn test_cli_edits_file() {
    let tmp = TempDir::new().unwrap();
    let edits = tmp.path().join("edits.json");
    std::fs::write(&edits, r#"{"0-textContent": "Studio letter, May 2004"}"#).unwrap();

    cmd()
        .args(["--edits", edits.to_str().unwrap()])
        .arg(get_fixture_path("legacy_doctype.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Studio letter, May 2004"));
}

#[test]
fn test_cli_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("output.html");

    cmd()
        .args(["-o", output.to_str().unwrap()])
        .arg(get_fixture_path("landing_page.html"))
        .assert()
        .success();

    assert!(output.exists());
    assert!(std::fs::read_to_string(&output).unwrap().contains("Stoneware mugs"));
}

#[test]
fn test_cli_save_session() {
    let tmp = TempDir::new().unwrap();
    let session = tmp.path().join("session.json");

    cmd()
        .args(["--set", "0-textContent=Studio letter, June 2004"])
        .args(["--save-session", session.to_str().unwrap()])
        .arg(get_fixture_path("legacy_doctype.html"))
        .assert()
        .success();

    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&session).unwrap()).unwrap();
    assert!(saved.get("originalHtml").is_some());
    assert_eq!(saved["fieldValues"]["0-textContent"], "Studio letter, June 2004");
}

#[test]
fn test_cli_empty_content_fails_with_guidance() {
    cmd()
        .arg(get_fixture_path("empty_content.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No editable content found"));
}

#[test]
fn test_cli_missing_file() {
    cmd()
        .arg("does_not_exist.html")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_cli_invalid_format() {
    cmd()
        .args(["-f", "pdf", &get_fixture_path("landing_page.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
fn test_cli_verbose_mode() {
    cmd()
        .args(["-v", &get_fixture_path("landing_page.html")])
        .assert()
        .success()
        .stderr(predicate::str::contains("Extracting editable fields"));
}
