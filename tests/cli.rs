//! CLI test cases.
//!
//! Tests that need real OCR tooling (`tesseract` and `poppler-utils` on the
//! `PATH`, plus network access for model data) are `#[ignore]`d so the
//! default suite runs anywhere. Run them with `cargo test -- --ignored` on a
//! machine with the tools installed.

use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;

/// Create a new `Command` with our binary.
fn cmd() -> Command {
    Command::cargo_bin("docr").unwrap()
}

#[test]
fn test_help() {
    cmd().arg("--help").assert().success();
}

#[test]
fn test_version() {
    cmd().arg("--version").assert().success();
}

#[test]
fn test_ocr_requires_input_path() {
    cmd().arg("ocr").assert().failure();
}

#[test]
fn test_ocr_rejects_bad_page_list() {
    cmd()
        .arg("ocr")
        .arg("whatever.pdf")
        .arg("--pages")
        .arg("5-3")
        .assert()
        .failure()
        .stderr(predicate::str::contains("backwards"));
}

#[test]
#[ignore = "Needs tesseract installed"]
fn test_detect_reports_native_engine() {
    cmd()
        .arg("detect")
        .assert()
        .success()
        .stdout(predicate::str::contains("version:"));
}

#[test]
#[ignore = "Needs tesseract, poppler-utils, and network access"]
fn test_ocr_one_page_pdf() {
    cmd()
        .arg("ocr")
        .arg("tests/fixtures/hello.pdf")
        .arg("--pages")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello"));
}

#[test]
#[ignore = "Needs network access"]
fn test_models_fetches_eng() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .arg("models")
        .arg("--lang")
        .arg("eng")
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .success();
    assert!(dir.path().join("eng.traineddata").is_file());
}
