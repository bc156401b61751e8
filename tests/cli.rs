use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;

#[test]
fn cli_lists_the_known_variants() {
    let mut cmd = Command::cargo_bin("vitrine").expect("binary exists");
    cmd.arg("--list");
    cmd.assert()
        .success()
        .stdout(contains("hero"))
        .stdout(contains("turntable"))
        .stdout(contains("twin"));
}

#[test]
fn cli_summarizes_the_hero_variant() {
    let mut cmd = Command::cargo_bin("vitrine").expect("binary exists");
    cmd.arg("hero").arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains("Loaded variant 'hero'"))
        .stdout(contains("spot at (0.00, 0.50, 0.00) intensity 90"))
        .stdout(contains("overlay \"Holy ITS    A / Shit Cube\" cta \"See it up close\""))
        .stdout(contains("perspective camera at (4.00, 3.50, -3.00) fov 31"));
}

#[test]
fn cli_prints_export_blobs_in_summary_mode() {
    let mut cmd = Command::cargo_bin("vitrine").expect("binary exists");
    cmd.arg("hero").arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains("[Glass Material] Save Material:"))
        .stdout(contains("\"thickness\": 0.2"))
        .stdout(contains("\"color\": \"#ffffff\""))
        .stdout(contains("[Ground Plane] (no export action)"))
        .stdout(contains("[Camera] Save Camera:"));
}

#[test]
fn cli_rejects_unknown_variants() {
    let mut cmd = Command::cargo_bin("vitrine").expect("binary exists");
    cmd.arg("nope").arg("--summary-only");
    cmd.assert()
        .failure()
        .stderr(contains("unknown variant 'nope'"));
}

#[test]
fn cli_without_arguments_prints_usage() {
    let mut cmd = Command::cargo_bin("vitrine").expect("binary exists");
    cmd.assert().failure().stderr(contains("Usage: vitrine"));
}
