//! # GoFS Serving Integration Tests
//!
//! File: cli/tests/srv.rs
//!
//! ## Overview
//!
//! Failure paths of `gofs` that end before the server starts. A successful
//! resolution blocks in the server loop, so those cases are covered by the
//! unit tests in `srv::config` and `srv::server_logic` instead.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_missing_path_fails_with_message() {
    gofs_cmd()
        .args(["-p", "/does/not/exist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "No such file or directory: /does/not/exist",
        ));
}

#[test]
fn test_unknown_scheme_is_rejected() {
    gofs_cmd()
        .args(["--scheme", "gopher"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("gopher"));
}

#[test]
fn test_unknown_flag_is_rejected() {
    gofs_cmd()
        .args(["--port", "9000"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--port"));
}

#[test]
fn test_unbindable_address_fails() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir for serving");
    gofs_cmd()
        .args(["-a", "not-an-address", "-p"])
        .arg(temp_dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to bind TCP listener"));
}

#[test]
fn test_single_dash_path_reaches_resolution() {
    // `-path` must be read as the path flag, not `-p ath`.
    gofs_cmd()
        .args(["-path", "/does/not/exist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "No such file or directory: /does/not/exist",
        ));
    gofs_cmd()
        .args(["--p", "/does/not/exist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "No such file or directory: /does/not/exist",
        ));
}
