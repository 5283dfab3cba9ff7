//! # GoFS CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` and uses `gofs_cmd()` to run the compiled binary.
//!

// Not every test file uses every helper.
#![allow(dead_code)]

pub use assert_cmd::Command;

/// # Get GoFS Command (`gofs_cmd`)
///
/// An `assert_cmd::Command` pointing at the `gofs` binary built for this test run.
///
/// ## Panics
/// Panics if the `gofs` binary cannot be found via `Command::cargo_bin`.
pub fn gofs_cmd() -> Command {
    Command::cargo_bin("gofs").expect("Failed to find gofs binary for testing")
}

/// Version banner printed by `--version`.
pub const VERSION_SERIAL: &str = "GoFS Version 2021.11.24";
