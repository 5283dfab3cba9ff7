//! # GoFS Static File Server
//!
//! File: cli/src/srv/mod.rs
//!
//! ## Overview
//!
//! This module turns raw process arguments into a serving plan and runs it.
//! One invocation ends in exactly one of:
//! - usage shown (`-h`, `--help`, `-help`, `--h` anywhere in argv)
//! - version shown (`-v`, `--version`)
//! - a validation failure (the handling path does not exist)
//! - a resolved configuration handed to the HTTP server
//!
//! ## Architecture
//!
//! - `args.rs`: help prescan, flag parsing, usage template
//! - `config.rs`: resolution of `RawOptions` into `ResolvedConfig`
//! - `server_logic.rs`: Axum server for the resolved plan
//! - `utils.rs`: startup diagnostics
//!
//! ## Examples
//!
//! ```bash
//! # Serve a directory under its own name: http://10.0.13.120:8080/releases/
//! gofs -a 10.0.13.120:8080 -p /opt/share0/releases/
//!
//! # Serve one file under a custom prefix
//! gofs --url-prefix /share/releases/ -a 10.0.13.120:8080 -p /opt/share0/releases/notes.txt
//! ```
//!
use crate::core::error::{GofsError, Result};
use std::ffi::OsString;
use tracing::info;

pub mod args;
pub mod config;
pub mod server_logic;
pub mod utils;

use args::Invocation;
use config::ResolvedConfig;

/// # Resolve Invocation (`resolve_invocation`)
///
/// Runs the early-exit checks and, if neither help nor version was asked
/// for, resolves the serving configuration. Help and version come back as
/// `GofsError::HelpRequested` / `GofsError::VersionRequested`.
pub fn resolve_invocation(argv: &[OsString]) -> std::result::Result<ResolvedConfig, GofsError> {
    match args::detect_early_exit(argv)? {
        Invocation::ShowHelp => Err(GofsError::HelpRequested),
        Invocation::ShowVersion => Err(GofsError::VersionRequested),
        Invocation::Proceed(options) => config::resolve(options),
    }
}

/// # Handle Server Command (`handle_srv`)
///
/// Entry point used by `main`. Prints usage or version when requested and
/// returns `Ok(())`; otherwise serves the resolved configuration.
///
/// ## Errors
///
/// Propagates `GofsError` (argument errors, missing path) and server errors.
pub async fn handle_srv(argv: Vec<OsString>) -> Result<()> {
    match resolve_invocation(&argv) {
        Ok(config) => {
            info!("Effective server config: {:?}", config);
            server_logic::run_server(config).await
        }
        Err(e) if e.is_short_circuit() => {
            show_short_circuit(&e, &argv)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn show_short_circuit(signal: &GofsError, argv: &[OsString]) -> Result<()> {
    if matches!(signal, GofsError::VersionRequested) {
        println!("{}", args::VERSION_SERIAL);
        return Ok(());
    }
    let app_path = argv
        .first()
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_else(|| "gofs".to_string());
    print!("{}", args::render_usage(&app_path)?);
    Ok(())
}
