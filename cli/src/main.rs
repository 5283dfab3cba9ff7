//! # GoFS Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the GoFS CLI application.
//! It handles:
//! - Setting up the logging system (`RUST_LOG`, default `warn`)
//! - Handing the raw process arguments to the `srv` handler
//! - Mapping the terminal outcome onto an exit code
//!
//! ## Exit codes
//!
//! - `0`: usage or version shown, or the server shut down cleanly
//! - `1`: the handling path is missing or inaccessible, or the server failed
//! - `2`: the arguments could not be parsed (rendered by clap)
//!
//! ## Examples
//!
//! ```bash
//! gofs --help
//! RUST_LOG=debug gofs -p ./dist
//! ```
//!
use tracing_subscriber::{fmt, EnvFilter};

mod core; // Core infrastructure (errors)
mod srv; // Argument handling, configuration resolution, serving

use crate::core::error::GofsError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let argv: Vec<std::ffi::OsString> = std::env::args_os().collect();
    tracing::debug!("Raw arguments: {:?}", argv);

    if let Err(e) = srv::handle_srv(argv).await {
        if let Some(GofsError::Arguments(clap_err)) = e.downcast_ref::<GofsError>() {
            clap_err.exit();
        }
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

