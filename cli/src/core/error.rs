//! # GoFS Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the terminal outcomes of configuration resolution and
//! the `Result` alias used by the rest of the application.
//!
//! ## Architecture
//!
//! - `GofsError`: a `thiserror` enum covering every way resolution can stop
//!   short of producing a `ResolvedConfig`.
//! - `Result<T>`: an alias for `anyhow::Result<T>`, used where errors only need
//!   context (server start-up, binding).
//!
//! Two of the variants are not failures at all: `HelpRequested` and
//! `VersionRequested` tell the caller that output was already produced and
//! that the process should exit successfully without serving.
//!
//! ## Examples
//!
//! ```rust
//! match srv::config::resolve(options) {
//!     Ok(config) => server_logic::run_server(config).await?,
//!     Err(GofsError::PathNotFound { path }) => {
//!         eprintln!("No such file or directory: {}", path.display());
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Terminal outcomes of argument handling and configuration resolution.
#[derive(Error, Debug)]
pub enum GofsError {
    #[error("usage requested")]
    HelpRequested,

    #[error("version requested")]
    VersionRequested,

    #[error("No such file or directory: {}", path.display())]
    PathNotFound { path: PathBuf },

    #[error("Cannot access '{}': {source}", path.display())]
    PathInaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Arguments(#[from] clap::Error),
}

impl GofsError {
    /// True for help/version requests, which end the process successfully.
    pub fn is_short_circuit(&self) -> bool {
        matches!(self, GofsError::HelpRequested | GofsError::VersionRequested)
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
