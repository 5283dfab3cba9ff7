//! # GoFS Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Shared infrastructure used by the `srv` module. Currently this is the
//! error taxonomy:
//! - `error`: `GofsError` and the `Result` alias
//!
//! ```rust
//! use crate::core::error::{GofsError, Result};
//! ```
//!
pub mod error;
