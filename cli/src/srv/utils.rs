//! # GoFS Server Utilities
//!
//! File: cli/src/srv/utils.rs
//!
//! ## Overview
//!
//! Startup diagnostics for the served target: what is in the directory being
//! served, or how large the single served file is. Nothing here affects the
//! serving plan; failures are logged and ignored.
//!
use super::config::ResolvedConfig;
use std::path::Path;
use tracing::{info, warn};

/// # Log Served Target (`log_served_target`)
///
/// Logs the directory listing in directory mode, or the file size in
/// single-file mode.
pub fn log_served_target(config: &ResolvedConfig) {
    if config.is_single_file() {
        // Single-file mode: only the size is interesting.
        let file_path = config.dir.join(&config.filename);
        match std::fs::metadata(&file_path) {
            Ok(metadata) => info!(
                "Serving single file {} ({})",
                file_path.display(),
                human_readable_size(metadata.len())
            ),
            Err(e) => warn!("Could not read metadata for '{}': {}", file_path.display(), e),
        }
    } else {
        // Directory mode: list what clients will be able to reach.
        log_directory_contents(&config.dir);
    }
}

/// # Log Directory Contents (`log_directory_contents`)
///
/// Logs each entry of `path` at INFO, marking directories and files.
pub fn log_directory_contents(path: &Path) {
    info!("Directory contents for {}:", path.display());

    // Attempt to read the directory.
    match std::fs::read_dir(path) {
        Ok(entries) => {
            let mut entry_count = 0;

            // Process each entry, skipping entries that couldn't be read.
            for entry in entries.filter_map(Result::ok) {
                entry_count += 1;

                // Metadata decides between DIR and FILE (with its size).
                if let Ok(metadata) = entry.metadata() {
                    if metadata.is_dir() {
                        info!("  - DIR  : {}", entry.file_name().to_string_lossy());
                    } else {
                        info!(
                            "  - FILE : {} ({})",
                            entry.file_name().to_string_lossy(),
                            human_readable_size(metadata.len())
                        );
                    }
                } else {
                    // Log warning if metadata read fails.
                    warn!("  - Could not read metadata for: {}", entry.path().display());
                }
            }

            // Log if the directory was empty.
            if entry_count == 0 {
                info!("  (Empty directory)");
            }
        }
        Err(e) => {
            // Unreadable directory: not fatal, the server may still start.
            warn!(
                "Could not read directory contents for '{}': {}",
                path.display(),
                e
            );
        }
    }
}

/// # Format File Size (`human_readable_size`)
///
/// Bytes without decimals, larger units (powers of 1024) with one decimal.
pub fn human_readable_size(size: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    // ln(0) is undefined, so zero is handled up front.
    if size == 0 {
        return "0 B".to_string();
    }

    // Unit exponent from powers of 1024, capped at the largest unit.
    let base = 1024_f64;
    let exponent = ((size as f64).ln() / base.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let scaled = size as f64 / base.powi(exponent as i32);

    if exponent == 0 {
        // Bytes: no decimal places.
        format!("{} {}", size, UNITS[0])
    } else {
        // KB and larger: one decimal place.
        format!("{:.1} {}", scaled, UNITS[exponent])
    }
}
