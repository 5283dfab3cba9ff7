//! # GoFS Serving Configuration
//!
//! File: cli/src/srv/config.rs
//!
//! ## Overview
//!
//! This module resolves `RawOptions` into a `ResolvedConfig`: the address to
//! bind, the directory and optional single file to serve, the URL prefix, and
//! the access URL shown to the operator.
//!
//! ## Architecture
//!
//! Resolution is a single synchronous pass:
//! 1. Stat the handling path; a missing path is fatal.
//! 2. Copy the listening address verbatim.
//! 3. Make the handling path absolute (lexically, without following symlinks).
//! 4. Split it into `dir` + `filename` (file) or `dir` alone (directory).
//! 5. Normalize the explicit prefix, or fall back to the basename of `dir`.
//! 6. Build `http://{addr}/{prefix}/{filename}`.
//!
//! ## Examples
//!
//! ```rust
//! let config = resolve(options)?;
//! println!("Access URL: {}", config.url);
//! ```
//!
//! For `--path /opt/share0/releases/notes.txt --url-prefix /share/releases/`
//! the result is `dir = /opt/share0/releases`, `filename = notes.txt`,
//! `prefix = share/releases`.
//!
use super::args::RawOptions;
use crate::core::error::GofsError;
use std::ffi::{OsStr, OsString};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::{env, fs};
use tracing::debug;

/// # Resolved Configuration (`ResolvedConfig`)
///
/// The validated serving plan. `filename` is empty exactly when a whole
/// directory is served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Listening address, copied from `--address` without validation.
    pub addr: String,
    /// Absolute directory to serve from.
    pub dir: PathBuf,
    /// Base name of the single served file, or empty in directory mode.
    /// Kept as an `OsString` so `dir.join(&filename)` names the real file
    /// even when it is not valid UTF-8.
    pub filename: OsString,
    /// URL path segment clients use, without leading or trailing `/`.
    pub prefix: String,
    /// Fully qualified access URL.
    pub url: String,
}

impl ResolvedConfig {
    pub fn is_single_file(&self) -> bool {
        !self.filename.is_empty()
    }
}

/// # Resolve Configuration (`resolve`)
///
/// Converts `RawOptions` into a `ResolvedConfig`. Performs exactly one
/// filesystem metadata lookup and no other I/O.
///
/// ## Errors
///
/// - `GofsError::PathNotFound` if the handling path does not exist.
/// - `GofsError::PathInaccessible` if it exists but cannot be stat'ed, or the
///   working directory is needed and unavailable.
pub fn resolve(options: RawOptions) -> Result<ResolvedConfig, GofsError> {
    let handling_path = options.handling_path;

    let metadata = fs::metadata(&handling_path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            GofsError::PathNotFound {
                path: handling_path.clone(),
            }
        } else {
            GofsError::PathInaccessible {
                path: handling_path.clone(),
                source,
            }
        }
    })?;

    let addr = options.listening_addr;
    let abs_path = absolute_path(&handling_path)?;
    debug!("Absolute handling path: {}", abs_path.display());

    let (dir, filename) = if metadata.is_dir() {
        (abs_path, OsString::new())
    } else {
        let filename = abs_path.file_name().map(OsStr::to_os_string).unwrap_or_default();
        let dir = abs_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));
        (dir, filename)
    };

    let prefix = if options.url_prefix.is_empty() {
        base_name(&dir)
    } else {
        normalize_prefix(&options.url_prefix)
    };

    // The parsed scheme is deliberately not used here.
    let url = format!(
        "{}://{}/{}/{}",
        "http",
        addr,
        prefix,
        filename.to_string_lossy()
    );
    debug!(
        "Resolved dir={} filename={:?} prefix={:?} url={}",
        dir.display(),
        filename,
        prefix,
        url
    );

    Ok(ResolvedConfig {
        addr,
        dir,
        filename,
        prefix,
        url,
    })
}

/// Strips one leading and one trailing `/`. Not iterative: `//a//` becomes `/a/`.
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.strip_prefix('/').unwrap_or(raw);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.to_string()
}

/// Joins relative paths onto the working directory, then cleans lexically.
fn absolute_path(path: &Path) -> Result<PathBuf, GofsError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = env::current_dir().map_err(|source| GofsError::PathInaccessible {
            path: path.to_path_buf(),
            source,
        })?;
        cwd.join(path)
    };
    Ok(clean_path(&joined))
}

/// Drops `.` components and applies `..` against the preceding component.
/// `..` at the root stays at the root. Symlinks are left alone.
/// Only ever called with absolute paths.
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => cleaned.push(component),
            },
            other => cleaned.push(other),
        }
    }
    cleaned
}

/// Final path component as a string; empty for `/`.
fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::srv::args::Scheme;
    use std::fs;
    use tempfile::TempDir;

    fn options(path: &Path, url_prefix: &str, addr: &str) -> RawOptions {
        RawOptions {
            want_help: false,
            want_version: false,
            url_prefix: url_prefix.to_string(),
            scheme: Scheme::Http,
            listening_addr: addr.to_string(),
            handling_path: path.to_path_buf(),
        }
    }

    /// A `<tmp>/opt/share0/releases` tree with a `notes.txt` inside.
    fn releases_tree() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let releases = temp_dir.path().join("opt/share0/releases");
        fs::create_dir_all(&releases).unwrap();
        fs::write(releases.join("notes.txt"), "release notes").unwrap();
        (temp_dir, releases)
    }

    #[test]
    fn test_directory_without_prefix() {
        let (_guard, releases) = releases_tree();
        let config = resolve(options(&releases, "", "10.0.13.120:8080")).unwrap();

        assert_eq!(config.addr, "10.0.13.120:8080");
        assert_eq!(config.dir, releases);
        assert_eq!(config.filename, "");
        assert!(!config.is_single_file());
        assert_eq!(config.prefix, "releases");
        assert_eq!(config.url, "http://10.0.13.120:8080/releases/");
    }

    #[test]
    fn test_directory_trailing_slash() {
        let (_guard, releases) = releases_tree();
        let with_slash = PathBuf::from(format!("{}/", releases.display()));
        let config = resolve(options(&with_slash, "", "10.0.13.120:8080")).unwrap();

        assert_eq!(config.dir, releases);
        assert_eq!(config.prefix, "releases");
    }

    #[test]
    fn test_file_with_prefix() {
        let (_guard, releases) = releases_tree();
        let notes = releases.join("notes.txt");
        let config = resolve(options(&notes, "/share/releases/", "10.0.13.120:8080")).unwrap();

        assert_eq!(config.dir, releases);
        assert_eq!(config.filename, "notes.txt");
        assert!(config.is_single_file());
        assert_eq!(config.prefix, "share/releases");
        assert_eq!(
            config.url,
            "http://10.0.13.120:8080/share/releases/notes.txt"
        );
    }

    #[test]
    fn test_file_without_prefix_uses_parent_name() {
        let (_guard, releases) = releases_tree();
        let config = resolve(options(&releases.join("notes.txt"), "", "127.0.0.1:8080")).unwrap();

        assert_eq!(config.prefix, "releases");
        assert_eq!(config.url, "http://127.0.0.1:8080/releases/notes.txt");
    }

    /// Linux only: macOS filesystems refuse names that are not UTF-8.
    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_file_name_still_points_at_file() {
        use std::os::unix::ffi::OsStrExt;

        let (_guard, releases) = releases_tree();
        let raw_name = OsStr::from_bytes(b"notes-\xff.txt");
        fs::write(releases.join(raw_name), "bytes").unwrap();

        let config = resolve(options(&releases.join(raw_name), "", "127.0.0.1:8080")).unwrap();
        assert_eq!(config.filename, raw_name);
        assert!(config.dir.join(&config.filename).is_file());
        // Only the URL is lossy.
        assert_eq!(config.url, "http://127.0.0.1:8080/releases/notes-\u{FFFD}.txt");
    }

    #[test]
    fn test_missing_path() {
        let result = resolve(options(Path::new("/does/not/exist"), "", "127.0.0.1:8080"));
        match result {
            Err(GofsError::PathNotFound { path }) => {
                assert_eq!(path, PathBuf::from("/does/not/exist"))
            }
            other => panic!("expected PathNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_scheme_not_used_in_url() {
        // The URL is always http regardless of --scheme; see DESIGN.md.
        let (_guard, releases) = releases_tree();
        let mut opts = options(&releases, "", "127.0.0.1:8080");
        opts.scheme = Scheme::Https;
        let config = resolve(opts).unwrap();
        assert!(config.url.starts_with("http://"));
    }

    #[test]
    fn test_address_passed_through() {
        let (_guard, releases) = releases_tree();
        let config = resolve(options(&releases, "", "not an address")).unwrap();
        assert_eq!(config.addr, "not an address");
        assert_eq!(config.url, "http://not an address/releases/");
    }

    #[test]
    fn test_relative_path_resolution() {
        // `.` is the crate directory under cargo test.
        let cwd = env::current_dir().unwrap();
        let config = resolve(options(Path::new("."), "", "127.0.0.1:8080")).unwrap();
        assert_eq!(config.dir, cwd);
        assert_eq!(config.prefix, base_name(&cwd));
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/share/"), "share");
        assert_eq!(normalize_prefix("share"), "share");
        assert_eq!(normalize_prefix("/share"), "share");
        assert_eq!(normalize_prefix("share/"), "share");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix("//"), "");
        assert_eq!(normalize_prefix("/share/releases/"), "share/releases");
        // Single strip only.
        assert_eq!(normalize_prefix("//share//"), "/share/");
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(Path::new("/opt/./a/../b/")), PathBuf::from("/opt/b"));
        assert_eq!(clean_path(Path::new("/../opt")), PathBuf::from("/opt"));
        assert_eq!(clean_path(Path::new("/")), PathBuf::from("/"));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("/opt/share0/releases")), "releases");
        assert_eq!(base_name(Path::new("/")), "");
    }
}
