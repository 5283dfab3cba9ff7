//! # GoFS Command-Line Arguments
//!
//! File: cli/src/srv/args.rs
//!
//! ## Overview
//!
//! This module turns raw process arguments into either a short-circuit request
//! (help or version) or a `RawOptions` record ready for resolution.
//!
//! ## Architecture
//!
//! Argument handling happens in two passes:
//! 1. A raw prescan compares every argument against the help tokens
//!    (`-h`, `--h`, `-help`, `--help`). Matching is by exact string, so a help
//!    token given as the *value* of another flag still triggers usage.
//! 2. Structured parsing with `clap`. Clap's built-in help and version flags
//!    are disabled: `-h/--help` belong to the prescan and `-v/--version` is an
//!    ordinary boolean that the caller checks after parsing. Single-dash long
//!    flags (`-path`, `-version`) are rewritten to `--` first, and the short
//!    names double as long aliases (`--p`, `--v`), so the spellings operators
//!    already use keep working.
//!
//! ## Examples
//!
//! ```bash
//! gofs -a 10.0.13.120:8080 -p /opt/share0/releases/
//! gofs --url-prefix=/share/releases/ --address=10.0.13.120:8080 --path=/opt/share0/releases/
//! ```
//!
use crate::core::error::{GofsError, Result};
use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use tera::Tera;
use tracing::{debug, warn};

/// Fixed version banner printed by `--version`.
pub const VERSION_SERIAL: &str = "GoFS Version 2021.11.24";

/// Default listening address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Raw tokens that request usage, wherever they appear in argv.
const HELP_TOKENS: [&str; 4] = ["-h", "--h", "-help", "--help"];

/// Long flag names also accepted with a single dash (`-path /tmp`).
const LONG_FLAGS: [&str; 5] = ["version", "url-prefix", "scheme", "address", "path"];

const USAGE_TEMPLATE: &str = r#"
USAGE:
    {{ app_path }} [-h] [-v] [--url-prefix <prefix>] [-s {http, https, ftp}] [-a <address>] [-p <path>]

OPTIONS:
    -h, --help
                    show usage
    -v, --version
                    show version
    --url-prefix <prefix>
                    url prefix
    -s {http, https, ftp}, --scheme {http, https, ftp}
                    scheme name (default: "{{ default_scheme }}")
    -a <ip:port>, --address <ip:port>
                    listening address (default: "{{ default_addr }}")
    -p </path/to/file>,	--path </path/to/file>
                    handing path or directory (default: "{{ default_path }}")

EXAMPLES:
    {{ app_path }} -a 10.0.13.120:8080 -p /opt/share0/releases/
    {{ app_path }} --url-prefix /share/releases/ -a 10.0.13.120:8080 -p /opt/share0/releases/
    {{ app_path }} --url-prefix /share/releases/ -a=10.0.13.120:8080 -p=/opt/share0/releases/
    {{ app_path }} --url-prefix=/share/releases/ --address 10.0.13.120:8080 --path /opt/share0/releases/
    {{ app_path }} --url-prefix=/share/releases/ --address=10.0.13.120:8080 --path=/opt/share0/releases/
"#;

/// URL schemes accepted by `--scheme`.
///
/// The access URL is always built with `http`; this value is parsed and
/// validated but not consulted when the URL is constructed.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scheme {
    #[default]
    Http,
    Https,
    Ftp,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Ftp => "ftp",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// # Raw Options (`RawOptions`)
///
/// The user-supplied, unvalidated input set. Built once per invocation from
/// argv and defaults, then passed by value into `config::resolve`.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gofs",
    about = "Serve a file or directory over HTTP under a URL prefix",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct RawOptions {
    /// Show usage. Normally caught by the raw prescan; reaches here only when
    /// bundled with other short flags (e.g. `-vh`).
    #[arg(short = 'h', long = "help")]
    pub want_help: bool,

    /// Show version.
    #[arg(short = 'v', long = "version", alias = "v")]
    pub want_version: bool,

    /// URL prefix. One leading and one trailing `/` are stripped.
    #[arg(long = "url-prefix", default_value = "")]
    pub url_prefix: String,

    /// Scheme name.
    #[arg(short = 's', long = "scheme", alias = "s", value_enum, default_value_t = Scheme::Http)]
    pub scheme: Scheme,

    /// Listening address (`host:port`). Not validated here.
    #[arg(short = 'a', long = "address", alias = "a", default_value = DEFAULT_ADDR)]
    pub listening_addr: String,

    /// File or directory to serve.
    #[arg(short = 'p', long = "path", alias = "p", default_value_os_t = default_handling_path())]
    pub handling_path: PathBuf,
}

/// Outcome of the early-exit checks.
#[derive(Debug)]
pub enum Invocation {
    ShowHelp,
    ShowVersion,
    /// Neither help nor version was requested; continue to resolution.
    Proceed(RawOptions),
}

/// # Default Handling Path (`default_handling_path`)
///
/// The invoking user's home directory, or `.` if it cannot be determined.
pub fn default_handling_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home,
        None => {
            warn!("Could not determine home directory, defaulting --path to '.'");
            PathBuf::from(".")
        }
    }
}

/// Returns true if any argument after the program path is a help token.
pub fn wants_usage(argv: &[OsString]) -> bool {
    argv.iter()
        .skip(1)
        .any(|arg| HELP_TOKENS.iter().any(|token| arg.as_os_str() == *token))
}

/// Rewrites `-path`, `-address=…` and the other single-dash long flags to
/// their `--` form so clap does not read them as bundled short flags
/// (`-path` would otherwise be `-p ath`). `argv[0]` is left alone.
fn normalize_long_flags(argv: &[OsString]) -> Vec<OsString> {
    argv.iter()
        .enumerate()
        .map(|(idx, arg)| {
            let single_dash_long = idx > 0
                && arg.to_str().is_some_and(|text| {
                    text.strip_prefix('-')
                        .filter(|rest| !rest.starts_with('-'))
                        .map(|rest| rest.split('=').next().unwrap_or(rest))
                        .is_some_and(|name| LONG_FLAGS.contains(&name))
                });
            if single_dash_long {
                let mut long = OsString::from("-");
                long.push(arg);
                long
            } else {
                arg.clone()
            }
        })
        .collect()
}

/// # Detect Early Exit (`detect_early_exit`)
///
/// Runs the help prescan, then structured parsing, then the version check.
/// `argv[0]` is the program path, as with `std::env::args_os()`.
///
/// ## Errors
///
/// Returns `GofsError::Arguments` when clap rejects argv (unknown flag,
/// missing value, scheme outside the accepted set).
pub fn detect_early_exit(argv: &[OsString]) -> std::result::Result<Invocation, GofsError> {
    if wants_usage(argv) {
        debug!("Help token found in raw arguments");
        return Ok(Invocation::ShowHelp);
    }

    let options = RawOptions::try_parse_from(normalize_long_flags(argv))?;
    debug!("Parsed options: {:?}", options);

    if options.want_help {
        return Ok(Invocation::ShowHelp);
    }
    if options.want_version {
        return Ok(Invocation::ShowVersion);
    }
    Ok(Invocation::Proceed(options))
}

#[derive(Serialize)]
struct UsageContext {
    app_path: String,
    default_scheme: String,
    default_addr: String,
    default_path: String,
}

/// # Render Usage (`render_usage`)
///
/// Fills the usage template with the program path and the flag defaults.
pub fn render_usage(app_path: &str) -> Result<String> {
    let data = UsageContext {
        app_path: app_path.to_string(),
        default_scheme: Scheme::default().to_string(),
        default_addr: DEFAULT_ADDR.to_string(),
        default_path: default_handling_path().display().to_string(),
    };
    let context =
        tera::Context::from_serialize(&data).context("Failed to build usage template context")?;
    Tera::one_off(USAGE_TEMPLATE, &context, false).context("Failed to render usage template")
}
