//! # GoFS HTTP Server Implementation
//!
//! File: cli/src/srv/server_logic.rs
//!
//! ## Overview
//!
//! This module serves a `ResolvedConfig` over HTTP:
//! - Directory mode: every file under `dir` is reachable below `/{prefix}/`.
//! - Single-file mode: only `/{prefix}/{filename}` is served.
//!
//! ## Architecture
//!
//! 1. Build the Axum router with `create_app`.
//! 2. Bind a `TcpListener` on the configured address as given; malformed
//!    addresses fail here.
//! 3. Print the access URL and serve until Ctrl+C or SIGTERM.
//!
//! The prefix and file name are operator-supplied text, so they never become
//! route patterns. A single fallback handler percent-decodes each request
//! path segment and compares it with the plan, then hands the request to
//! `ServeFile` or (with the prefix stripped) to `ServeDir`.
//!
//! ## Examples
//!
//! ```rust
//! let config = config::resolve(options)?;
//! server_logic::run_server(config).await?;
//! ```
//!
use super::config::ResolvedConfig;
use super::utils;
use crate::core::error::Result;
use anyhow::Context;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Router,
};
use percent_encoding::percent_decode_str;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, error, info, Level};

/// # Run HTTP Server (`run_server`)
///
/// Binds `config.addr`, prints the serving banner, and serves until a
/// shutdown signal arrives.
///
/// ## Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run_server(config: ResolvedConfig) -> Result<()> {
    // Log what is about to be exposed (debugging aid).
    utils::log_served_target(&config);

    // Create the Axum application router for the resolved plan.
    let app = create_app(&config);

    // Bind exactly the address the operator gave; this is where a malformed
    // `host:port` is finally reported.
    let listener = TcpListener::bind(config.addr.as_str())
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", config.addr))?;

    // Display the serving plan to the operator.
    println!("\n=================================================================");
    println!("📂 Serving directory: {}", config.dir.display());
    if config.is_single_file() {
        println!("📄 Serving file:      {}", config.filename.to_string_lossy());
    }
    println!("🔗 URL prefix:        /{}", config.prefix);
    println!("🌐 Access URL:        {}", config.url);
    println!("=================================================================\n");

    info!("Starting server on {} for {}", config.addr, config.url);
    println!("Server starting! Press Ctrl+C to stop.");

    // Serve until a shutdown signal arrives.
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Resolves when Ctrl+C or (on Unix) SIGTERM is received.
async fn shutdown_signal() {
    // Future that completes when Ctrl+C is pressed.
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                // Never resolve; SIGTERM can still stop the server.
                std::future::pending::<()>().await;
            }
        }
    };

    // Future that completes when SIGTERM is received (Unix-specific).
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                // Keep the future pending indefinitely if the handler fails.
                std::future::pending::<()>().await;
            }
        }
    };

    // No SIGTERM outside Unix; this future never completes.
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    // Wait for whichever signal comes first.
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// The parts of a `ResolvedConfig` the request handler needs.
#[derive(Debug)]
struct ServedTarget {
    /// Non-empty prefix segments, decoded.
    prefix: Vec<String>,
    /// `Some` in single-file mode.
    filename: Option<OsString>,
    dir: PathBuf,
}

impl ServedTarget {
    fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            prefix: config
                .prefix
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
            filename: config
                .is_single_file()
                .then(|| config.filename.clone()),
            dir: config.dir.clone(),
        }
    }

    /// Matches the prefix against a raw (still encoded) request path and
    /// returns the unmatched remainder, e.g. `/sub/a.txt`, `/` or `""`.
    fn strip_prefix<'a>(&self, raw_path: &'a str) -> Option<&'a str> {
        let mut rest = raw_path;
        for expected in &self.prefix {
            let trimmed = rest.trim_start_matches('/');
            let (segment, tail) = match trimmed.find('/') {
                Some(idx) => trimmed.split_at(idx),
                None => (trimmed, ""),
            };
            if !segment_matches(segment, expected.as_bytes()) {
                return None;
            }
            rest = tail;
        }
        Some(rest)
    }
}

/// Compares one encoded path segment with decoded bytes.
fn segment_matches(raw_segment: &str, expected: &[u8]) -> bool {
    percent_decode_str(raw_segment).eq(expected.iter().copied())
}

/// # Create Axum Application (`create_app`)
///
/// Builds the router for the resolved plan, with HTTP request tracing.
pub fn create_app(config: &ResolvedConfig) -> Router {
    let target = Arc::new(ServedTarget::from_config(config));
    info!(
        "Serving {} under /{}",
        config.dir.display(),
        target.prefix.join("/")
    );

    // Configure the tracing middleware for logging HTTP requests and responses.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Every request goes through `serve_target`; no user text is a route.
    Router::new()
        .fallback(serve_target)
        .with_state(target)
        .layer(ServiceBuilder::new().layer(trace_layer))
}

/// Routes one request against the served target.
async fn serve_target(State(target): State<Arc<ServedTarget>>, mut req: Request) -> Response {
    let raw_path = req.uri().path().to_string();

    // Anything outside the prefix does not exist.
    let Some(rest) = target.strip_prefix(&raw_path) else {
        debug!("{} is outside the served prefix", raw_path);
        return StatusCode::NOT_FOUND.into_response();
    };
    let matched = &raw_path[..raw_path.len() - rest.len()];

    if let Some(filename) = &target.filename {
        // Single-file mode: exactly one segment, equal to the file name.
        let segment = rest.trim_start_matches('/');
        if segment.contains('/') || !segment_matches(segment, filename.as_encoded_bytes()) {
            return StatusCode::NOT_FOUND.into_response();
        }
        return match ServeFile::new(target.dir.join(filename)).oneshot(req).await {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        };
    }

    // Directory mode: `/prefix` needs a trailing slash so relative links work.
    if rest.is_empty() {
        return Redirect::temporary(&format!("{}/", matched)).into_response();
    }

    // Hand ServeDir the path below the prefix, keeping the query string.
    let inner = match req.uri().query() {
        Some(query) => format!("{}?{}", rest, query),
        None => rest.to_string(),
    };
    match inner.parse::<Uri>() {
        Ok(uri) => *req.uri_mut() = uri,
        Err(e) => {
            debug!("Could not rebuild request URI '{}': {}", inner, e);
            return StatusCode::BAD_REQUEST.into_response();
        }
    }

    let mut response = match ServeDir::new(&target.dir).oneshot(req).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    };

    // ServeDir redirects `dir` to `dir/` relative to the stripped path;
    // put the prefix back in front.
    if response.status().is_redirection() && !matched.is_empty() {
        let relocated = response
            .headers()
            .get(header::LOCATION)
            .and_then(|location| location.to_str().ok())
            .filter(|location| location.starts_with('/'))
            .and_then(|location| HeaderValue::from_str(&format!("{}{}", matched, location)).ok());
        if let Some(location) = relocated {
            response.headers_mut().insert(header::LOCATION, location);
        }
    }
    response
}
