//! Diagnostic logging through `tracing`.
//!
//! The full-screen UI owns the terminal, so it only ever logs to a file.
//! One-shot commands may also log to stderr.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::core::constants::LOG_FILTER_ENV;

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// Log to `path` when one is given, otherwise fall back to `fallback`.
    pub fn file_or(path: Option<&str>, fallback: LogTarget) -> LogTarget {
        match path.map(str::trim).filter(|path| !path.is_empty()) {
            Some(path) => LogTarget::File(PathBuf::from(path)),
            None => fallback,
        }
    }
}

/// Resolve the filter directive: `LEXI_LOG`, then `RUST_LOG`, then `info`.
pub fn filter_directive(lexi_log: Option<&str>, rust_log: Option<&str>) -> String {
    [lexi_log, rust_log]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

fn env_filter() -> EnvFilter {
    let lexi_log = std::env::var(LOG_FILTER_ENV).ok();
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(lexi_log.as_deref(), rust_log.as_deref());
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Calling it again is a no-op.
pub fn init_logging(target: &LogTarget) -> io::Result<()> {
    match target {
        LogTarget::Off => Ok(()),
        LogTarget::Stderr => {
            let layer = fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time();
            let _ = tracing_subscriber::registry()
                .with(env_filter())
                .with(layer)
                .try_init();
            Ok(())
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true);
            let _ = tracing_subscriber::registry()
                .with(env_filter())
                .with(layer)
                .try_init();
            Ok(())
        }
    }
}
