//! Logging initialization for the gallery.
//!
//! `RUST_LOG` takes precedence when set. Otherwise the filter is built from
//! `logging.level`, with the noisier dependencies held at `warn`.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Level used when the configured one is not recognised.
const FALLBACK_LEVEL: &str = "info";

/// Dependencies that log every query or request at `info` and below.
const QUIET_TARGETS: &[&str] = &["sqlx", "hyper", "tower_http"];

/// Filter directives for a configured level.
fn directives(level: &str) -> String {
    let level = match level.trim().to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        l @ ("trace" | "debug" | "info" | "warn" | "error" | "off") => l.to_string(),
        _ => FALLBACK_LEVEL.to_string(),
    };

    // At trace/debug the dependencies are left at the same level.
    if level == "trace" || level == "debug" {
        return level;
    }

    let mut out = level;
    for target in QUIET_TARGETS {
        out.push_str(&format!(",{}=warn", target));
    }
    out
}

/// Build the filter: `RUST_LOG` if present and valid, else `level`.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(level)))
}

/// Initialize logging to stdout and to the configured log file.
///
/// The log file is appended to across restarts.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if let Some(parent) = Path::new(&config.file).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)?;
    let writer = std::io::stdout.and(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(build_filter(&config.level))
        .init();

    Ok(())
}

/// Initialize console-only logging.
///
/// Used when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true),
        )
        .with(build_filter(level))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_quiet_dependencies() {
        assert_eq!(
            directives("info"),
            "info,sqlx=warn,hyper=warn,tower_http=warn"
        );
        assert_eq!(
            directives("Warning"),
            "warn,sqlx=warn,hyper=warn,tower_http=warn"
        );
    }

    #[test]
    fn test_directives_verbose_levels_pass_through() {
        assert_eq!(directives("debug"), "debug");
        assert_eq!(directives(" TRACE "), "trace");
    }

    #[test]
    fn test_directives_unknown_level() {
        assert_eq!(directives("verbose"), directives("info"));
        assert_eq!(directives(""), directives("info"));
    }

    #[test]
    fn test_directives_parse_as_filter() {
        for level in ["trace", "debug", "info", "warn", "error", "off", "bogus"] {
            assert!(EnvFilter::try_new(directives(level)).is_ok(), "{}", level);
        }
    }
}
