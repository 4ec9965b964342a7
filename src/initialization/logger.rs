//! Logger initialization.
//!
//! Installs `env_logger` with one of two line formats: colored plain text for
//! people, or one JSON object per line for log shippers.

use std::io::{IsTerminal, Write};

use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter, Record};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Crates whose chatter is capped regardless of the requested level.
const QUIET_MODULES: [(&str, LevelFilter); 4] = [
    ("rustls", LevelFilter::Warn),
    ("tokio_rustls", LevelFilter::Warn),
    ("hyper", LevelFilter::Info),
    ("axum", LevelFilter::Info),
];

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first and `level` then overrides the global and
/// `certinfo` levels, so `RUST_LOG=rustls=debug` still works for the TLS
/// internals while `--log-level` controls this crate.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Override RUST_LOG with the CLI level
/// RUST_LOG=debug certinfo serve --log-level info
///
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=certinfo=debug,rustls=debug certinfo fetch https://example.com
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    // Logs go to stderr; keep colors only when it is a terminal
    colored::control::set_override(std::io::stderr().is_terminal());

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (module, cap) in QUIET_MODULES {
        builder.filter_module(module, cap);
    }
    builder.filter_module("certinfo", level);

    match format {
        LogFormat::Json => builder.format(|buf, record| writeln!(buf, "{}", json_line(record))),
        LogFormat::Plain => builder.format(|buf, record| writeln!(buf, "{}", plain_line(record))),
    };

    builder.try_init()?;
    Ok(())
}

fn json_line(record: &Record<'_>) -> String {
    serde_json::json!({
        "ts": chrono::Utc::now().timestamp_millis(),
        "level": record.level().as_str(),
        "target": record.target(),
        "msg": record.args().to_string(),
    })
    .to_string()
}

fn plain_line(record: &Record<'_>) -> String {
    let (marker, label) = level_style(record.level());
    format!(
        "{marker} {} [{label}] {}",
        record.target().cyan(),
        record.args()
    )
}

fn level_style(level: Level) -> (&'static str, ColoredString) {
    let label = level.as_str();
    match level {
        Level::Error => ("❌", label.red()),
        Level::Warn => ("⚠️", label.yellow()),
        Level::Info => ("✔️", label.green()),
        Level::Debug => ("🔍", label.blue()),
        Level::Trace => ("🔬", label.purple()),
    }
}
