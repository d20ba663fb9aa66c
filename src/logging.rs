// src/logging.rs

//! Logging setup for `genlaunch` using `tracing` + `tracing-subscriber`.
//!
//! Filter selection:
//! 1. `--log-level` applies to genlaunch's own modules; dependencies such as
//!    the HTTP client stay at `warn`.
//! 2. Otherwise `GENLAUNCH_LOG` is read as a full filter, so per-module
//!    directives work: `GENLAUNCH_LOG=genlaunch::exec=debug,info`.
//! 3. Otherwise [`DEFAULT_DIRECTIVES`].
//!
//! Logs go to STDERR; STDOUT carries the child processes' output.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "GENLAUNCH_LOG";

pub const DEFAULT_DIRECTIVES: &str = "warn,genlaunch=info";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_spec = std::env::var(LOG_ENV).ok();

    fmt()
        .with_env_filter(build_filter(cli_level, env_spec.as_deref()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>, env_spec: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(cli_directives(level));
    }

    match env_spec.map(str::trim).filter(|s| !s.is_empty()) {
        Some(spec) => EnvFilter::try_new(spec).unwrap_or_else(|e| {
            eprintln!("ignoring invalid {LOG_ENV}={spec:?}: {e}");
            EnvFilter::new(DEFAULT_DIRECTIVES)
        }),
        None => EnvFilter::new(DEFAULT_DIRECTIVES),
    }
}

fn cli_directives(level: LogLevel) -> String {
    let level = match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };
    format!("warn,genlaunch={level}")
}
