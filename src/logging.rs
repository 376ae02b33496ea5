// ABOUTME: Structured logging setup with env-filtered levels and selectable formats
// ABOUTME: Scaled-down tracing-subscriber configuration for the engine and its binaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

//! Structured logging configuration.

use std::env;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Log output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl LogFormat {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Configuration from `RUST_LOG` / `FITFUTURE_LOG_FORMAT`.
    #[must_use]
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            level: env::var("RUST_LOG").unwrap_or(default.level),
            format: env::var("FITFUTURE_LOG_FORMAT")
                .map_or(default.format, |raw| LogFormat::parse(&raw)),
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    }
    .map_err(|err| anyhow::anyhow!("failed to initialize logging: {err}"))
}
