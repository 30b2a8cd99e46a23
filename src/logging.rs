// ABOUTME: Global tracing subscriber setup for compact or JSON log output
// ABOUTME: RUST_LOG overrides the configured level when present
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use goya_core::errors::{AppError, AppResult};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Build the filter from `RUST_LOG`, falling back to the configured level
///
/// # Errors
///
/// Returns a config error if neither source is a valid filter directive
pub fn build_filter(config: &LoggingConfig) -> AppResult<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.level).map_err(|e| {
            AppError::config(format!("Invalid log level '{}': {e}", config.level))
        })
    })
}

/// Install the global subscriber
///
/// # Errors
///
/// Returns a config error if the filter is invalid or a subscriber is already set
pub fn init_logging(config: &LoggingConfig) -> AppResult<()> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false).with_target(true))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(true))
            .try_init(),
    };

    result.map_err(|e| AppError::config(format!("Failed to initialize logging: {e}")))
}
