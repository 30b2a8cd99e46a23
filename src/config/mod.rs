// ABOUTME: Configuration module root
// ABOUTME: Server settings are read from the environment and overridden by CLI flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

/// Environment variable parsing and typed configuration sections
pub mod environment;

pub use environment::{
    DatabaseConfig, LogFormat, LoggingConfig, MailConfig, ServerConfig, SweeperConfig,
};
