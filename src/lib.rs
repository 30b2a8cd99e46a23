// ABOUTME: Main library entry point for the GOYA mentorship platform API
// ABOUTME: Cohort enrollment with capacity control, cohort lifecycle sweeps, and mentor matching
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

#![deny(unsafe_code)]

//! # GOYA Server
//!
//! Backend for the Go Young Africa mentorship platform: students enroll into
//! career tracks, are placed into capacity-bounded cohorts, and are matched
//! with coaches.
//!
//! ## Architecture
//!
//! - **Database**: `SQLite` pool and per-entity managers
//! - **Enrollment**: cohort selection and the capacity-guarded insert
//! - **Lifecycle**: periodic cohort status sweeper
//! - **Mentorship**: bounded coach assignment
//! - **Community**: admission waitlist, coach reviews, sessions with chat
//!   messages, and the blog, served straight from their database managers
//! - **Routes**: thin axum handlers over the services above
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use goya_server::config::ServerConfig;
//! use goya_server::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = goya_server::server::bootstrap(config).await?;
//!     goya_server::server::run(resources).await
//! }
//! ```

pub use goya_core::{errors, models};

/// Shared capacity arithmetic for cohorts and mentors
pub mod capacity;

/// Configuration management
pub mod config;

/// Dependency container handed to routes
pub mod context;

/// `SQLite` persistence
pub mod database;

/// Cohort enrollment workflow
pub mod enrollment;

/// Cohort status sweeper
pub mod lifecycle;

/// Structured logging setup
pub mod logging;

/// Mentor assignment
pub mod mentorship;

/// Outbound notifications
pub mod notifications;

/// `HTTP` routes
pub mod routes;

/// Server bootstrap and lifecycle
pub mod server;
