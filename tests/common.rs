// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database, notifier doubles, and user/career/cohort fixture helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `goya_server`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use std::str::FromStr;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use goya_server::{
    config::ServerConfig,
    context::ServerResources,
    database::{
        CreateCareerRequest, CreateCoachRequest, CreateCohortRequest, CreateStudentRequest,
        CreateUserRequest, Database,
    },
    errors::{AppError, AppResult},
    models::{Career, Coach, Cohort, Student, User, UserRole},
    notifications::{LogNotifier, Notifier},
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging once per test process
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let filter = std::env::var("TEST_LOG").unwrap_or_else(|_| "warn".into());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// A message captured by [`RecordingNotifier`]
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub address: String,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
}

/// Notifier double that keeps every message in memory
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        address: &str,
        subject: &str,
        text_body: Option<&str>,
        html_body: Option<&str>,
    ) -> AppResult<()> {
        self.sent.lock().unwrap().push(SentMessage {
            address: address.to_owned(),
            subject: subject.to_owned(),
            text: text_body.map(str::to_owned),
            html: html_body.map(str::to_owned),
        });
        Ok(())
    }
}

/// Notifier double whose transport is always down
#[derive(Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(
        &self,
        _address: &str,
        _subject: &str,
        _text_body: Option<&str>,
        _html_body: Option<&str>,
    ) -> AppResult<()> {
        Err(AppError::external_service("mail relay", "connection refused"))
    }
}

/// Fresh in-memory database with the schema applied
pub async fn create_test_database() -> AppResult<Database> {
    init_test_logging();
    Database::new("sqlite::memory:", 1).await
}

/// In-memory database plus its raw pool, for tests that must tamper with rows
pub async fn create_test_database_with_pool() -> AppResult<(Database, SqlitePool)> {
    init_test_logging();
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    let database = Database::from_pool(pool.clone()).await?;
    Ok((database, pool))
}

/// File-backed database allowing several pooled connections.
///
/// Keep the returned directory alive for as long as the database is used.
pub async fn create_file_database(max_connections: u32) -> AppResult<(Database, TempDir)> {
    init_test_logging();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite:{}", dir.path().join("goya_test.db").display());
    let database = Database::new(&url, max_connections).await?;
    Ok((database, dir))
}

/// Server configuration for tests
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.database.url = "sqlite::memory:".into();
    config
}

/// Shared resources over an in-memory database and a log-only notifier
pub async fn create_test_server_resources() -> AppResult<Arc<ServerResources>> {
    create_test_server_resources_with(Arc::new(LogNotifier), test_config()).await
}

/// Shared resources with an explicit notifier and configuration
pub async fn create_test_server_resources_with(
    notifier: Arc<dyn Notifier>,
    config: ServerConfig,
) -> AppResult<Arc<ServerResources>> {
    let database = create_test_database().await?;
    Ok(Arc::new(ServerResources::new(database, config, notifier)))
}

/// Create a user with a unique email
pub async fn create_test_user(database: &Database, role: UserRole) -> AppResult<User> {
    database
        .users()
        .create(&CreateUserRequest {
            email: format!("{}_{}@example.com", role.as_str(), Uuid::new_v4()),
            first_name: "Test".into(),
            last_name: "User".into(),
            role,
            approved: true,
        })
        .await
}

/// Create a student (and its user account)
pub async fn create_test_student(database: &Database) -> AppResult<Student> {
    let user = create_test_user(database, UserRole::Student).await?;
    database
        .students()
        .create(&CreateStudentRequest { user_id: user.id })
        .await
}

/// Create a coach (and its user account)
pub async fn create_test_coach(database: &Database, career_id: Option<Uuid>) -> AppResult<Coach> {
    let user = create_test_user(database, UserRole::Coach).await?;
    database
        .coaches()
        .create(&CreateCoachRequest {
            user_id: user.id,
            career_id,
            bio: None,
        })
        .await
}

/// Create a career with a unique title
pub async fn create_test_career(database: &Database) -> AppResult<Career> {
    database
        .careers()
        .create(&CreateCareerRequest {
            title: format!("Career {}", Uuid::new_v4()),
            description: None,
        })
        .await
}

/// Create a cohort spanning `[start, end)` with a derived status
pub async fn create_test_cohort(
    database: &Database,
    career_id: Uuid,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    capacity: i64,
) -> AppResult<Cohort> {
    create_test_cohort_with_status(database, career_id, start_date, end_date, capacity, None).await
}

/// Create a cohort with an explicit stored status
pub async fn create_test_cohort_with_status(
    database: &Database,
    career_id: Uuid,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    capacity: i64,
    status: Option<&str>,
) -> AppResult<Cohort> {
    database
        .cohorts()
        .create(&CreateCohortRequest {
            name: format!("Cohort {}", Uuid::new_v4()),
            career_id,
            start_date,
            end_date,
            capacity,
            status: status.map(str::to_owned),
        })
        .await
}

/// Cohort starting `days` from now and lasting twelve weeks
pub async fn create_upcoming_cohort(
    database: &Database,
    career_id: Uuid,
    days: i64,
    capacity: i64,
) -> AppResult<Cohort> {
    let start = Utc::now() + Duration::days(days);
    create_test_cohort(database, career_id, start, start + Duration::weeks(12), capacity).await
}
