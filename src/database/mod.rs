// ABOUTME: Core database management with schema migrations for SQLite
// ABOUTME: Owns the process-wide connection pool and hands out per-entity managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

/// Blog posts
pub mod blog;
/// Career reference data
pub mod careers;
/// Coach (mentor) records
pub mod coaches;
/// Cohort scheduling and capacity
pub mod cohorts;
/// Enrollment join records and the capacity-guarded insert
pub mod enrollments;
/// Session chat messages
pub mod messages;
/// Coach reviews and ratings
pub mod reviews;
/// Mentoring sessions and their participants
pub mod sessions;
/// Student records and mentor links
pub mod students;
/// Explicit write-locking transactions
pub mod transactions;
/// User accounts
pub mod users;

pub use blog::{BlogManager, BlogSort, CreateBlogPostRequest};
pub use careers::{CareersManager, CreateCareerRequest};
pub use coaches::{CoachesManager, CreateCoachRequest};
pub use cohorts::{CohortsManager, CreateCohortRequest, UpdateCohortRequest};
pub use enrollments::{EnrollmentInsert, EnrollmentsManager};
pub use messages::{CreateMessageRequest, MessagesManager, UpdateMessageRequest};
pub use reviews::{ReviewsManager, SubmitReviewRequest};
pub use sessions::{CreateSessionRequest, SessionsManager, UpdateSessionRequest};
pub use students::{CreateStudentRequest, StudentsManager};
pub use transactions::ImmediateTransaction;
pub use users::{CreateUserRequest, UsersManager};

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use goya_core::errors::{AppError, AppResult};
use goya_core::models::EntityKind;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

/// How long a writer waits for a competing write lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Rows per page when the caller does not say
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Schema statements applied in order on every startup
const MIGRATIONS: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT UNIQUE NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'student',
        approved INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS careers (
        id TEXT PRIMARY KEY,
        title TEXT UNIQUE NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS cohorts (
        id TEXT PRIMARY KEY,
        name TEXT UNIQUE NOT NULL,
        career_id TEXT NOT NULL REFERENCES careers(id) ON DELETE RESTRICT,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        capacity INTEGER NOT NULL CHECK (capacity > 0),
        status TEXT NOT NULL DEFAULT 'UPCOMING',
        created_at TEXT NOT NULL,
        CHECK (start_date < end_date)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS coaches (
        id TEXT PRIMARY KEY,
        user_id TEXT UNIQUE NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        career_id TEXT REFERENCES careers(id) ON DELETE SET NULL,
        bio TEXT,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS students (
        id TEXT PRIMARY KEY,
        user_id TEXT UNIQUE NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        coach_id TEXT REFERENCES coaches(id) ON DELETE SET NULL,
        current_enrollment_id TEXT,
        status TEXT NOT NULL DEFAULT 'WAITLIST',
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS enrollments (
        id TEXT PRIMARY KEY,
        student_id TEXT NOT NULL REFERENCES students(id) ON DELETE CASCADE,
        cohort_id TEXT NOT NULL REFERENCES cohorts(id) ON DELETE CASCADE,
        status TEXT NOT NULL DEFAULT 'PENDING',
        created_at TEXT NOT NULL,
        UNIQUE (student_id, cohort_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS reviews (
        id TEXT PRIMARY KEY,
        coach_id TEXT NOT NULL REFERENCES coaches(id) ON DELETE CASCADE,
        student_id TEXT NOT NULL REFERENCES students(id) ON DELETE CASCADE,
        rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
        comment TEXT,
        created_at TEXT NOT NULL,
        UNIQUE (coach_id, student_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY,
        title TEXT,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'SCHEDULED',
        created_at TEXT NOT NULL,
        CHECK (start_time < end_time)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS session_participants (
        session_id TEXT NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        PRIMARY KEY (session_id, user_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS messages (
        id TEXT PRIMARY KEY,
        session_id TEXT NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
        sender_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        content TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS blog_posts (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL CHECK (length(title) <= 255),
        description TEXT NOT NULL,
        writer TEXT NOT NULL,
        image TEXT,
        created_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_cohorts_career_status ON cohorts(career_id, status, start_date)",
    "CREATE INDEX IF NOT EXISTS idx_enrollments_cohort ON enrollments(cohort_id, status)",
    "CREATE INDEX IF NOT EXISTS idx_enrollments_student ON enrollments(student_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_students_coach ON students(coach_id)",
    "CREATE INDEX IF NOT EXISTS idx_students_status ON students(status)",
    "CREATE INDEX IF NOT EXISTS idx_reviews_coach ON reviews(coach_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_messages_session ON messages(session_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_blog_posts_created ON blog_posts(created_at)",
];

/// Database connection pool shared by every component
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and run migrations
    ///
    /// In-memory URLs are limited to a single connection so every caller sees the
    /// same database.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL is invalid or malformed
    /// - Database connection fails
    /// - Migration process fails
    pub async fn new(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL '{database_url}': {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool_options = if database_url.contains(":memory:") {
            // The database lives only as long as its connection
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails
    pub async fn from_pool(pool: SqlitePool) -> AppResult<Self> {
        let db = Self { pool };
        db.migrate()
            .await
            .map_err(|e| AppError::database(format!("Database migration failed: {e}")))?;
        Ok(db)
    }

    /// Run all database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        for statement in MIGRATIONS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration statement failed: {e}")))?;
        }
        debug!(statements = MIGRATIONS.len(), "database schema is up to date");
        Ok(())
    }

    /// Connectivity check used by the health route
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// Count rows of the given entity kind
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn count_entities(&self, kind: EntityKind) -> AppResult<u64> {
        let query = match kind {
            EntityKind::Users => "SELECT COUNT(*) AS total FROM users",
            EntityKind::Careers => "SELECT COUNT(*) AS total FROM careers",
            EntityKind::Cohorts => "SELECT COUNT(*) AS total FROM cohorts",
            EntityKind::Students => "SELECT COUNT(*) AS total FROM students",
            EntityKind::Enrollments => "SELECT COUNT(*) AS total FROM enrollments",
            EntityKind::Coaches => "SELECT COUNT(*) AS total FROM coaches",
            EntityKind::Reviews => "SELECT COUNT(*) AS total FROM reviews",
            EntityKind::Sessions => "SELECT COUNT(*) AS total FROM sessions",
            EntityKind::Messages => "SELECT COUNT(*) AS total FROM messages",
            EntityKind::Blogs => "SELECT COUNT(*) AS total FROM blog_posts",
        };

        let row = sqlx::query(query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count {kind}: {e}")))?;
        let total: i64 = row.try_get("total")?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    /// Close the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
        info!("database pool closed");
    }

    /// User account manager
    #[must_use]
    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.pool.clone())
    }

    /// Career manager
    #[must_use]
    pub fn careers(&self) -> CareersManager {
        CareersManager::new(self.pool.clone())
    }

    /// Cohort manager
    #[must_use]
    pub fn cohorts(&self) -> CohortsManager {
        CohortsManager::new(self.pool.clone())
    }

    /// Student manager
    #[must_use]
    pub fn students(&self) -> StudentsManager {
        StudentsManager::new(self.pool.clone())
    }

    /// Coach manager
    #[must_use]
    pub fn coaches(&self) -> CoachesManager {
        CoachesManager::new(self.pool.clone())
    }

    /// Enrollment manager
    #[must_use]
    pub fn enrollments(&self) -> EnrollmentsManager {
        EnrollmentsManager::new(self.pool.clone())
    }

    /// Coach review manager
    #[must_use]
    pub fn reviews(&self) -> ReviewsManager {
        ReviewsManager::new(self.pool.clone())
    }

    /// Mentoring session manager
    #[must_use]
    pub fn sessions(&self) -> SessionsManager {
        SessionsManager::new(self.pool.clone())
    }

    /// Session message manager
    #[must_use]
    pub fn messages(&self) -> MessagesManager {
        MessagesManager::new(self.pool.clone())
    }

    /// Blog post manager
    #[must_use]
    pub fn blog(&self) -> BlogManager {
        BlogManager::new(self.pool.clone())
    }
}

/// A window into a listing, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: u32,
    offset: u32,
}

impl Page {
    /// Page `number` holding `size` rows
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` when `number` is zero or `size` is outside
    /// `1..=MAX_PAGE_SIZE`
    pub fn new(number: u32, size: u32) -> AppResult<Self> {
        if number == 0 {
            return Err(AppError::invalid_input("page starts at 1"));
        }
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(AppError::invalid_input(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self {
            limit: size,
            offset: (number - 1).saturating_mul(size),
        })
    }

    /// Rows in the page
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows skipped before the page
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Format a timestamp for storage.
///
/// Fixed-width UTC text keeps lexicographic order equal to chronological order,
/// which the date comparisons in SQL rely on.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp
///
/// # Errors
///
/// Returns an error if the value is not RFC 3339
pub fn parse_timestamp(value: &str, field: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid {field} timestamp '{value}': {e}")))
}

/// Parse a stored identifier
///
/// # Errors
///
/// Returns an error if the value is not a UUID
pub fn parse_uuid(value: &str, field: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::database(format!("Invalid {field} '{value}': {e}")))
}

/// Parse an optional stored identifier
///
/// # Errors
///
/// Returns an error if a present value is not a UUID
pub fn parse_optional_uuid(value: Option<&str>, field: &str) -> AppResult<Option<Uuid>> {
    value.map(|v| parse_uuid(v, field)).transpose()
}

/// Whether a sqlx error is a UNIQUE constraint violation
#[must_use]
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Whether a sqlx error is a FOREIGN KEY constraint violation
#[must_use]
pub fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn pages_translate_to_offsets() {
        let third = Page::new(3, 20).unwrap();
        assert_eq!(third.limit(), 20);
        assert_eq!(third.offset(), 40);
        assert_eq!(Page::default(), Page::new(1, DEFAULT_PAGE_SIZE).unwrap());

        assert!(Page::new(0, 10).is_err());
        assert!(Page::new(1, 0).is_err());
        assert!(Page::new(1, MAX_PAGE_SIZE + 1).is_err());
    }

    #[test]
    fn stored_timestamps_sort_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2026, 1, 9, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();

        assert!(format_timestamp(earlier) < format_timestamp(later));
        assert_eq!(
            parse_timestamp(&format_timestamp(later), "test").unwrap(),
            later
        );
    }
}
