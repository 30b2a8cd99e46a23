// ABOUTME: Database operations for user accounts
// ABOUTME: Handles account creation, lookup, and admin approval flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use chrono::Utc;
use goya_core::errors::{AppError, AppResult};
use goya_core::models::{User, UserRole};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, is_unique_violation, parse_timestamp, parse_uuid};

/// Request to create a new user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Contact address
    pub email: String,
    /// Given name
    #[serde(alias = "firstName")]
    pub first_name: String,
    /// Family name
    #[serde(alias = "lastName")]
    pub last_name: String,
    /// Platform role (defaults to student)
    #[serde(default)]
    pub role: UserRole,
    /// Pre-approve the account
    #[serde(default)]
    pub approved: bool,
}

/// User account database operations manager
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    /// Create a new users manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user account
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the email is taken, or the insert fails
    pub async fn create(&self, request: &CreateUserRequest) -> AppResult<User> {
        let email = request.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::missing_field("email"));
        }
        if !email.contains('@') {
            return Err(AppError::invalid_input(format!("Invalid email address '{email}'")));
        }
        if request.first_name.trim().is_empty() {
            return Err(AppError::missing_field("first_name"));
        }
        if request.last_name.trim().is_empty() {
            return Err(AppError::missing_field("last_name"));
        }

        let user = User {
            id: Uuid::new_v4(),
            email,
            first_name: request.first_name.trim().to_owned(),
            last_name: request.last_name.trim().to_owned(),
            role: request.role,
            approved: request.approved,
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO users (id, email, first_name, last_name, role, approved, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(user.approved)
        .bind(format_timestamp(user.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("User with email '{}' already exists", user.email))
            } else {
                AppError::database(format!("Failed to create user: {e}"))
            }
        })?;

        Ok(user)
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, email, first_name, last_name, role, approved, created_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.map(|r| row_to_user(&r, "")).transpose()
    }

    /// Set the admin approval flag
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn set_approved(&self, user_id: Uuid, approved: bool) -> AppResult<bool> {
        let result = sqlx::query("UPDATE users SET approved = $1 WHERE id = $2")
            .bind(approved)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update user approval: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert a row to a user; `prefix` selects aliased columns in joined queries
pub(crate) fn row_to_user(row: &SqliteRow, prefix: &str) -> AppResult<User> {
    let column = |name: &str| format!("{prefix}{name}");

    let id: String = row.try_get(column("id").as_str())?;
    let role: String = row.try_get(column("role").as_str())?;
    let created_at: String = row.try_get(column("created_at").as_str())?;

    Ok(User {
        id: parse_uuid(&id, "user id")?,
        email: row.try_get(column("email").as_str())?,
        first_name: row.try_get(column("first_name").as_str())?,
        last_name: row.try_get(column("last_name").as_str())?,
        role: role.parse()?,
        approved: row.try_get(column("approved").as_str())?,
        created_at: parse_timestamp(&created_at, "user created_at")?,
    })
}
