// ABOUTME: Write-locking transaction guard for SQLite read-modify-write sequences
// ABOUTME: Takes the database write lock up front so concurrent writers serialize instead of deadlocking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use goya_core::errors::{AppError, AppResult};
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::warn;

/// Transaction opened with `BEGIN IMMEDIATE`.
///
/// Every statement that must observe a consistent view has to run on
/// [`ImmediateTransaction::executor`], never on the pool. A guard dropped without
/// `commit`/`rollback` closes its connection, which discards the open transaction.
pub struct ImmediateTransaction {
    conn: PoolConnection<Sqlite>,
    finished: bool,
}

impl ImmediateTransaction {
    /// Acquire a connection and take the write lock
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or the lock cannot be taken
    /// within the busy timeout
    pub async fn begin(pool: &SqlitePool) -> AppResult<Self> {
        let mut conn = pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;

        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        Ok(Self {
            conn,
            finished: false,
        })
    }

    /// Connection to run statements on
    pub fn executor(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// Commit the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails; the transaction is then discarded
    pub async fn commit(mut self) -> AppResult<()> {
        sqlx::query("COMMIT")
            .execute(&mut *self.conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {e}")))?;
        self.finished = true;
        Ok(())
    }

    /// Roll the transaction back
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback statement fails
    pub async fn rollback(mut self) -> AppResult<()> {
        sqlx::query("ROLLBACK")
            .execute(&mut *self.conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to roll back transaction: {e}")))?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for ImmediateTransaction {
    fn drop(&mut self) {
        if !self.finished {
            warn!("transaction dropped without commit; closing its connection");
            self.conn.close_on_drop();
        }
    }
}
