// ABOUTME: Database operations for blog posts
// ABOUTME: Supports paged listing by publication date and keyword search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use chrono::Utc;
use goya_core::errors::{AppError, AppResult};
use goya_core::models::blog::MAX_TITLE_CHARS;
use goya_core::models::BlogPost;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid, Page};

const BLOG_COLUMNS: &str = "id, title, description, writer, image, created_at";

/// Request to publish a blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlogPostRequest {
    /// Headline
    #[serde(default)]
    pub title: String,
    /// Body text
    #[serde(default)]
    pub description: String,
    /// Author name
    #[serde(default)]
    pub writer: String,
    /// Cover image URL
    #[serde(default)]
    pub image: Option<String>,
}

/// Publication-date order of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlogSort {
    /// Oldest first
    #[default]
    #[serde(rename = "asc")]
    Oldest,
    /// Newest first
    #[serde(rename = "desc")]
    Newest,
}

impl BlogSort {
    const fn sql(self) -> &'static str {
        match self {
            Self::Oldest => "created_at ASC, id ASC",
            Self::Newest => "created_at DESC, id ASC",
        }
    }
}

fn required(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::missing_field(field));
    }
    Ok(value.to_owned())
}

/// Escape LIKE wildcards so the keyword matches literally
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Blog post database operations manager
pub struct BlogManager {
    pool: SqlitePool,
}

impl BlogManager {
    /// Create a new blog manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Publish a post
    ///
    /// # Errors
    ///
    /// - `MISSING_REQUIRED_FIELD` for a blank title, description or writer
    /// - `INVALID_INPUT` for a title longer than 255 characters
    pub async fn create(&self, request: &CreateBlogPostRequest) -> AppResult<BlogPost> {
        let title = required(&request.title, "title")?;
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(AppError::invalid_input(format!(
                "Title must be at most {MAX_TITLE_CHARS} characters"
            )));
        }

        let post = BlogPost {
            id: Uuid::new_v4(),
            title,
            description: required(&request.description, "description")?,
            writer: required(&request.writer, "writer")?,
            image: request
                .image
                .as_deref()
                .map(str::trim)
                .filter(|i| !i.is_empty())
                .map(str::to_owned),
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO blog_posts (id, title, description, writer, image, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(post.id.to_string())
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.writer)
        .bind(post.image.as_deref())
        .bind(format_timestamp(post.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create blog post: {e}")))?;

        Ok(post)
    }

    /// One page of posts in publication order
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self, sort: BlogSort, page: Page) -> AppResult<Vec<BlogPost>> {
        let rows = sqlx::query(&format!(
            "SELECT {BLOG_COLUMNS} FROM blog_posts ORDER BY {} LIMIT $1 OFFSET $2",
            sort.sql()
        ))
        .bind(i64::from(page.limit()))
        .bind(i64::from(page.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list blog posts: {e}")))?;

        rows.iter().map(row_to_post).collect()
    }

    /// Get a post by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, post_id: Uuid) -> AppResult<Option<BlogPost>> {
        let row = sqlx::query(&format!("SELECT {BLOG_COLUMNS} FROM blog_posts WHERE id = $1"))
            .bind(post_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get blog post: {e}")))?;

        row.as_ref().map(row_to_post).transpose()
    }

    /// Posts whose title or description contains `keyword`, newest first
    ///
    /// Matching ignores ASCII case.
    ///
    /// # Errors
    ///
    /// Returns `MISSING_REQUIRED_FIELD` for a blank keyword
    pub async fn search(&self, keyword: &str, page: Page) -> AppResult<Vec<BlogPost>> {
        let pattern = like_pattern(&required(keyword, "keyword")?);

        let rows = sqlx::query(&format!(
            r"
            SELECT {BLOG_COLUMNS} FROM blog_posts
            WHERE title LIKE $1 ESCAPE '\' OR description LIKE $1 ESCAPE '\'
            ORDER BY created_at DESC, id ASC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(pattern)
        .bind(i64::from(page.limit()))
        .bind(i64::from(page.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to search blog posts: {e}")))?;

        rows.iter().map(row_to_post).collect()
    }

    /// Delete a post
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, post_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(post_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete blog post: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_post(row: &SqliteRow) -> AppResult<BlogPost> {
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(BlogPost {
        id: parse_uuid(&id, "blog post id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        writer: row.try_get("writer")?,
        image: row.try_get("image")?,
        created_at: parse_timestamp(&created_at, "blog post created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }
}
