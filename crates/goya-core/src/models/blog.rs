// ABOUTME: Blog post model for platform articles
// ABOUTME: Titles are capped at 255 characters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest accepted title, in characters
pub const MAX_TITLE_CHARS: usize = 255;

/// A published article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Unique identifier
    pub id: Uuid,
    /// Headline
    pub title: String,
    /// Body text
    pub description: String,
    /// Author name
    pub writer: String,
    /// Cover image URL
    pub image: Option<String>,
    /// Publication timestamp
    pub created_at: DateTime<Utc>,
}
