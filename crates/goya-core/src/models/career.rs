// ABOUTME: Career model representing a named program track
// ABOUTME: Careers are reference data that own scheduled cohorts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named track under which cohorts are scheduled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Career {
    /// Unique identifier
    pub id: Uuid,
    /// Display title, unique across careers
    pub title: String,
    /// Optional long-form description
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
