// ABOUTME: Closed set of entity kinds addressable by name at the API boundary
// ABOUTME: Replaces runtime table-name lookup with an explicit enum
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Entity kinds that can be addressed by name (admin statistics)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// User accounts
    Users,
    /// Careers
    Careers,
    /// Cohorts
    Cohorts,
    /// Students
    Students,
    /// Enrollments
    Enrollments,
    /// Coaches
    Coaches,
    /// Coach reviews
    Reviews,
    /// Mentoring sessions
    Sessions,
    /// Session messages
    Messages,
    /// Blog posts
    Blogs,
}

impl EntityKind {
    /// Every supported kind
    pub const ALL: [Self; 10] = [
        Self::Users,
        Self::Careers,
        Self::Cohorts,
        Self::Students,
        Self::Enrollments,
        Self::Coaches,
        Self::Reviews,
        Self::Sessions,
        Self::Messages,
        Self::Blogs,
    ];

    /// Wire name of the kind
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Careers => "careers",
            Self::Cohorts => "cohorts",
            Self::Students => "students",
            Self::Enrollments => "enrollments",
            Self::Coaches => "coaches",
            Self::Reviews => "reviews",
            Self::Sessions => "sessions",
            Self::Messages => "messages",
            Self::Blogs => "blogs",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| AppError::invalid_input(format!("Unsupported entity kind '{s}'")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
        assert_eq!("Cohorts".parse::<EntityKind>().unwrap(), EntityKind::Cohorts);
    }

    #[test]
    fn rejects_unknown_kinds() {
        assert!("documents".parse::<EntityKind>().is_err());
        assert!("users; DROP TABLE users".parse::<EntityKind>().is_err());
    }
}
