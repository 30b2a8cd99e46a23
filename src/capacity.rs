// ABOUTME: Bounded-capacity helper shared by cohort enrollment and mentor assignment
// ABOUTME: Turns a (limit, current count) pair into free slots or a typed capacity error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use goya_core::errors::{AppError, ErrorCode};

/// Default number of students a coach may mentor at once
pub const DEFAULT_MENTOR_CAPACITY: u32 = 5;

/// What a capacity limit guards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityResource {
    /// Seats in a cohort
    Cohort,
    /// Mentees of a coach
    Mentor,
}

/// A fixed upper bound on live members of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityLimit {
    limit: u32,
    resource: CapacityResource,
}

impl CapacityLimit {
    /// Seat limit of a cohort
    #[must_use]
    pub const fn cohort(limit: u32) -> Self {
        Self {
            limit,
            resource: CapacityResource::Cohort,
        }
    }

    /// Mentee limit of a coach
    #[must_use]
    pub const fn mentor(limit: u32) -> Self {
        Self {
            limit,
            resource: CapacityResource::Mentor,
        }
    }

    /// The configured bound
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Free slots given the current live count; never negative
    #[must_use]
    pub const fn available(&self, current: u32) -> u32 {
        self.limit.saturating_sub(current)
    }

    /// The error reported when the resource is full
    #[must_use]
    pub fn exhausted(&self, current: u32) -> AppError {
        match self.resource {
            CapacityResource::Cohort => AppError::new(
                ErrorCode::CohortFull,
                format!("Cohort is full ({current}/{} seats taken)", self.limit),
            ),
            CapacityResource::Mentor => AppError::new(
                ErrorCode::MentorAtCapacity,
                format!("Mentor already supervises {current} of {} students", self.limit),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_slots_saturate_at_zero() {
        let limit = CapacityLimit::cohort(3);
        assert_eq!(limit.available(0), 3);
        assert_eq!(limit.available(3), 0);
        assert_eq!(limit.available(7), 0);
    }

    #[test]
    fn cohort_and_mentor_report_different_codes() {
        let cohort = CapacityLimit::cohort(1).exhausted(1);
        assert_eq!(cohort.code, ErrorCode::CohortFull);
        assert_eq!(cohort.code.http_status(), 409);

        let mentor =
            CapacityLimit::mentor(DEFAULT_MENTOR_CAPACITY).exhausted(DEFAULT_MENTOR_CAPACITY);
        assert_eq!(mentor.code, ErrorCode::MentorAtCapacity);
        assert_eq!(mentor.code.http_status(), 400);
        assert!(mentor.message.contains("5 of 5"));
    }

    #[test]
    fn limit_reports_configured_bound() {
        assert_eq!(CapacityLimit::mentor(5).limit(), 5);
        assert_eq!(CapacityLimit::cohort(12).limit(), 12);
    }
}
