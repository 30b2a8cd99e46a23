// ABOUTME: Bounded-capacity matching of students to coaches (mentors)
// ABOUTME: A coach never supervises more students than the configured limit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use goya_core::errors::{AppError, AppResult};
use goya_core::models::Student;
use tracing::info;
use uuid::Uuid;

use crate::capacity::CapacityLimit;
use crate::database::Database;

/// Links students to coaches under a mentee limit
#[derive(Clone)]
pub struct MentorAssignment {
    database: Database,
    limit: CapacityLimit,
}

impl MentorAssignment {
    /// Create the assignment service with the given mentee limit
    #[must_use]
    pub fn new(database: Database, mentor_capacity: u32) -> Self {
        Self {
            database,
            limit: CapacityLimit::mentor(mentor_capacity),
        }
    }

    /// Link a student to a coach
    ///
    /// Re-assigning a student to the coach they already have changes nothing.
    ///
    /// # Errors
    ///
    /// - `RESOURCE_NOT_FOUND` for an unknown student or coach
    /// - `MENTOR_AT_CAPACITY` when the coach already has the maximum number of students
    pub async fn assign_mentor(&self, student_id: Uuid, coach_id: Uuid) -> AppResult<Student> {
        let students = self.database.students();
        let student = students
            .get(student_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Student {student_id} not found")))?;
        if self.database.coaches().get(coach_id).await?.is_none() {
            return Err(AppError::not_found(format!("Mentor {coach_id} not found")));
        }

        if student.coach_id == Some(coach_id) {
            return Ok(student);
        }

        let linked = students
            .assign_coach_within_capacity(student_id, coach_id, self.limit.limit())
            .await?;
        if !linked {
            // Zero rows also happens when the student was deleted meanwhile
            if students.get(student_id).await?.is_none() {
                return Err(AppError::not_found(format!("Student {student_id} not found")));
            }
            let current = students.count_for_coach(coach_id).await?;
            return Err(self.limit.exhausted(current.max(self.limit.limit())));
        }

        info!(student_id = %student_id, coach_id = %coach_id, "mentor assigned");
        students
            .get(student_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Student {student_id} not found")))
    }

    /// Remove a student's mentor
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for an unknown student
    pub async fn unassign_mentor(&self, student_id: Uuid) -> AppResult<Student> {
        let students = self.database.students();
        if !students.clear_coach(student_id).await? {
            return Err(AppError::not_found(format!("Student {student_id} not found")));
        }

        info!(student_id = %student_id, "mentor unassigned");
        students
            .get(student_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Student {student_id} not found")))
    }
}
