// ABOUTME: Cohort enrollment workflow: cohort selection, capacity guard, and confirmation
// ABOUTME: Also serves enrollment history, cohort availability, and cancellation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

//! Enrollment
//!
//! A student enrolls into a career, not a cohort: the earliest upcoming cohort
//! of that career is picked for them. Seat accounting happens in
//! [`crate::database::EnrollmentsManager::insert_within_capacity`], which takes
//! the database write lock before counting, so `live <= capacity` holds for
//! every cohort no matter how many requests race.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use goya_core::errors::{AppError, AppResult, ErrorCode};
use goya_core::models::{CohortAvailability, Enrollment, EnrollmentDetails};
use tracing::{info, warn};
use uuid::Uuid;

use crate::capacity::CapacityLimit;
use crate::database::{Database, EnrollmentInsert};
use crate::notifications::{templates, Notifier};

/// Orchestrates enrollment requests against the database and notifier
#[derive(Clone)]
pub struct EnrollmentManager {
    database: Database,
    notifier: Arc<dyn Notifier>,
}

impl EnrollmentManager {
    /// Create an enrollment manager
    #[must_use]
    pub fn new(database: Database, notifier: Arc<dyn Notifier>) -> Self {
        Self { database, notifier }
    }

    /// Enroll a student into the next upcoming cohort of a career
    ///
    /// # Errors
    ///
    /// - `RESOURCE_NOT_FOUND` for an unknown student or career, or when no
    ///   upcoming cohort exists
    /// - `ALREADY_ENROLLED` when the student already holds a seat in that cohort
    /// - `COHORT_FULL` when every seat is taken
    pub async fn enroll(&self, student_id: Uuid, career_id: Uuid) -> AppResult<EnrollmentDetails> {
        self.enroll_at(student_id, career_id, Utc::now()).await
    }

    /// [`Self::enroll`] evaluated at an explicit instant
    ///
    /// # Errors
    ///
    /// Same as [`Self::enroll`]
    pub async fn enroll_at(
        &self,
        student_id: Uuid,
        career_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<EnrollmentDetails> {
        let student = self
            .database
            .students()
            .get(student_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Student {student_id} not found")))?;
        let career = self
            .database
            .careers()
            .get(career_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Career {career_id} not found")))?;

        let cohort = self
            .database
            .cohorts()
            .find_eligible(career_id, now)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("No upcoming cohort for career '{}'", career.title))
            })?;

        let outcome = self
            .database
            .enrollments()
            .insert_within_capacity(student.id, cohort.id, now)
            .await?;

        let enrollment = match outcome {
            EnrollmentInsert::Inserted(enrollment) => enrollment,
            EnrollmentInsert::AlreadyEnrolled => {
                return Err(AppError::new(
                    ErrorCode::AlreadyEnrolled,
                    format!("Student is already enrolled in cohort '{}'", cohort.name),
                ));
            }
            EnrollmentInsert::Full { live, capacity } => {
                return Err(CapacityLimit::cohort(capacity).exhausted(live));
            }
        };

        info!(
            student_id = %student.id,
            cohort_id = %cohort.id,
            enrollment_id = %enrollment.id,
            "student enrolled"
        );

        // The seat is committed; nothing past this point may fail the request
        match self.database.users().get(student.user_id).await {
            Ok(Some(user)) => {
                let message = templates::enrollment_confirmation(&user, &cohort, &career);
                if let Err(e) = self.notifier.send_message(&user.email, &message).await {
                    warn!(
                        enrollment_id = %enrollment.id,
                        error = %e,
                        "enrollment confirmation could not be sent"
                    );
                }
            }
            Ok(None) => warn!(
                enrollment_id = %enrollment.id,
                user_id = %student.user_id,
                "no user account for enrolled student; confirmation skipped"
            ),
            Err(e) => warn!(
                enrollment_id = %enrollment.id,
                error = %e,
                "enrollment confirmation recipient lookup failed"
            ),
        }

        Ok(EnrollmentDetails {
            enrollment,
            cohort,
            career,
        })
    }

    /// A student's enrollments with cohort and career, oldest first
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for an unknown student
    pub async fn list_enrollments(&self, student_id: Uuid) -> AppResult<Vec<EnrollmentDetails>> {
        if self.database.students().get(student_id).await?.is_none() {
            return Err(AppError::not_found(format!("Student {student_id} not found")));
        }
        self.database.enrollments().list_for_student(student_id).await
    }

    /// Every cohort with its free seats
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_cohorts(&self) -> AppResult<Vec<CohortAvailability>> {
        self.database.cohorts().list_with_availability().await
    }

    /// Cancel an enrollment, freeing its seat
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for an unknown enrollment
    pub async fn cancel_enrollment(&self, enrollment_id: Uuid) -> AppResult<Enrollment> {
        let enrollment = self
            .database
            .enrollments()
            .cancel(enrollment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Enrollment {enrollment_id} not found")))?;

        info!(
            enrollment_id = %enrollment.id,
            cohort_id = %enrollment.cohort_id,
            "enrollment cancelled"
        );
        Ok(enrollment)
    }
}
