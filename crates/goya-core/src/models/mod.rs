// ABOUTME: Domain model module for careers, cohorts, people, enrollments, and community content
// ABOUTME: Re-exports entity types shared by the database and HTTP layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

/// Blog posts
pub mod blog;
/// Careers (program tracks)
pub mod career;
/// Cohorts and their lifecycle status
pub mod cohort;
/// Enrollment join records
pub mod enrollment;
/// Entity kinds for typed table dispatch
pub mod entity;
/// Users, students, and coaches
pub mod people;
/// Coach reviews and ratings
pub mod review;
/// Mentoring sessions and messages
pub mod session;

pub use blog::BlogPost;
pub use career::Career;
pub use cohort::{Cohort, CohortAvailability, CohortStatus};
pub use enrollment::{Enrollment, EnrollmentDetails, EnrollmentStatus};
pub use entity::EntityKind;
pub use people::{Coach, CoachProfile, Student, StudentProfile, StudentStatus, User, UserRole};
pub use review::{CoachRating, Review, ReviewWithStudent};
pub use session::{Message, Session, SessionDetails, SessionStatus};
