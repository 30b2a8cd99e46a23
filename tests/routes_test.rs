// ABOUTME: Integration tests for the HTTP routes
// ABOUTME: Exercises status codes and error envelopes through the full router stack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    create_test_career, create_test_coach, create_test_server_resources,
    create_test_server_resources_with, create_test_student, create_test_user,
    create_upcoming_cohort, test_config, RecordingNotifier,
};
use goya_server::context::ServerResources;
use goya_server::errors::{ErrorCode, ErrorResponse};
use goya_server::models::{
    BlogPost, Career, CoachRating, Cohort, CohortAvailability, CoachProfile, CohortStatus,
    EnrollmentDetails, Message, ReviewWithStudent, SessionDetails, Student, StudentProfile,
    StudentStatus, User, UserRole,
};
use goya_server::routes::{self, admin::EntityCountResponse, health::HealthResponse};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use uuid::Uuid;

// ============================================================================
// Test Helpers
// ============================================================================

async fn setup_test_environment() -> (axum::Router, Arc<ServerResources>) {
    let resources = create_test_server_resources().await.unwrap();
    (routes::router(Arc::clone(&resources)), resources)
}

async fn create_student_via_api(router: &axum::Router) -> Student {
    let response = AxumTestRequest::post("/api/users")
        .json(&json!({
            "email": format!("student_{}@example.com", Uuid::new_v4()),
            "firstName": "Ada",
            "lastName": "Obi",
            "role": "student"
        }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let user: User = response.json();

    let response = AxumTestRequest::post("/api/students")
        .json(&json!({ "userId": user.id }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json()
}

fn error_code(body: &ErrorResponse) -> ErrorCode {
    body.error.code
}

// ============================================================================
// Health and middleware
// ============================================================================

#[tokio::test]
async fn test_health_reports_ok() {
    let (router, _resources) = setup_test_environment().await;

    let response = AxumTestRequest::get("/health").send(router).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.database, "ok");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let (router, _resources) = setup_test_environment().await;

    let response = AxumTestRequest::get("/health")
        .header("x-request-id", "req-123")
        .send(router.clone())
        .await;
    assert_eq!(response.header("x-request-id"), Some("req-123"));

    let response = AxumTestRequest::get("/health").send(router).await;
    assert!(response.header("x-request-id").is_some());
}

// ============================================================================
// Enrollment
// ============================================================================

#[tokio::test]
async fn test_enroll_until_cohort_is_full() {
    let (router, resources) = setup_test_environment().await;
    let career = create_test_career(&resources.database).await.unwrap();
    let cohort = create_upcoming_cohort(&resources.database, career.id, 7, 2)
        .await
        .unwrap();

    for _ in 0..2 {
        let student = create_student_via_api(&router).await;
        let response = AxumTestRequest::post("/api/students/enroll")
            .json(&json!({ "studentId": student.id, "careerId": career.id }))
            .send(router.clone())
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let details: EnrollmentDetails = response.json();
        assert_eq!(details.cohort.id, cohort.id);
    }

    let student = create_student_via_api(&router).await;
    let response = AxumTestRequest::post("/api/students/enroll")
        .json(&json!({ "student_id": student.id, "career_id": career.id }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: ErrorResponse = response.json();
    assert_eq!(error_code(&body), ErrorCode::CohortFull);

    let response = AxumTestRequest::get("/api/cohorts").send(router).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let cohorts: Vec<CohortAvailability> = response.json();
    assert_eq!(cohorts[0].available_slots, 0);
}

#[tokio::test]
async fn test_enroll_without_upcoming_cohort_returns_404() {
    let (router, resources) = setup_test_environment().await;
    let career = create_test_career(&resources.database).await.unwrap();
    let student = create_student_via_api(&router).await;

    let response = AxumTestRequest::post("/api/students/enroll")
        .json(&json!({ "studentId": student.id, "careerId": career.id }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = response.json();
    assert_eq!(error_code(&body), ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_duplicate_enrollment_returns_409() {
    let (router, resources) = setup_test_environment().await;
    let career = create_test_career(&resources.database).await.unwrap();
    create_upcoming_cohort(&resources.database, career.id, 7, 5)
        .await
        .unwrap();
    let student = create_student_via_api(&router).await;
    let body = json!({ "studentId": student.id, "careerId": career.id });

    let first = AxumTestRequest::post("/api/students/enroll")
        .json(&body)
        .send(router.clone())
        .await;
    assert_eq!(first.status_code(), StatusCode::CREATED);

    let second = AxumTestRequest::post("/api/students/enroll")
        .json(&body)
        .send(router)
        .await;
    assert_eq!(second.status_code(), StatusCode::CONFLICT);
    let error: ErrorResponse = second.json();
    assert_eq!(error_code(&error), ErrorCode::AlreadyEnrolled);
}

#[tokio::test]
async fn test_enrollment_history_and_cancel() {
    let (router, resources) = setup_test_environment().await;
    let career = create_test_career(&resources.database).await.unwrap();
    create_upcoming_cohort(&resources.database, career.id, 7, 5)
        .await
        .unwrap();
    let student = create_student_via_api(&router).await;

    let enrolled: EnrollmentDetails = AxumTestRequest::post("/api/students/enroll")
        .json(&json!({ "studentId": student.id, "careerId": career.id }))
        .send(router.clone())
        .await
        .json();

    let response = AxumTestRequest::get(&format!("/api/students/{}/enrollments", student.id))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let history: Vec<EnrollmentDetails> = response.json();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].enrollment.id, enrolled.enrollment.id);

    let response = AxumTestRequest::delete(&format!("/api/enrollments/{}", enrolled.enrollment.id))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let cancelled: Value = response.json();
    assert_eq!(cancelled["status"], "CANCELLED");

    let response = AxumTestRequest::delete(&format!("/api/enrollments/{}", Uuid::new_v4()))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_enrollment_sends_email_through_configured_notifier() {
    let notifier = Arc::new(RecordingNotifier::default());
    let resources = create_test_server_resources_with(notifier.clone(), test_config())
        .await
        .unwrap();
    let router = routes::router(Arc::clone(&resources));
    let career = create_test_career(&resources.database).await.unwrap();
    create_upcoming_cohort(&resources.database, career.id, 7, 5)
        .await
        .unwrap();
    let student = create_student_via_api(&router).await;

    let response = AxumTestRequest::post("/api/students/enroll")
        .json(&json!({ "studentId": student.id, "careerId": career.id }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(notifier.sent().len(), 1);
}

// ============================================================================
// Validation and error envelopes
// ============================================================================

#[tokio::test]
async fn test_malformed_path_id_returns_400() {
    let (router, _resources) = setup_test_environment().await;

    let response = AxumTestRequest::get("/api/students/not-a-uuid")
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(error_code(&body), ErrorCode::InvalidFormat);
}

#[tokio::test]
async fn test_unknown_student_returns_404() {
    let (router, _resources) = setup_test_environment().await;

    let response = AxumTestRequest::get(&format!("/api/students/{}", Uuid::new_v4()))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cohort_validation_errors_return_400() {
    let (router, resources) = setup_test_environment().await;
    let career = create_test_career(&resources.database).await.unwrap();
    let start = Utc::now() + Duration::days(10);

    let inverted = AxumTestRequest::post("/api/admin/cohorts")
        .json(&json!({
            "name": "Backwards",
            "careerId": career.id,
            "startDate": start,
            "endDate": start - Duration::days(1),
            "capacity": 10
        }))
        .send(router.clone())
        .await;
    assert_eq!(inverted.status_code(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = inverted.json();
    assert_eq!(error_code(&body), ErrorCode::InvalidInput);

    let no_seats = AxumTestRequest::post("/api/admin/cohorts")
        .json(&json!({
            "name": "Empty",
            "careerId": career.id,
            "startDate": start,
            "endDate": start + Duration::days(30),
            "capacity": 0
        }))
        .send(router.clone())
        .await;
    assert_eq!(no_seats.status_code(), StatusCode::BAD_REQUEST);

    let unknown_career = AxumTestRequest::post("/api/admin/cohorts")
        .json(&json!({
            "name": "Orphan",
            "careerId": Uuid::new_v4(),
            "startDate": start,
            "endDate": start + Duration::days(30),
            "capacity": 5
        }))
        .send(router)
        .await;
    assert_eq!(unknown_career.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_body_returns_invalid_input_envelope() {
    let (router, _resources) = setup_test_environment().await;

    let truncated = AxumTestRequest::post("/api/students/enroll")
        .header("content-type", "application/json")
        .raw_body("{\"studentId\": ")
        .send(router.clone())
        .await;
    assert_eq!(truncated.status_code(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = truncated.json();
    assert_eq!(error_code(&body), ErrorCode::InvalidInput);

    let missing_field = AxumTestRequest::post("/api/careers")
        .json(&json!({ "description": "no title" }))
        .send(router.clone())
        .await;
    assert_eq!(missing_field.status_code(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = missing_field.json();
    assert_eq!(error_code(&body), ErrorCode::InvalidInput);
    assert!(body.error.message.contains("title"));

    let wrong_type = AxumTestRequest::put(&format!("/api/admin/cohorts/{}", Uuid::new_v4()))
        .json(&json!({ "capacity": "lots" }))
        .send(router.clone())
        .await;
    assert_eq!(wrong_type.status_code(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = wrong_type.json();
    assert_eq!(error_code(&body), ErrorCode::InvalidInput);

    let no_content_type = AxumTestRequest::post("/api/users")
        .raw_body("{}")
        .send(router)
        .await;
    assert_eq!(no_content_type.status_code(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = no_content_type.json();
    assert_eq!(error_code(&body), ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_shrinking_cohort_below_live_enrollments_returns_409() {
    let (router, resources) = setup_test_environment().await;
    let career = create_test_career(&resources.database).await.unwrap();
    let cohort = create_upcoming_cohort(&resources.database, career.id, 7, 3)
        .await
        .unwrap();
    for _ in 0..2 {
        let student = create_student_via_api(&router).await;
        let response = AxumTestRequest::post("/api/students/enroll")
            .json(&json!({ "studentId": student.id, "careerId": career.id }))
            .send(router.clone())
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let response = AxumTestRequest::put(&format!("/api/admin/cohorts/{}", cohort.id))
        .json(&json!({ "capacity": 1 }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: ErrorResponse = response.json();
    assert_eq!(error_code(&body), ErrorCode::ResourceConflict);

    let response = AxumTestRequest::get(&format!("/api/admin/cohorts/{}", cohort.id))
        .send(router)
        .await;
    let detail: Value = response.json();
    assert_eq!(detail["capacity"], 3);
    assert_eq!(detail["live_enrollments"], 2);
    assert_eq!(detail["available_slots"], 1);
}

#[tokio::test]
async fn test_cohort_admin_lifecycle() {
    let (router, resources) = setup_test_environment().await;
    let career = create_test_career(&resources.database).await.unwrap();
    let start = Utc::now() + Duration::days(10);

    let response = AxumTestRequest::post("/api/admin/cohorts")
        .json(&json!({
            "name": "Spring Intake",
            "careerId": career.id,
            "startDate": start,
            "endDate": start + Duration::days(60),
            "capacity": 4
        }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let cohort: Cohort = response.json();
    assert_eq!(cohort.status, CohortStatus::Upcoming);

    let response = AxumTestRequest::put(&format!("/api/admin/cohorts/{}", cohort.id))
        .json(&json!({ "capacity": 8, "status": "CANCELLED" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Cohort = response.json();
    assert_eq!(updated.capacity, 8);
    assert_eq!(updated.status, CohortStatus::Cancelled);

    let response = AxumTestRequest::get(&format!("/api/admin/cohorts/{}", cohort.id))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let detail: Value = response.json();
    assert_eq!(detail["available_slots"], 8);
    assert_eq!(detail["name"], "Spring Intake");

    let response = AxumTestRequest::delete(&format!("/api/admin/cohorts/{}", cohort.id))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = AxumTestRequest::get(&format!("/api/admin/cohorts/{}", cohort.id))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_career_title_returns_409() {
    let (router, _resources) = setup_test_environment().await;
    let body = json!({ "title": "Cloud Engineering", "description": "AWS and friends" });

    let first = AxumTestRequest::post("/api/careers")
        .json(&body)
        .send(router.clone())
        .await;
    assert_eq!(first.status_code(), StatusCode::CREATED);
    let career: Career = first.json();
    assert_eq!(career.title, "Cloud Engineering");

    let second = AxumTestRequest::post("/api/careers")
        .json(&body)
        .send(router)
        .await;
    assert_eq!(second.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_career_with_cohorts_cannot_be_deleted() {
    let (router, resources) = setup_test_environment().await;
    let career = create_test_career(&resources.database).await.unwrap();
    create_upcoming_cohort(&resources.database, career.id, 7, 5)
        .await
        .unwrap();

    let response = AxumTestRequest::delete(&format!("/api/careers/{}", career.id))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let empty = create_test_career(&resources.database).await.unwrap();
    let response = AxumTestRequest::delete(&format!("/api/careers/{}", empty.id))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

// ============================================================================
// Mentors
// ============================================================================

#[tokio::test]
async fn test_assign_mentor_route_enforces_limit() {
    let mut config = test_config();
    config.mentor_capacity = 1;
    let resources = create_test_server_resources_with(Arc::new(RecordingNotifier::default()), config)
        .await
        .unwrap();
    let router = routes::router(Arc::clone(&resources));
    let coach = create_test_coach(&resources.database, None).await.unwrap();
    let first = create_test_student(&resources.database).await.unwrap();
    let second = create_test_student(&resources.database).await.unwrap();

    let response = AxumTestRequest::put("/api/students/assign-mentor")
        .json(&json!({ "studentId": first.id, "mentorId": coach.id }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let linked: Student = response.json();
    assert_eq!(linked.coach_id, Some(coach.id));

    let response = AxumTestRequest::put("/api/students/assign-mentor")
        .json(&json!({ "studentId": second.id, "coachId": coach.id }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(error_code(&body), ErrorCode::MentorAtCapacity);

    let response = AxumTestRequest::delete(&format!("/api/students/{}/mentor", first.id))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = AxumTestRequest::get(&format!("/api/coaches/{}", coach.id))
        .send(router)
        .await;
    let profile: CoachProfile = response.json();
    assert_eq!(profile.student_count, 0);
}

#[tokio::test]
async fn test_career_mentors_listing() {
    let (router, resources) = setup_test_environment().await;
    let career = create_test_career(&resources.database).await.unwrap();
    create_test_coach(&resources.database, Some(career.id))
        .await
        .unwrap();
    create_test_coach(&resources.database, None).await.unwrap();

    let response = AxumTestRequest::get(&format!("/api/careers/{}/mentors", career.id))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let mentors: Vec<CoachProfile> = response.json();
    assert_eq!(mentors.len(), 1);

    let response = AxumTestRequest::get(&format!("/api/careers/{}/mentors", Uuid::new_v4()))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_coach_approval_sends_notification() {
    let notifier = Arc::new(RecordingNotifier::default());
    let resources = create_test_server_resources_with(notifier.clone(), test_config())
        .await
        .unwrap();
    let router = routes::router(Arc::clone(&resources));
    let coach = create_test_coach(&resources.database, None).await.unwrap();

    let response = AxumTestRequest::put(&format!("/api/admin/coaches/{}/approval", coach.id))
        .json(&json!({ "approved": false }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let profile: CoachProfile = response.json();
    assert!(!profile.user.approved);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].address, profile.user.email);
    assert!(sent[0].subject.contains("not approved"));
}

// ============================================================================
// Community
// ============================================================================

#[tokio::test]
async fn test_waitlist_routes() {
    let (router, _resources) = setup_test_environment().await;
    let approved = create_student_via_api(&router).await;
    let rejected = create_student_via_api(&router).await;

    let response = AxumTestRequest::get("/api/students/waitlist")
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let waitlist: Vec<StudentProfile> = response.json();
    assert_eq!(waitlist.len(), 2);

    let response = AxumTestRequest::post(&format!(
        "/api/students/waitlist/{}/approve",
        approved.id
    ))
    .send(router.clone())
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let student: Student = response.json();
    assert_eq!(student.status, StudentStatus::Approved);

    let response = AxumTestRequest::post(&format!(
        "/api/students/waitlist/{}/reject",
        rejected.id
    ))
    .send(router.clone())
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = AxumTestRequest::post(&format!(
        "/api/students/waitlist/{}/reject",
        approved.id
    ))
    .send(router.clone())
    .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: ErrorResponse = response.json();
    assert_eq!(error_code(&body), ErrorCode::ResourceConflict);

    let response = AxumTestRequest::post(&format!(
        "/api/students/waitlist/{}/approve",
        Uuid::new_v4()
    ))
    .send(router.clone())
    .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = AxumTestRequest::get("/api/students/waitlist")
        .send(router)
        .await;
    let waitlist: Vec<StudentProfile> = response.json();
    assert!(waitlist.is_empty());
}

#[tokio::test]
async fn test_coach_review_and_rating_routes() {
    let (router, resources) = setup_test_environment().await;
    let coach = create_test_coach(&resources.database, None).await.unwrap();
    let first = create_test_student(&resources.database).await.unwrap();
    let second = create_test_student(&resources.database).await.unwrap();

    let response = AxumTestRequest::get(&format!("/api/coaches/{}/rating", coach.id))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let rating: Value = response.json();
    assert_eq!(rating["average_rating"], Value::Null);
    assert_eq!(rating["review_count"], 0);

    for (student, score) in [(&first, 5), (&second, 4)] {
        let response = AxumTestRequest::post(&format!("/api/coaches/{}/reviews", coach.id))
            .json(&json!({ "studentId": student.id, "rating": score, "comment": "helpful" }))
            .send(router.clone())
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let response = AxumTestRequest::post(&format!("/api/coaches/{}/reviews", coach.id))
        .json(&json!({ "studentId": first.id, "rating": 3 }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = AxumTestRequest::post(&format!("/api/coaches/{}/reviews", coach.id))
        .json(&json!({ "studentId": first.id, "rating": 9 }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = AxumTestRequest::get(&format!("/api/coaches/{}/rating", coach.id))
        .send(router.clone())
        .await;
    let rating: CoachRating = response.json();
    assert_eq!(rating.review_count, 2);
    assert_eq!(rating.average_rating, Some(4.5));

    let response = AxumTestRequest::get(&format!("/api/coaches/{}/reviews?limit=1", coach.id))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let reviews: Vec<ReviewWithStudent> = response.json();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].student_name, "Test User");

    let response = AxumTestRequest::get(&format!("/api/coaches/{}/rating", Uuid::new_v4()))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_and_message_routes() {
    let (router, resources) = setup_test_environment().await;
    let coach = create_test_user(&resources.database, UserRole::Coach)
        .await
        .unwrap();
    let student = create_test_user(&resources.database, UserRole::Student)
        .await
        .unwrap();
    let start = Utc::now() + Duration::days(1);

    let response = AxumTestRequest::post("/api/sessions")
        .json(&json!({
            "title": "Weekly check-in",
            "startTime": start,
            "endTime": start + Duration::hours(1),
            "participantIds": [coach.id, student.id]
        }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let session: SessionDetails = response.json();
    let session_id = session.session.id;
    assert_eq!(session.participant_ids.len(), 2);

    let response = AxumTestRequest::post("/api/sessions")
        .json(&json!({ "startTime": start, "endTime": start - Duration::hours(1) }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = AxumTestRequest::post(&format!("/api/sessions/{session_id}/messages"))
        .json(&json!({ "senderId": student.id, "content": "See you tomorrow" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let message: Message = response.json();

    let response = AxumTestRequest::put(&format!("/api/messages/{}", message.id))
        .json(&json!({ "content": "See you at 10" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let edited: Message = response.json();
    assert!(edited.updated_at.is_some());

    let response = AxumTestRequest::get(&format!("/api/sessions/{session_id}/messages"))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let messages: Vec<Message> = response.json();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "See you at 10");

    let response = AxumTestRequest::put(&format!("/api/sessions/{session_id}"))
        .json(&json!({ "status": "CANCELLED" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "CANCELLED");

    let response = AxumTestRequest::delete(&format!("/api/messages/{}", message.id))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = AxumTestRequest::delete(&format!("/api/sessions/{session_id}"))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = AxumTestRequest::get(&format!("/api/sessions/{session_id}"))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = AxumTestRequest::get(&format!("/api/sessions/{session_id}/messages"))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blog_routes() {
    let (router, _resources) = setup_test_environment().await;

    for title in ["Mentoring 101", "Rust at GOYA"] {
        let response = AxumTestRequest::post("/api/blogs")
            .json(&json!({
                "title": title,
                "description": "Notes from the community",
                "writer": "Kwame Mensah"
            }))
            .send(router.clone())
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let response = AxumTestRequest::post("/api/blogs")
        .json(&json!({ "title": "No body", "writer": "Kwame Mensah" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(error_code(&body), ErrorCode::MissingRequiredField);

    let response = AxumTestRequest::get("/api/blogs?order=desc&page=1&limit=1")
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let posts: Vec<BlogPost> = response.json();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "Rust at GOYA");

    let response = AxumTestRequest::get(&format!("/api/blogs/{}", posts[0].id))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = AxumTestRequest::get("/api/blogs/search?keyword=mentoring")
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let found: Vec<BlogPost> = response.json();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Mentoring 101");

    let response = AxumTestRequest::get("/api/blogs/search?keyword=kubernetes")
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let found: Vec<BlogPost> = response.json();
    assert!(found.is_empty());

    let response = AxumTestRequest::get("/api/blogs/search")
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = AxumTestRequest::delete(&format!("/api/blogs/{}", posts[0].id))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = AxumTestRequest::get(&format!("/api/blogs/{}", posts[0].id))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_query_returns_invalid_input_envelope() {
    let (router, _resources) = setup_test_environment().await;

    for uri in [
        "/api/blogs?page=first",
        "/api/blogs?order=sideways",
        "/api/blogs?page=0",
        "/api/blogs?limit=1000",
    ] {
        let response = AxumTestRequest::get(uri).send(router.clone()).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{uri}");
        let body: ErrorResponse = response.json();
        assert_eq!(error_code(&body), ErrorCode::InvalidInput, "{uri}");
    }
}

// ============================================================================
// Admin
// ============================================================================

#[tokio::test]
async fn test_entity_stats() {
    let (router, resources) = setup_test_environment().await;
    create_test_student(&resources.database).await.unwrap();
    create_test_student(&resources.database).await.unwrap();

    let response = AxumTestRequest::get("/api/admin/stats/students")
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let count: EntityCountResponse = response.json();
    assert_eq!(count.count, 2);

    let response = AxumTestRequest::get("/api/admin/stats")
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let all: Value = response.json();
    assert_eq!(all["students"], 2);
    assert_eq!(all["users"], 2);
    assert_eq!(all["cohorts"], 0);
    assert_eq!(all["blogs"], 0);

    let response = AxumTestRequest::get("/api/admin/stats/passwords")
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_manual_sweep_route() {
    let (router, resources) = setup_test_environment().await;
    let career = create_test_career(&resources.database).await.unwrap();
    let now = Utc::now();
    common::create_test_cohort_with_status(
        &resources.database,
        career.id,
        now - Duration::days(2),
        now + Duration::days(2),
        5,
        Some("UPCOMING"),
    )
    .await
    .unwrap();

    let response = AxumTestRequest::post("/api/admin/sweep")
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["transitioned"], 1);
}

#[tokio::test]
async fn test_server_errors_do_not_leak_details() {
    let (router, resources) = setup_test_environment().await;
    resources.database.close().await;

    let response = AxumTestRequest::get("/api/careers").send(router).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = response.json();
    assert_eq!(error_code(&body), ErrorCode::DatabaseError);
    assert!(!body.error.message.to_lowercase().contains("pool"));
}
