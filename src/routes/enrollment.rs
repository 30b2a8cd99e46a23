// ABOUTME: Route handlers for cohort enrollment, enrollment history, and cohort availability
// ABOUTME: Thin wrappers over EnrollmentManager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

//! Enrollment routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use goya_core::errors::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{parse_id, ApiJson};
use crate::context::ServerResources;

/// Body of POST /api/students/enroll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollRequest {
    /// Enrolling student
    #[serde(alias = "studentId")]
    pub student_id: Uuid,
    /// Career to enroll into
    #[serde(alias = "careerId")]
    pub career_id: Uuid,
}

/// Enrollment routes
pub struct EnrollmentRoutes;

impl EnrollmentRoutes {
    /// Create all enrollment routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/students/enroll", post(Self::handle_enroll))
            .route(
                "/api/students/:id/enrollments",
                get(Self::handle_list_enrollments),
            )
            .route("/api/enrollments/:id", delete(Self::handle_cancel))
            .route("/api/cohorts", get(Self::handle_list_cohorts))
            .with_state(resources)
    }

    /// Handle POST /api/students/enroll
    async fn handle_enroll(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(body): ApiJson<EnrollRequest>,
    ) -> Result<Response, AppError> {
        let details = resources
            .enrollment
            .enroll(body.student_id, body.career_id)
            .await?;
        Ok((StatusCode::CREATED, Json(details)).into_response())
    }

    /// Handle GET /api/students/:id/enrollments
    async fn handle_list_enrollments(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let student_id = parse_id(&id, "student")?;
        let enrollments = resources.enrollment.list_enrollments(student_id).await?;
        Ok((StatusCode::OK, Json(enrollments)).into_response())
    }

    /// Handle DELETE /api/enrollments/:id
    async fn handle_cancel(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let enrollment_id = parse_id(&id, "enrollment")?;
        let enrollment = resources.enrollment.cancel_enrollment(enrollment_id).await?;
        Ok((StatusCode::OK, Json(enrollment)).into_response())
    }

    /// Handle GET /api/cohorts
    async fn handle_list_cohorts(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let cohorts = resources.enrollment.list_cohorts().await?;
        Ok((StatusCode::OK, Json(cohorts)).into_response())
    }
}
