// ABOUTME: Route handlers for student records and mentor assignment
// ABOUTME: Mentor capacity violations surface as 400 MENTOR_AT_CAPACITY
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use goya_core::errors::AppError;
use goya_core::models::StudentStatus;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{parse_id, ApiJson};
use crate::context::ServerResources;
use crate::database::CreateStudentRequest;

/// Body of PUT /api/students/assign-mentor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignMentorRequest {
    /// Student to link
    #[serde(alias = "studentId")]
    pub student_id: Uuid,
    /// Coach to link to
    #[serde(alias = "coachId", alias = "mentorId", alias = "mentor_id")]
    pub coach_id: Uuid,
}

/// Student routes
pub struct StudentRoutes;

impl StudentRoutes {
    /// Create all student routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/students", post(Self::handle_create))
            .route("/api/students", get(Self::handle_list))
            .route("/api/students/assign-mentor", put(Self::handle_assign_mentor))
            .route("/api/students/waitlist", get(Self::handle_list_waitlist))
            .route(
                "/api/students/waitlist/:id/approve",
                post(Self::handle_approve),
            )
            .route("/api/students/waitlist/:id/reject", post(Self::handle_reject))
            .route("/api/students/:id", get(Self::handle_get))
            .route("/api/students/:id", delete(Self::handle_delete))
            .route("/api/students/:id/mentor", delete(Self::handle_unassign_mentor))
            .with_state(resources)
    }

    /// Handle POST /api/students
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(body): ApiJson<CreateStudentRequest>,
    ) -> Result<Response, AppError> {
        let student = resources.database.students().create(&body).await?;
        Ok((StatusCode::CREATED, Json(student)).into_response())
    }

    /// Handle GET /api/students
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let students = resources.database.students().list().await?;
        Ok((StatusCode::OK, Json(students)).into_response())
    }

    /// Handle GET /api/students/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let student_id = parse_id(&id, "student")?;
        let profile = resources
            .database
            .students()
            .get_profile(student_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Student {student_id} not found")))?;
        Ok((StatusCode::OK, Json(profile)).into_response())
    }

    /// Handle DELETE /api/students/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let student_id = parse_id(&id, "student")?;
        if !resources.database.students().delete(student_id).await? {
            return Err(AppError::not_found(format!("Student {student_id} not found")));
        }
        Ok((StatusCode::OK, Json(json!({ "deleted": true, "id": student_id }))).into_response())
    }

    /// Handle PUT /api/students/assign-mentor
    async fn handle_assign_mentor(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(body): ApiJson<AssignMentorRequest>,
    ) -> Result<Response, AppError> {
        let student = resources
            .mentorship
            .assign_mentor(body.student_id, body.coach_id)
            .await?;
        Ok((StatusCode::OK, Json(student)).into_response())
    }

    /// Handle DELETE /api/students/:id/mentor
    async fn handle_unassign_mentor(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let student_id = parse_id(&id, "student")?;
        let student = resources.mentorship.unassign_mentor(student_id).await?;
        Ok((StatusCode::OK, Json(student)).into_response())
    }

    /// Handle GET /api/students/waitlist
    async fn handle_list_waitlist(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let students = resources.database.students().list_waitlist().await?;
        Ok((StatusCode::OK, Json(students)).into_response())
    }

    /// Handle POST /api/students/waitlist/:id/approve
    async fn handle_approve(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::resolve(&resources, &id, StudentStatus::Approved).await
    }

    /// Handle POST /api/students/waitlist/:id/reject
    async fn handle_reject(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::resolve(&resources, &id, StudentStatus::Rejected).await
    }

    async fn resolve(
        resources: &ServerResources,
        id: &str,
        decision: StudentStatus,
    ) -> Result<Response, AppError> {
        let student_id = parse_id(id, "student")?;
        let student = resources
            .database
            .students()
            .resolve_waitlist(student_id, decision)
            .await?;
        info!(student_id = %student_id, status = %decision, "waitlist entry resolved");
        Ok((StatusCode::OK, Json(student)).into_response())
    }
}
