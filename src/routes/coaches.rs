// ABOUTME: Route handlers for coach (mentor) records and admin approval
// ABOUTME: Approval decisions notify the coach by email on a best-effort basis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

//! Coaches routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use goya_core::errors::AppError;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::{parse_id, ApiJson, ApiQuery, PageQuery};
use crate::context::ServerResources;
use crate::database::{CreateCoachRequest, SubmitReviewRequest};
use crate::notifications::templates;

/// Body of PUT /api/admin/coaches/:id/approval
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// `true` approves, `false` rejects
    pub approved: bool,
}

/// Coach routes
pub struct CoachRoutes;

impl CoachRoutes {
    /// Create all coach routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/coaches", post(Self::handle_create))
            .route("/api/coaches", get(Self::handle_list))
            .route("/api/coaches/:id", get(Self::handle_get))
            .route("/api/coaches/:id/reviews", post(Self::handle_submit_review))
            .route("/api/coaches/:id/reviews", get(Self::handle_list_reviews))
            .route("/api/coaches/:id/rating", get(Self::handle_rating))
            .route(
                "/api/admin/coaches/:id/approval",
                put(Self::handle_set_approval),
            )
            .with_state(resources)
    }

    /// Handle POST /api/coaches
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(body): ApiJson<CreateCoachRequest>,
    ) -> Result<Response, AppError> {
        let coach = resources.database.coaches().create(&body).await?;
        Ok((StatusCode::CREATED, Json(coach)).into_response())
    }

    /// Handle GET /api/coaches
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let coaches = resources.database.coaches().list().await?;
        Ok((StatusCode::OK, Json(coaches)).into_response())
    }

    /// Handle GET /api/coaches/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let coach_id = parse_id(&id, "coach")?;
        let coach = resources
            .database
            .coaches()
            .get_profile(coach_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Coach {coach_id} not found")))?;
        Ok((StatusCode::OK, Json(coach)).into_response())
    }

    /// Handle PUT /api/admin/coaches/:id/approval
    async fn handle_set_approval(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        ApiJson(body): ApiJson<ApprovalRequest>,
    ) -> Result<Response, AppError> {
        let coach_id = parse_id(&id, "coach")?;
        let coaches = resources.database.coaches();
        let coach = coaches
            .get(coach_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Coach {coach_id} not found")))?;

        resources
            .database
            .users()
            .set_approved(coach.user_id, body.approved)
            .await?;
        info!(coach_id = %coach_id, approved = body.approved, "coach approval updated");

        let profile = coaches
            .get_profile(coach_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Coach {coach_id} not found")))?;

        let message = if body.approved {
            templates::mentor_approved(&profile.user)
        } else {
            templates::mentor_rejected(&profile.user)
        };
        if let Err(e) = resources
            .notifier
            .send_message(&profile.user.email, &message)
            .await
        {
            warn!(coach_id = %coach_id, error = %e, "approval notification could not be sent");
        }

        Ok((StatusCode::OK, Json(profile)).into_response())
    }

    /// Handle POST /api/coaches/:id/reviews
    async fn handle_submit_review(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        ApiJson(body): ApiJson<SubmitReviewRequest>,
    ) -> Result<Response, AppError> {
        let coach_id = parse_id(&id, "coach")?;
        let review = resources.database.reviews().submit(coach_id, &body).await?;
        info!(
            coach_id = %coach_id,
            student_id = %review.student_id,
            rating = review.rating,
            "coach review submitted"
        );
        Ok((StatusCode::CREATED, Json(review)).into_response())
    }

    /// Handle GET /api/coaches/:id/reviews
    async fn handle_list_reviews(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        ApiQuery(query): ApiQuery<PageQuery>,
    ) -> Result<Response, AppError> {
        let coach_id = Self::existing_coach(&resources, &id).await?;
        let reviews = resources
            .database
            .reviews()
            .list_for_coach(coach_id, query.page()?)
            .await?;
        Ok((StatusCode::OK, Json(reviews)).into_response())
    }

    /// Handle GET /api/coaches/:id/rating
    async fn handle_rating(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let coach_id = Self::existing_coach(&resources, &id).await?;
        let rating = resources.database.reviews().rating_for_coach(coach_id).await?;
        Ok((StatusCode::OK, Json(rating)).into_response())
    }

    async fn existing_coach(resources: &ServerResources, id: &str) -> Result<Uuid, AppError> {
        let coach_id = parse_id(id, "coach")?;
        if resources.database.coaches().get(coach_id).await?.is_none() {
            return Err(AppError::not_found(format!("Coach {coach_id} not found")));
        }
        Ok(coach_id)
    }
}
