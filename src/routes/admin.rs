// ABOUTME: Admin routes for entity statistics and on-demand cohort status sweeps
// ABOUTME: Entity kinds are parsed at the boundary; unknown kinds return 400
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use goya_core::errors::AppError;
use goya_core::models::EntityKind;
use serde::{Deserialize, Serialize};

use crate::context::ServerResources;

/// Count of one entity kind
#[derive(Debug, Serialize, Deserialize)]
pub struct EntityCountResponse {
    /// Entity kind
    pub kind: EntityKind,
    /// Number of rows
    pub count: u64,
}

/// Result of a manual sweep
#[derive(Debug, Serialize, Deserialize)]
pub struct SweepResponse {
    /// Cohorts whose status changed
    pub transitioned: u64,
}

/// Admin routes
pub struct AdminRoutes;

impl AdminRoutes {
    /// Create all admin routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/admin/stats", get(Self::handle_all_stats))
            .route("/api/admin/stats/:kind", get(Self::handle_stats))
            .route("/api/admin/sweep", post(Self::handle_sweep))
            .with_state(resources)
    }

    /// Handle GET /api/admin/stats/:kind
    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        Path(kind): Path<String>,
    ) -> Result<Response, AppError> {
        let kind: EntityKind = kind.parse()?;
        let count = resources.database.count_entities(kind).await?;
        Ok((StatusCode::OK, Json(EntityCountResponse { kind, count })).into_response())
    }

    /// Handle GET /api/admin/stats
    async fn handle_all_stats(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let mut counts = BTreeMap::new();
        for kind in EntityKind::ALL {
            counts.insert(kind.as_str(), resources.database.count_entities(kind).await?);
        }
        Ok((StatusCode::OK, Json(counts)).into_response())
    }

    /// Handle POST /api/admin/sweep
    async fn handle_sweep(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let transitioned = resources.sweeper.sweep(Utc::now()).await?;
        Ok((StatusCode::OK, Json(SweepResponse { transitioned })).into_response())
    }
}
