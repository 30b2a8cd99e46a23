// ABOUTME: Liveness endpoint reporting process and database availability
// ABOUTME: Returns 503 when the database ping fails
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::context::ServerResources;

/// Health check payload
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`
    pub status: String,
    /// Database reachability
    pub database: String,
    /// Crate version
    pub version: String,
}

/// Health routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    /// Handle GET /health
    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Response {
        let (status_code, status, database) = match resources.database.ping().await {
            Ok(()) => (StatusCode::OK, "ok", "ok"),
            Err(e) => {
                warn!(error = %e, "health check database ping failed");
                (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
            }
        };

        let body = HealthResponse {
            status: status.to_owned(),
            database: database.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        };
        (status_code, Json(body)).into_response()
    }
}
