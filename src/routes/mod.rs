// ABOUTME: Route module organization for the GOYA HTTP API
// ABOUTME: Assembles per-domain routers and the tracing/request-id middleware stack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

//! Route module for the GOYA server
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the domain services in [`ServerResources`].

/// Admin statistics and maintenance routes
pub mod admin;
/// Blog post routes
pub mod blog;
/// Career reference data routes
pub mod careers;
/// Coach (mentor) routes
pub mod coaches;
/// Cohort administration routes
pub mod cohorts;
/// Enrollment workflow routes
pub mod enrollment;
/// Liveness routes
pub mod health;
/// Mentoring session and chat message routes
pub mod sessions;
/// Student record and mentor assignment routes
pub mod students;
/// User account routes
pub mod users;

pub use admin::AdminRoutes;
pub use blog::BlogRoutes;
pub use careers::CareerRoutes;
pub use coaches::CoachRoutes;
pub use cohorts::CohortAdminRoutes;
pub use enrollment::EnrollmentRoutes;
pub use health::HealthRoutes;
pub use sessions::SessionRoutes;
pub use students::StudentRoutes;
pub use users::UserRoutes;

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::http::{HeaderName, Request};
use axum::{Json, Router};
use goya_core::errors::{AppError, AppResult, ErrorCode};
use serde::Deserialize;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info_span;
use uuid::Uuid;

use crate::context::ServerResources;
use crate::database::{Page, DEFAULT_PAGE_SIZE};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the complete application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(EnrollmentRoutes::routes(Arc::clone(&resources)))
        .merge(StudentRoutes::routes(Arc::clone(&resources)))
        .merge(CareerRoutes::routes(Arc::clone(&resources)))
        .merge(CohortAdminRoutes::routes(Arc::clone(&resources)))
        .merge(UserRoutes::routes(Arc::clone(&resources)))
        .merge(CoachRoutes::routes(Arc::clone(&resources)))
        .merge(SessionRoutes::routes(Arc::clone(&resources)))
        .merge(BlogRoutes::routes(Arc::clone(&resources)))
        .merge(AdminRoutes::routes(resources))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// JSON request body whose rejections render as the `INVALID_INPUT` envelope
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string whose rejections render as the `INVALID_INPUT` envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// `?page=&limit=` parameters of paged listings
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Rows per page
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Resolve to a [`Page`], defaulting to the first page of ten
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for page 0 or an out-of-range limit
    pub fn page(self) -> AppResult<Page> {
        Page::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

/// Parse an identifier taken from a path segment or body
///
/// # Errors
///
/// Returns `INVALID_FORMAT` if the value is not a UUID
pub fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        AppError::new(ErrorCode::InvalidFormat, format!("Invalid {what} id '{raw}'"))
    })
}
