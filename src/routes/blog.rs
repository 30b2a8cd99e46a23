// ABOUTME: Route handlers for publishing, listing, and searching blog posts
// ABOUTME: Listings are paged with ?page=&limit= and ordered with ?order=asc|desc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use goya_core::errors::AppError;
use serde::Deserialize;
use serde_json::json;

use super::{parse_id, ApiJson, ApiQuery, PageQuery};
use crate::context::ServerResources;
use crate::database::{BlogSort, CreateBlogPostRequest};

/// Ordering part of the GET /api/blogs query
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListBlogsQuery {
    /// Publication-date order
    #[serde(default)]
    pub order: BlogSort,
}

/// Keyword part of the GET /api/blogs/search query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchBlogsQuery {
    /// Text to look for in titles and descriptions
    #[serde(default)]
    pub keyword: String,
}

/// Blog routes
pub struct BlogRoutes;

impl BlogRoutes {
    /// Create all blog routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/blogs", post(Self::handle_create).get(Self::handle_list))
            .route("/api/blogs/search", get(Self::handle_search))
            .route(
                "/api/blogs/:id",
                get(Self::handle_get).delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle POST /api/blogs
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(body): ApiJson<CreateBlogPostRequest>,
    ) -> Result<Response, AppError> {
        let post = resources.database.blog().create(&body).await?;
        Ok((StatusCode::CREATED, Json(post)).into_response())
    }

    /// Handle GET /api/blogs
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        ApiQuery(query): ApiQuery<ListBlogsQuery>,
        ApiQuery(paging): ApiQuery<PageQuery>,
    ) -> Result<Response, AppError> {
        let posts = resources
            .database
            .blog()
            .list(query.order, paging.page()?)
            .await?;
        Ok((StatusCode::OK, Json(posts)).into_response())
    }

    /// Handle GET /api/blogs/search
    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        ApiQuery(query): ApiQuery<SearchBlogsQuery>,
        ApiQuery(paging): ApiQuery<PageQuery>,
    ) -> Result<Response, AppError> {
        let posts = resources
            .database
            .blog()
            .search(&query.keyword, paging.page()?)
            .await?;
        Ok((StatusCode::OK, Json(posts)).into_response())
    }

    /// Handle GET /api/blogs/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let post_id = parse_id(&id, "blog post")?;
        let post = resources
            .database
            .blog()
            .get(post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Blog post {post_id} not found")))?;
        Ok((StatusCode::OK, Json(post)).into_response())
    }

    /// Handle DELETE /api/blogs/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let post_id = parse_id(&id, "blog post")?;
        if !resources.database.blog().delete(post_id).await? {
            return Err(AppError::not_found(format!("Blog post {post_id} not found")));
        }
        Ok((StatusCode::OK, Json(json!({ "deleted": true, "id": post_id }))).into_response())
    }
}
