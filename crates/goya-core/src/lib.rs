// ABOUTME: Core types shared across the GOYA mentorship server workspace
// ABOUTME: Exposes domain models and the unified error type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

#![deny(unsafe_code)]

//! # GOYA Core
//!
//! Domain models (careers, cohorts, students, coaches, enrollments) and the
//! [`errors::AppError`] type used by every layer of the server.

/// Unified error handling
pub mod errors;

/// Domain models
pub mod models;
