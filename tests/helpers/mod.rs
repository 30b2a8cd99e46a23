// ABOUTME: Test helper modules shared by route integration tests
// ABOUTME: Re-exports the in-process axum request builder
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

pub mod axum_test;
