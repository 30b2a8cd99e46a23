// ABOUTME: Shared server resources injected into every route handler
// ABOUTME: Built once at startup from the database pool, configuration, and notifier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::database::Database;
use crate::enrollment::EnrollmentManager;
use crate::lifecycle::CohortSweeper;
use crate::mentorship::MentorAssignment;
use crate::notifications::Notifier;

/// Dependencies shared by handlers and background tasks
#[derive(Clone)]
pub struct ServerResources {
    /// Connection pool and per-entity managers
    pub database: Database,
    /// Effective configuration
    pub config: Arc<ServerConfig>,
    /// Outbound notifications
    pub notifier: Arc<dyn Notifier>,
    /// Enrollment workflow
    pub enrollment: EnrollmentManager,
    /// Mentor matching
    pub mentorship: MentorAssignment,
    /// Cohort status sweeper
    pub sweeper: CohortSweeper,
}

impl ServerResources {
    /// Wire the domain services over a shared pool
    #[must_use]
    pub fn new(database: Database, config: ServerConfig, notifier: Arc<dyn Notifier>) -> Self {
        let enrollment = EnrollmentManager::new(database.clone(), Arc::clone(&notifier));
        let mentorship = MentorAssignment::new(database.clone(), config.mentor_capacity);
        let sweeper = CohortSweeper::new(database.clone());

        Self {
            database,
            config: Arc::new(config),
            notifier,
            enrollment,
            mentorship,
            sweeper,
        }
    }
}
