// ABOUTME: Outbound notification collaborator used after enrollment and coach approval
// ABOUTME: Defines the Notifier trait plus relay-backed and log-only implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

//! Notifications
//!
//! Delivery is best-effort: callers log failures and never roll back the
//! operation that triggered the message.

/// HTTP mail relay client
pub mod relay;
/// Message bodies for platform events
pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use goya_core::errors::AppResult;
use tracing::info;

pub use relay::HttpMailRelay;
pub use templates::NotificationMessage;

use crate::config::environment::MailConfig;

/// Sends a message to a single address
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a message; at least one of `text_body` and `html_body` is set
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be handed to the transport
    async fn send(
        &self,
        address: &str,
        subject: &str,
        text_body: Option<&str>,
        html_body: Option<&str>,
    ) -> AppResult<()>;

    /// Deliver a prepared message
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be handed to the transport
    async fn send_message(&self, address: &str, message: &NotificationMessage) -> AppResult<()> {
        self.send(
            address,
            &message.subject,
            Some(message.text.as_str()),
            Some(message.html.as_str()),
        )
        .await
    }
}

/// Notifier that only writes a log line
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        address: &str,
        subject: &str,
        text_body: Option<&str>,
        _html_body: Option<&str>,
    ) -> AppResult<()> {
        info!(
            to = %address,
            subject = %subject,
            text_len = text_body.map_or(0, str::len),
            "notification (log only)"
        );
        Ok(())
    }
}

/// Build the notifier for the configured transport
///
/// # Errors
///
/// Returns an error if the relay client cannot be constructed
pub fn from_config(config: &MailConfig) -> AppResult<Arc<dyn Notifier>> {
    match &config.relay_url {
        Some(url) => {
            info!(relay = %url, "mail relay notifier enabled");
            Ok(Arc::new(HttpMailRelay::new(
                url.clone(),
                config.from_address.clone(),
                config.timeout,
            )?))
        }
        None => {
            info!("no mail relay configured; notifications are logged only");
            Ok(Arc::new(LogNotifier))
        }
    }
}
