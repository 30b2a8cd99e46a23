// ABOUTME: Notifier that posts messages as JSON to an HTTP mail relay
// ABOUTME: Non-2xx responses and transport failures map to ExternalServiceError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::time::Duration;

use async_trait::async_trait;
use goya_core::errors::{AppError, AppResult};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::Notifier;

const SERVICE: &str = "mail relay";

/// Payload accepted by the relay
#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
}

/// HTTP mail relay client
#[derive(Debug, Clone)]
pub struct HttpMailRelay {
    client: Client,
    endpoint: String,
    from_address: String,
}

impl HttpMailRelay {
    /// Create a relay client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(endpoint: String, from_address: String, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build mail relay client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            from_address,
        })
    }
}

#[async_trait]
impl Notifier for HttpMailRelay {
    async fn send(
        &self,
        address: &str,
        subject: &str,
        text_body: Option<&str>,
        html_body: Option<&str>,
    ) -> AppResult<()> {
        if text_body.is_none() && html_body.is_none() {
            return Err(AppError::invalid_input("Notification has no body"));
        }

        let payload = RelayMessage {
            from: &self.from_address,
            to: address,
            subject,
            text: text_body,
            html: html_body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(
                SERVICE,
                format!("relay responded with {status}"),
            ));
        }

        debug!(to = %address, "notification handed to mail relay");
        Ok(())
    }
}
