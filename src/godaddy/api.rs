// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! GoDaddy domains API client.
//!
//! Only the record-set replace endpoint is used:
//! `PUT /v1/domains/{domain}/records/TXT/{name}` with a JSON array body. The
//! registrar replaces every TXT record at that name with the submitted set,
//! which makes repeated submissions idempotent.

use super::types::{Credentials, DnsRecord};
use crate::constants::{TXT_RECORD_TYPE, USER_AGENT};
use crate::errors::SolverError;
use crate::metrics;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as HttpClient, StatusCode};
use secrecy::ExposeSecret;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Client for one registrar environment, built per challenge call.
pub struct RecordsClient {
    http: HttpClient,
    base_url: String,
    credentials: Credentials,
}

impl RecordsClient {
    /// Build a client against `base_url` with a fixed request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Transport`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, SolverError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = HttpClient::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| SolverError::Transport {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// URL of the TXT record set `record_name` under `domain`.
    #[must_use]
    pub fn records_url(&self, domain: &str, record_name: &str) -> String {
        format!(
            "{}/v1/domains/{domain}/records/{TXT_RECORD_TYPE}/{record_name}",
            self.base_url
        )
    }

    /// Replace the TXT record set at `record_name` under `domain` with `records`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::RegistrarApi`] for any status other than 200,
    /// including the response body, and [`SolverError::Transport`] if no
    /// response was received.
    pub async fn update_records(
        &self,
        domain: &str,
        record_name: &str,
        records: &[DnsRecord],
    ) -> Result<(), SolverError> {
        let body = serde_json::to_string(records).map_err(SolverError::Encode)?;
        let url = self.records_url(domain, record_name);

        debug!(
            method = "PUT",
            url = %url,
            body = %body,
            "HTTP API request to registrar"
        );

        let start = Instant::now();
        let response = self
            .http
            .put(&url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.authorization())
            .body(body.clone())
            .send()
            .await
            .map_err(|source| {
                metrics::record_registrar_request("error", start.elapsed());
                error!(url = %url, error = %source, "Failed to reach registrar");
                SolverError::Transport {
                    url: url.clone(),
                    source,
                }
            })?;

        let status = response.status();
        metrics::record_registrar_request(status.as_str(), start.elapsed());

        if status != StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                url = %url,
                status = %status,
                error = %error_text,
                "Registrar rejected record update"
            );
            return Err(SolverError::RegistrarApi {
                payload: body,
                status: status.as_u16(),
                body: error_text,
            });
        }

        info!(
            domain = %domain,
            record = %record_name,
            elapsed = ?start.elapsed(),
            "Registrar record set replaced"
        );
        Ok(())
    }

    /// `sso-key {key}:{secret}` header value.
    fn authorization(&self) -> String {
        format!(
            "sso-key {}:{}",
            self.credentials.api_key.expose_secret(),
            self.credentials.api_secret.expose_secret()
        )
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
