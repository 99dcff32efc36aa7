// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wire types for the cert-manager external solver webhook protocol.
//!
//! cert-manager submits a [`ChallengePayload`] (`acme.cert-manager.io/v1alpha1`)
//! containing a [`ChallengeRequest`] to the solver resource registered under
//! the webhook's API group, and expects the same kind back carrying a
//! [`ChallengeResponse`].
//!
//! # Example
//!
//! ```rust
//! use godaddy_webhook::challenge::{ChallengeAction, ChallengePayload};
//!
//! let payload: ChallengePayload = serde_json::from_str(r#"{
//!     "apiVersion": "acme.cert-manager.io/v1alpha1",
//!     "kind": "ChallengePayload",
//!     "request": {
//!         "uid": "1234",
//!         "action": "Present",
//!         "type": "dns-01",
//!         "dnsName": "example.com",
//!         "key": "token",
//!         "resourceNamespace": "default",
//!         "resolvedFQDN": "_acme-challenge.example.com.",
//!         "resolvedZone": "example.com."
//!     }
//! }"#).unwrap();
//!
//! let request = payload.request.unwrap();
//! assert_eq!(request.action, ChallengeAction::Present);
//! assert!(request.config.is_none());
//! ```

use crate::constants::{CHALLENGE_PAYLOAD_API_VERSION, CHALLENGE_PAYLOAD_KIND};
use crate::errors::SolverError;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Status;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle event a challenge request asks the solver to perform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeAction {
    /// Publish the challenge record
    #[default]
    Present,
    /// Retract the challenge record
    CleanUp,
}

impl fmt::Display for ChallengeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => f.write_str("Present"),
            Self::CleanUp => f.write_str("CleanUp"),
        }
    }
}

/// One DNS-01 challenge instance sent by cert-manager.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Identifier echoed back in the response
    #[serde(default)]
    pub uid: String,

    /// `Present` or `CleanUp`
    pub action: ChallengeAction,

    /// Challenge type, always `dns-01` for this webhook
    #[serde(default, rename = "type")]
    pub challenge_type: String,

    /// Name being validated, e.g. `example.com`
    #[serde(default)]
    pub dns_name: String,

    /// Token value to publish in the TXT record
    #[serde(default)]
    pub key: String,

    /// Namespace of the Issuer/Challenge; secrets are read from here
    #[serde(default)]
    pub resource_namespace: String,

    /// Fully-qualified record name, e.g. `_acme-challenge.example.com.`
    #[serde(default, rename = "resolvedFQDN")]
    pub resolved_fqdn: String,

    /// Zone cert-manager resolved for the record, e.g. `example.com.`
    #[serde(default)]
    pub resolved_zone: String,

    /// Whether ambient credentials may be used (unused by this webhook)
    #[serde(default)]
    pub allow_ambient_credentials: bool,

    /// Opaque per-issuer solver configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

/// Result of handling a [`ChallengeRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    /// `uid` of the request this answers
    #[serde(default)]
    pub uid: String,

    /// Whether the action completed
    #[serde(default)]
    pub success: bool,

    /// Failure details when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl ChallengeResponse {
    /// Successful response for `uid`.
    #[must_use]
    pub fn success(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            success: true,
            status: None,
        }
    }

    /// Failed response for `uid` carrying the error text and its reason.
    #[must_use]
    pub fn failure(uid: impl Into<String>, err: &SolverError) -> Self {
        Self {
            uid: uid.into(),
            success: false,
            status: Some(Status {
                status: Some("Failure".to_string()),
                message: Some(err.to_string()),
                reason: Some(err.kind().reason().to_string()),
                ..Status::default()
            }),
        }
    }
}

/// Envelope exchanged with cert-manager in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengePayload {
    /// Always `acme.cert-manager.io/v1alpha1`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Always `ChallengePayload`
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Present on submissions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ChallengeRequest>,

    /// Present on replies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ChallengeResponse>,
}

fn default_api_version() -> String {
    CHALLENGE_PAYLOAD_API_VERSION.to_string()
}

fn default_kind() -> String {
    CHALLENGE_PAYLOAD_KIND.to_string()
}

impl ChallengePayload {
    /// Wrap a response for sending back to cert-manager.
    #[must_use]
    pub fn reply(response: ChallengeResponse) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            request: None,
            response: Some(response),
        }
    }
}

#[cfg(test)]
#[path = "challenge_tests.rs"]
mod challenge_tests;
