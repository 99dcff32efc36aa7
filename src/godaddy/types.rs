// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Configuration and record types for the GoDaddy solver.

use crate::constants::{CLEANUP_SENTINEL, TXT_RECORD_TYPE};
use crate::errors::SolverError;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Reference to one key of a Secret in the challenge's namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKeySelector {
    /// Secret name
    #[serde(default)]
    pub name: String,
    /// Key within the secret's data
    #[serde(default)]
    pub key: String,
}

/// Per-issuer solver configuration.
///
/// Set by users in `issuer.spec.acme.solvers[].dns01.webhook.config`:
///
/// ```yaml
/// config:
///   apiKeyRef:
///     name: godaddy-api-key
///     key: key
///   apiSecretRef:
///     name: godaddy-api-key
///     key: secret
///   production: true
///   ttl: 600
/// ```
///
/// Credentials are only ever referenced, never embedded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GodaddyDnsProviderConfig {
    /// Secret holding the API key
    pub api_key_ref: SecretKeySelector,

    /// Secret holding the API secret
    pub api_secret_ref: SecretKeySelector,

    /// Use the production API instead of the OTE test environment
    pub production: bool,

    /// TTL of the challenge TXT record; omitted when zero
    pub ttl: u32,

    /// Accepted for compatibility; registrar requests always time out after 30 s
    pub timeout: u64,

    /// Accepted for compatibility; propagation is checked by cert-manager
    pub propagation_timeout: u64,

    /// Accepted for compatibility; propagation is checked by cert-manager
    pub polling_interval: u64,

    /// Accepted for compatibility
    pub sequence_interval: u64,
}

impl GodaddyDnsProviderConfig {
    /// Both secret references must name a secret.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidConfig`] naming the first empty reference.
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.api_key_ref.name.is_empty() {
            return Err(SolverError::InvalidConfig(
                "apiKeyRef.name must reference a Kubernetes Secret".to_string(),
            ));
        }
        if self.api_secret_ref.name.is_empty() {
            return Err(SolverError::InvalidConfig(
                "apiSecretRef.name must reference a Kubernetes Secret".to_string(),
            ));
        }
        Ok(())
    }

    /// TTL to send, if any.
    #[must_use]
    pub fn record_ttl(&self) -> Option<u32> {
        (self.ttl > 0).then_some(self.ttl)
    }
}

/// Decode the opaque solver configuration of a challenge.
///
/// A missing or `null` configuration decodes to the default configuration.
///
/// # Errors
///
/// Returns [`SolverError::ConfigDecode`] if the JSON does not match
/// [`GodaddyDnsProviderConfig`].
pub fn load_config(
    config: Option<&serde_json::Value>,
) -> Result<GodaddyDnsProviderConfig, SolverError> {
    match config {
        None | Some(serde_json::Value::Null) => Ok(GodaddyDnsProviderConfig::default()),
        Some(value) => {
            GodaddyDnsProviderConfig::deserialize(value).map_err(SolverError::ConfigDecode)
        }
    }
}

/// Resolved registrar API credentials.
///
/// Held only for the duration of one call.
pub struct Credentials {
    pub api_key: SecretString,
    pub api_secret: SecretString,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// One record in a GoDaddy record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl DnsRecord {
    /// TXT record publishing a challenge token.
    #[must_use]
    pub fn challenge(name: &str, token: &str, ttl: Option<u32>) -> Self {
        Self {
            record_type: TXT_RECORD_TYPE.to_string(),
            name: name.to_string(),
            data: token.to_string(),
            priority: None,
            ttl,
        }
    }

    /// TXT record neutralizing a challenge during cleanup.
    #[must_use]
    pub fn cleared(name: &str) -> Self {
        Self {
            record_type: TXT_RECORD_TYPE.to_string(),
            name: name.to_string(),
            data: CLEANUP_SENTINEL.to_string(),
            priority: None,
            ttl: None,
        }
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
