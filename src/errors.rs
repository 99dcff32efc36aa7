// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for challenge solving.
//!
//! Every failure a solver can hit while presenting or cleaning up a challenge
//! is a [`SolverError`]. Errors are returned synchronously to the webhook host,
//! which reports them back to cert-manager as the challenge failure reason.
//! Nothing here is retried internally.

use crate::constants::{
    REASON_CONFIGURATION_ERROR, REASON_CREDENTIALS_UNRESOLVED, REASON_REGISTRAR_API_ERROR,
    REASON_REGISTRAR_UNREACHABLE, REASON_ZONE_NOT_FOUND,
};
use thiserror::Error;

/// Broad classification of a [`SolverError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid solver configuration, or an uninitialized solver
    Configuration,
    /// A referenced secret or key could not be resolved
    Credentials,
    /// No authoritative zone could be discovered
    ZoneDiscovery,
    /// The registrar answered with a non-200 status
    RegistrarApi,
    /// The registrar could not be reached
    Transport,
}

impl ErrorKind {
    /// CamelCase reason reported in webhook failure responses.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::Configuration => REASON_CONFIGURATION_ERROR,
            Self::Credentials => REASON_CREDENTIALS_UNRESOLVED,
            Self::ZoneDiscovery => REASON_ZONE_NOT_FOUND,
            Self::RegistrarApi => REASON_REGISTRAR_API_ERROR,
            Self::Transport => REASON_REGISTRAR_UNREACHABLE,
        }
    }
}

/// Errors that can occur while solving a DNS-01 challenge.
#[derive(Error, Debug)]
pub enum SolverError {
    /// The opaque per-issuer configuration is not valid JSON for this solver
    #[error("error decoding solver config: {0}")]
    ConfigDecode(#[source] serde_json::Error),

    /// The decoded configuration is missing required fields
    #[error("invalid solver config: {0}")]
    InvalidConfig(String),

    /// `present`/`clean_up` was called before `initialize`
    #[error("solver '{0}' has not been initialized")]
    NotInitialized(String),

    /// The credential store client could not be built
    #[error("failed to build Kubernetes client: {0}")]
    ClientInit(#[source] kube::Error),

    /// The referenced secret does not exist
    #[error("secret \"{namespace}/{name}\" not found")]
    SecretNotFound {
        /// Namespace searched
        namespace: String,
        /// Secret name
        name: String,
    },

    /// The secret exists but lacks the referenced key
    #[error("key {key:?} not found in secret \"{namespace}/{name}\"")]
    SecretKeyNotFound {
        /// Missing key
        key: String,
        /// Namespace of the secret
        namespace: String,
        /// Secret name
        name: String,
    },

    /// Any other failure talking to the credential store
    #[error("failed to read secret \"{namespace}/{name}\": {source}")]
    SecretStore {
        /// Namespace of the secret
        namespace: String,
        /// Secret name
        name: String,
        /// Underlying API error
        #[source]
        source: kube::Error,
    },

    /// Recursive zone discovery found no start of authority
    #[error("could not find the start of authority for {fqdn}: {reason}")]
    ZoneNotFound {
        /// Name whose zone was looked up
        fqdn: String,
        /// What went wrong during the walk
        reason: String,
    },

    /// The registrar answered with a non-200 status
    #[error("could not create record {payload}; Status: {status}; Body: {body}")]
    RegistrarApi {
        /// JSON record set that was submitted
        payload: String,
        /// HTTP status code returned
        status: u16,
        /// Response body returned
        body: String,
    },

    /// The registrar request failed before a response was received
    #[error("request to {url} failed: {source}")]
    Transport {
        /// Target URL
        url: String,
        /// Underlying HTTP client error
        #[source]
        source: reqwest::Error,
    },

    /// The record set could not be serialized
    #[error("failed to encode record set: {0}")]
    Encode(#[source] serde_json::Error),
}

impl SolverError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigDecode(_)
            | Self::InvalidConfig(_)
            | Self::NotInitialized(_)
            | Self::ClientInit(_)
            | Self::Encode(_) => ErrorKind::Configuration,
            Self::SecretNotFound { .. }
            | Self::SecretKeyNotFound { .. }
            | Self::SecretStore { .. } => ErrorKind::Credentials,
            Self::ZoneNotFound { .. } => ErrorKind::ZoneDiscovery,
            Self::RegistrarApi { .. } => ErrorKind::RegistrarApi,
            Self::Transport { .. } => ErrorKind::Transport,
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
