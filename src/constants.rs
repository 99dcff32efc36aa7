// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the GoDaddy webhook.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

use std::time::Duration;

// ============================================================================
// Solver Constants
// ============================================================================

/// Name under which the GoDaddy solver is registered with the webhook host.
///
/// Issuers reference it as `solverName: godaddy`.
pub const PROVIDER_NAME: &str = "godaddy";

/// Record type published for DNS-01 challenges
pub const TXT_RECORD_TYPE: &str = "TXT";

/// Placeholder data written to a challenge record during cleanup
pub const CLEANUP_SENTINEL: &str = "null";

// ============================================================================
// GoDaddy API Constants
// ============================================================================

/// GoDaddy OTE (test) environment
pub const GODADDY_TEST_API_URL: &str = "https://api.ote-godaddy.com";

/// GoDaddy production environment
pub const GODADDY_PRODUCTION_API_URL: &str = "https://api.godaddy.com";

/// `User-Agent` sent with every registrar request
pub const USER_AGENT: &str = concat!("godaddy-webhook/", env!("CARGO_PKG_VERSION"));

/// Default timeout for registrar HTTP requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default timeout for registrar HTTP requests as a [`Duration`]
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS);

// ============================================================================
// DNS Protocol Constants
// ============================================================================

/// Standard DNS port for queries
pub const DNS_PORT: u16 = 53;

/// Resolver configuration consulted when no nameservers are configured
pub const RESOLV_CONF_PATH: &str = "/etc/resolv.conf";

/// Nameservers used when neither flags nor `/etc/resolv.conf` provide any
pub const FALLBACK_NAMESERVERS: [&str; 2] = ["8.8.8.8:53", "8.8.4.4:53"];

/// Default per-query timeout for recursive SOA lookups (10 seconds)
pub const DEFAULT_DNS_QUERY_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Webhook API Constants
// ============================================================================

/// API version served for every solver group
pub const WEBHOOK_API_VERSION: &str = "v1alpha1";

/// API version of the challenge payload exchanged with cert-manager
pub const CHALLENGE_PAYLOAD_API_VERSION: &str = "acme.cert-manager.io/v1alpha1";

/// Kind of the challenge payload exchanged with cert-manager
pub const CHALLENGE_PAYLOAD_KIND: &str = "ChallengePayload";

/// Verb cert-manager uses to submit challenges
pub const CHALLENGE_VERB: &str = "create";

/// Default HTTPS port for the webhook server
pub const DEFAULT_SECURE_PORT: u16 = 443;

/// Default bind address for the webhook server
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Path for Prometheus metrics endpoint
pub const METRICS_PATH: &str = "/metrics";

// ============================================================================
// Failure Reasons
// ============================================================================

/// Solver configuration missing or malformed
pub const REASON_CONFIGURATION_ERROR: &str = "ConfigurationError";

/// Credential secret or key could not be resolved
pub const REASON_CREDENTIALS_UNRESOLVED: &str = "CredentialsUnresolved";

/// No authoritative zone found for the challenge
pub const REASON_ZONE_NOT_FOUND: &str = "ZoneNotFound";

/// Registrar answered with a non-200 status
pub const REASON_REGISTRAR_API_ERROR: &str = "RegistrarApiError";

/// Registrar could not be reached
pub const REASON_REGISTRAR_UNREACHABLE: &str = "RegistrarUnreachable";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;
