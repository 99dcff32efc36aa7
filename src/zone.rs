// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Authoritative zone discovery over recursive DNS.
//!
//! The registrar addresses records by the domain they live in, which is not
//! necessarily the zone cert-manager resolved. [`RecursiveZoneResolver`] walks
//! up the labels of a name, asking recursive nameservers for the SOA of each
//! candidate, and returns the first zone apex it finds.
//!
//! # Example
//!
//! ```rust
//! use godaddy_webhook::zone::candidate_zones;
//!
//! assert_eq!(
//!     candidate_zones("_acme-challenge.example.com"),
//!     vec!["_acme-challenge.example.com.", "example.com.", "com."]
//! );
//! ```

use crate::constants::{DNS_PORT, FALLBACK_NAMESERVERS, RESOLV_CONF_PATH};
use crate::errors::SolverError;
use async_trait::async_trait;
use hickory_client::client::{Client, SyncClient};
use hickory_client::op::ResponseCode;
use hickory_client::rr::{DNSClass, Name, Record, RecordType};
use hickory_client::udp::UdpClientConnection;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Finds the authoritative zone for a DNS name.
#[async_trait]
pub trait ZoneResolver: Send + Sync {
    /// Return the apex of the zone containing `fqdn`, dot-terminated.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::ZoneNotFound`] if no start of authority is found
    /// or every nameserver fails.
    async fn find_zone_by_fqdn(&self, fqdn: &str) -> Result<String, SolverError>;
}

/// [`ZoneResolver`] issuing recursive SOA queries over UDP.
#[derive(Debug, Clone)]
pub struct RecursiveZoneResolver {
    nameservers: Vec<SocketAddr>,
    timeout: Duration,
}

impl RecursiveZoneResolver {
    /// Resolver querying `nameservers` in order, each query bounded by `timeout`.
    #[must_use]
    pub fn new(nameservers: Vec<SocketAddr>, timeout: Duration) -> Self {
        Self {
            nameservers,
            timeout,
        }
    }

    /// Resolver using the host's `/etc/resolv.conf`, or public fallbacks if it
    /// lists no usable nameserver.
    #[must_use]
    pub fn from_system(timeout: Duration) -> Self {
        let nameservers = match std::fs::read_to_string(RESOLV_CONF_PATH) {
            Ok(contents) => parse_resolv_conf(&contents),
            Err(e) => {
                warn!(path = RESOLV_CONF_PATH, error = %e, "Failed to read resolver configuration");
                Vec::new()
            }
        };

        if nameservers.is_empty() {
            return Self::new(fallback_nameservers(), timeout);
        }
        Self::new(nameservers, timeout)
    }

    #[must_use]
    pub fn nameservers(&self) -> &[SocketAddr] {
        &self.nameservers
    }
}

#[async_trait]
impl ZoneResolver for RecursiveZoneResolver {
    async fn find_zone_by_fqdn(&self, fqdn: &str) -> Result<String, SolverError> {
        let fqdn_owned = fqdn.to_string();
        let nameservers = self.nameservers.clone();
        let timeout = self.timeout;

        tokio::task::spawn_blocking(move || find_zone_blocking(&fqdn_owned, &nameservers, timeout))
            .await
            .map_err(|e| SolverError::ZoneNotFound {
                fqdn: fqdn.to_string(),
                reason: format!("zone lookup task failed: {e}"),
            })?
    }
}

/// What one SOA answer says about a candidate domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoaLookup {
    /// The candidate is (or is inside) a zone with this apex
    Zone(String),
    /// No apex at this level; try the parent
    Continue,
}

fn find_zone_blocking(
    fqdn: &str,
    nameservers: &[SocketAddr],
    timeout: Duration,
) -> Result<String, SolverError> {
    if nameservers.is_empty() {
        return Err(SolverError::ZoneNotFound {
            fqdn: fqdn.to_string(),
            reason: "no recursive nameservers configured".to_string(),
        });
    }

    for candidate in candidate_zones(fqdn) {
        let (code, answers) = query_soa(&candidate, nameservers, timeout).map_err(|reason| {
            SolverError::ZoneNotFound {
                fqdn: fqdn.to_string(),
                reason,
            }
        })?;

        match interpret_soa_response(&candidate, code, &answers).map_err(|reason| {
            SolverError::ZoneNotFound {
                fqdn: fqdn.to_string(),
                reason,
            }
        })? {
            SoaLookup::Zone(zone) => {
                debug!(fqdn = %fqdn, zone = %zone, "Found authoritative zone");
                return Ok(zone);
            }
            SoaLookup::Continue => {}
        }
    }

    Err(SolverError::ZoneNotFound {
        fqdn: fqdn.to_string(),
        reason: "no SOA record in any parent domain".to_string(),
    })
}

/// Query `domain`'s SOA against each nameserver until one answers.
fn query_soa(
    domain: &str,
    nameservers: &[SocketAddr],
    timeout: Duration,
) -> Result<(ResponseCode, Vec<Record>), String> {
    let name = Name::from_str(domain).map_err(|e| format!("invalid domain {domain}: {e}"))?;
    let mut last_error = String::new();

    for server in nameservers {
        let conn = match UdpClientConnection::with_timeout(*server, timeout) {
            Ok(conn) => conn,
            Err(e) => {
                last_error = format!("failed to create UDP connection to {server}: {e}");
                continue;
            }
        };
        let client = SyncClient::new(conn);

        match client.query(&name, DNSClass::IN, RecordType::SOA) {
            Ok(response) => return Ok((response.response_code(), response.answers().to_vec())),
            Err(e) => {
                debug!(domain = %domain, server = %server, error = %e, "SOA query failed");
                last_error = format!("SOA query for {domain} against {server} failed: {e}");
            }
        }
    }

    Err(last_error)
}

/// Decide what a SOA response for `domain` means.
///
/// Any response code other than NOERROR or NXDOMAIN is an error. A CNAME in a
/// NOERROR answer means `domain` cannot be a zone apex. Otherwise the owner of
/// the first SOA record is the zone.
///
/// # Errors
///
/// Returns a description of the unexpected response code.
pub fn interpret_soa_response(
    domain: &str,
    code: ResponseCode,
    answers: &[Record],
) -> Result<SoaLookup, String> {
    match code {
        ResponseCode::NoError => {}
        ResponseCode::NXDomain => return Ok(SoaLookup::Continue),
        other => return Err(format!("unexpected response code '{other}' for {domain}")),
    }

    if answers
        .iter()
        .any(|record| record.record_type() == RecordType::CNAME)
    {
        return Ok(SoaLookup::Continue);
    }

    Ok(answers
        .iter()
        .find(|record| record.record_type() == RecordType::SOA)
        .map_or(SoaLookup::Continue, |soa| {
            SoaLookup::Zone(to_fqdn(&soa.name().to_ascii()))
        }))
}

/// Every domain `fqdn` could belong to, longest first, each dot-terminated.
#[must_use]
pub fn candidate_zones(fqdn: &str) -> Vec<String> {
    let trimmed = un_fqdn(fqdn);
    if trimmed.is_empty() {
        return Vec::new();
    }

    let labels: Vec<&str> = trimmed.split('.').collect();
    (0..labels.len())
        .map(|i| format!("{}.", labels[i..].join(".")))
        .collect()
}

/// Strip a single trailing root-zone dot.
#[must_use]
pub fn un_fqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Append a trailing root-zone dot if missing.
#[must_use]
pub fn to_fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

/// Nameserver addresses listed in resolv.conf contents.
///
/// Entries that are not plain IP addresses (e.g. scoped IPv6) are skipped.
#[must_use]
pub fn parse_resolv_conf(contents: &str) -> Vec<SocketAddr> {
    contents
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some("nameserver"), Some(addr)) => addr
                    .parse::<IpAddr>()
                    .ok()
                    .map(|ip| SocketAddr::new(ip, DNS_PORT)),
                _ => None,
            }
        })
        .collect()
}

/// Parse a nameserver given as `ip` or `ip:port`.
///
/// # Errors
///
/// Returns a description if `value` is neither form.
pub fn parse_nameserver(value: &str) -> Result<SocketAddr, String> {
    let value = value.trim();
    if let Ok(addr) = value.parse::<SocketAddr>() {
        return Ok(addr);
    }
    value
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DNS_PORT))
        .map_err(|_| format!("invalid nameserver address '{value}'"))
}

fn fallback_nameservers() -> Vec<SocketAddr> {
    FALLBACK_NAMESERVERS
        .iter()
        .filter_map(|addr| addr.parse().ok())
        .collect()
}

#[cfg(test)]
#[path = "zone_tests.rs"]
mod zone_tests;
