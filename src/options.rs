// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Process configuration for the webhook binary.
//!
//! Every option can be given as a flag or through the environment. The API
//! group is mandatory: the process refuses to start without it.
//!
//! ```rust
//! use clap::Parser;
//! use godaddy_webhook::options::WebhookOptions;
//!
//! let opts = WebhookOptions::parse_from([
//!     "godaddy-webhook",
//!     "--group-name",
//!     "acme.example.com",
//!     "--secure-port",
//!     "8443",
//! ]);
//! assert_eq!(opts.group_name().unwrap().as_str(), "acme.example.com");
//! assert_eq!(opts.listen_address().unwrap().port(), 8443);
//! ```

use crate::constants::{DEFAULT_BIND_ADDRESS, DEFAULT_DNS_QUERY_TIMEOUT_SECS, DEFAULT_SECURE_PORT};
use crate::zone::parse_nameserver;
use clap::Parser;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Startup configuration was unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartupError {
    /// `GROUP_NAME` missing or empty
    #[error("GROUP_NAME must be specified")]
    MissingGroupName,

    /// Only one of the TLS certificate and key was given
    #[error("--tls-cert-file and --tls-private-key-file must be given together")]
    IncompleteTlsConfig,

    /// The bind address is not an IP address
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),
}

/// API group under which solvers are served, e.g. `acme.example.com`.
///
/// Guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupName(String);

impl GroupName {
    /// Validate a group name.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::MissingGroupName`] if `name` is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, StartupError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(StartupError::MissingGroupName);
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Command-line and environment options.
#[derive(Debug, Clone, Parser)]
#[command(name = "godaddy-webhook", version, about = "cert-manager DNS-01 webhook for GoDaddy")]
pub struct WebhookOptions {
    /// API group the solvers are registered under
    #[arg(long, env = "GROUP_NAME")]
    pub group_name: Option<String>,

    /// Port to serve the webhook API on
    #[arg(long, env = "SECURE_PORT", default_value_t = DEFAULT_SECURE_PORT)]
    pub secure_port: u16,

    /// Address to bind the webhook API to
    #[arg(long, env = "BIND_ADDRESS", default_value = DEFAULT_BIND_ADDRESS)]
    pub bind_address: String,

    /// PEM certificate chain for HTTPS; plain HTTP is served when omitted
    #[arg(long, env = "TLS_CERT_FILE")]
    pub tls_cert_file: Option<PathBuf>,

    /// PEM private key matching `--tls-cert-file`
    #[arg(long, env = "TLS_PRIVATE_KEY_FILE")]
    pub tls_private_key_file: Option<PathBuf>,

    /// Recursive nameservers for zone discovery (`ip` or `ip:port`, comma separated).
    /// Defaults to the entries in /etc/resolv.conf
    #[arg(
        long,
        env = "DNS01_RECURSIVE_NAMESERVERS",
        value_delimiter = ',',
        value_parser = parse_nameserver
    )]
    pub dns01_recursive_nameservers: Vec<SocketAddr>,

    /// Timeout for each recursive SOA query, in seconds
    #[arg(long, env = "DNS01_QUERY_TIMEOUT_SECS", default_value_t = DEFAULT_DNS_QUERY_TIMEOUT_SECS)]
    pub dns01_query_timeout_secs: u64,
}

/// Certificate and key used to serve HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl WebhookOptions {
    /// The validated API group.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::MissingGroupName`] if unset or blank.
    pub fn group_name(&self) -> Result<GroupName, StartupError> {
        GroupName::new(self.group_name.clone().unwrap_or_default())
    }

    /// Socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::InvalidBindAddress`] if the bind address is not an IP.
    pub fn listen_address(&self) -> Result<SocketAddr, StartupError> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|_| StartupError::InvalidBindAddress(self.bind_address.clone()))?;
        Ok(SocketAddr::new(ip, self.secure_port))
    }

    /// TLS files if HTTPS is configured.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::IncompleteTlsConfig`] if only one file is given.
    pub fn tls_files(&self) -> Result<Option<TlsFiles>, StartupError> {
        match (&self.tls_cert_file, &self.tls_private_key_file) {
            (Some(cert), Some(key)) => Ok(Some(TlsFiles {
                cert: cert.clone(),
                key: key.clone(),
            })),
            (None, None) => Ok(None),
            _ => Err(StartupError::IncompleteTlsConfig),
        }
    }

    #[must_use]
    pub fn dns_query_timeout(&self) -> Duration {
        Duration::from_secs(self.dns01_query_timeout_secs)
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod options_tests;
