// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! GoDaddy DNS-01 solver.
//!
//! The [`GodaddyDnsSolver`] translates a cert-manager challenge into a single
//! record-set replace against the GoDaddy domains API:
//!
//! 1. Decode and validate the per-issuer configuration
//! 2. Resolve the API key and secret from the referenced Secrets
//! 3. Pick the OTE or production endpoint
//! 4. Compute the record name relative to the resolved zone
//! 5. Discover the registrar domain via recursive SOA lookup
//! 6. `PUT` the one-element TXT record set
//!
//! `present` publishes the challenge token; `clean_up` overwrites it with a
//! sentinel value. Nothing is cached between calls.

pub mod api;
pub mod types;

pub use api::RecordsClient;
pub use types::{
    load_config, Credentials, DnsRecord, GodaddyDnsProviderConfig, SecretKeySelector,
};

use crate::challenge::ChallengeRequest;
use crate::constants::{
    DEFAULT_DNS_QUERY_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT, GODADDY_PRODUCTION_API_URL,
    GODADDY_TEST_API_URL, PROVIDER_NAME,
};
use crate::credentials::{KubeSecretStore, SecretStore};
use crate::errors::SolverError;
use crate::solver::Solver;
use crate::zone::{un_fqdn, RecursiveZoneResolver, ZoneResolver};
use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// Everything a record update needs, resolved from one challenge.
struct ResolvedChallenge {
    config: GodaddyDnsProviderConfig,
    credentials: Credentials,
    base_url: String,
    record_name: String,
    domain: String,
}

/// cert-manager solver for domains hosted at GoDaddy.
pub struct GodaddyDnsSolver {
    secrets: Option<Arc<dyn SecretStore>>,
    zones: Arc<dyn ZoneResolver>,
    test_url: String,
    production_url: String,
}

impl Default for GodaddyDnsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GodaddyDnsSolver {
    /// Solver using the system resolver configuration for zone discovery.
    ///
    /// The credential store is created by [`Solver::initialize`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_zone_resolver(Arc::new(RecursiveZoneResolver::from_system(
            Duration::from_secs(DEFAULT_DNS_QUERY_TIMEOUT_SECS),
        )))
    }

    /// Solver using `zones` for zone discovery.
    #[must_use]
    pub fn with_zone_resolver(zones: Arc<dyn ZoneResolver>) -> Self {
        Self {
            secrets: None,
            zones,
            test_url: GODADDY_TEST_API_URL.to_string(),
            production_url: GODADDY_PRODUCTION_API_URL.to_string(),
        }
    }

    /// Use `secrets` instead of building a Kubernetes-backed store on initialize.
    #[must_use]
    pub fn with_secret_store(mut self, secrets: Arc<dyn SecretStore>) -> Self {
        self.secrets = Some(secrets);
        self
    }

    /// Override the OTE and production base URLs.
    #[must_use]
    pub fn with_endpoints(mut self, test_url: &str, production_url: &str) -> Self {
        self.test_url = test_url.to_string();
        self.production_url = production_url.to_string();
        self
    }

    /// Registrar base URL for `config`: OTE unless `production` is set.
    #[must_use]
    pub fn api_url(&self, config: &GodaddyDnsProviderConfig) -> &str {
        if config.production {
            &self.production_url
        } else {
            &self.test_url
        }
    }

    /// Fetch the API key and secret referenced by `config` from the
    /// challenge's namespace.
    ///
    /// # Errors
    ///
    /// Fails if the solver is not initialized, a secret is missing, or a
    /// secret lacks the referenced key.
    pub async fn extract_api_token_from_secret(
        &self,
        config: &GodaddyDnsProviderConfig,
        challenge: &ChallengeRequest,
    ) -> Result<Credentials, SolverError> {
        let secrets = self
            .secrets
            .as_ref()
            .ok_or_else(|| SolverError::NotInitialized(PROVIDER_NAME.to_string()))?;
        let namespace = challenge.resource_namespace.as_str();

        let api_key = read_secret_key(
            secrets.as_ref(),
            namespace,
            &config.api_key_ref.name,
            &config.api_key_ref.key,
        )
        .await?;
        let api_secret = read_secret_key(
            secrets.as_ref(),
            namespace,
            &config.api_secret_ref.name,
            &config.api_secret_ref.key,
        )
        .await?;

        Ok(Credentials {
            api_key,
            api_secret,
        })
    }

    /// Registrar domain for `zone`, without trailing dot.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::ZoneNotFound`] if discovery fails.
    pub async fn get_zone(&self, zone: &str) -> Result<String, SolverError> {
        let auth_zone = self.zones.find_zone_by_fqdn(zone).await?;
        Ok(un_fqdn(&auth_zone).to_string())
    }

    /// Steps shared by present and clean-up, up to the record submission.
    async fn resolve(
        &self,
        challenge: &ChallengeRequest,
    ) -> Result<ResolvedChallenge, SolverError> {
        let config = load_config(challenge.config.as_ref())?;
        config.validate()?;

        let credentials = self.extract_api_token_from_secret(&config, challenge).await?;
        let base_url = self.api_url(&config).to_string();
        let record_name = extract_record_name(&challenge.resolved_fqdn, &challenge.resolved_zone);
        let domain = self.get_zone(&challenge.resolved_zone).await?;

        debug!(
            fqdn = %challenge.resolved_fqdn,
            zone = %challenge.resolved_zone,
            domain = %domain,
            record = %record_name,
            production = config.production,
            "Resolved challenge"
        );

        Ok(ResolvedChallenge {
            config,
            credentials,
            base_url,
            record_name,
            domain,
        })
    }

    async fn submit(resolved: ResolvedChallenge, record: DnsRecord) -> Result<(), SolverError> {
        let client =
            RecordsClient::new(&resolved.base_url, resolved.credentials, DEFAULT_HTTP_TIMEOUT)?;
        client
            .update_records(&resolved.domain, &resolved.record_name, &[record])
            .await
    }
}

#[async_trait]
impl Solver for GodaddyDnsSolver {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn initialize(
        &mut self,
        kube_config: kube::Config,
        _stop: watch::Receiver<bool>,
    ) -> Result<(), SolverError> {
        if self.secrets.is_some() {
            debug!("Credential store already configured, skipping client creation");
            return Ok(());
        }

        // More than one rustls provider is compiled in, so the process default must be set
        let _ = rustls::crypto::ring::default_provider().install_default();

        let client = kube::Client::try_from(kube_config).map_err(SolverError::ClientInit)?;
        self.secrets = Some(Arc::new(KubeSecretStore::new(client)));
        info!(solver = PROVIDER_NAME, "Solver initialized");
        Ok(())
    }

    async fn present(&self, challenge: &ChallengeRequest) -> Result<(), SolverError> {
        info!(
            uid = %challenge.uid,
            fqdn = %challenge.resolved_fqdn,
            namespace = %challenge.resource_namespace,
            "Presenting challenge record"
        );

        let resolved = self.resolve(challenge).await?;
        let record = DnsRecord::challenge(
            &resolved.record_name,
            &challenge.key,
            resolved.config.record_ttl(),
        );
        Self::submit(resolved, record).await
    }

    async fn clean_up(&self, challenge: &ChallengeRequest) -> Result<(), SolverError> {
        info!(
            uid = %challenge.uid,
            fqdn = %challenge.resolved_fqdn,
            namespace = %challenge.resource_namespace,
            "Cleaning up challenge record"
        );

        let resolved = self.resolve(challenge).await?;
        let record = DnsRecord::cleared(&resolved.record_name);
        Self::submit(resolved, record).await
    }
}

/// Record name of `fqdn` relative to `zone`.
///
/// Both names may be given with or without the trailing root dot, in any
/// letter case. If `zone` is not a suffix of `fqdn`, only the trailing root
/// dot is removed.
///
/// ```rust
/// use godaddy_webhook::godaddy::extract_record_name;
///
/// assert_eq!(
///     extract_record_name("_acme-challenge.example.com.", "example.com."),
///     "_acme-challenge"
/// );
/// assert_eq!(
///     extract_record_name("_acme-challenge.example.org.", "example.com."),
///     "_acme-challenge.example.org"
/// );
/// ```
#[must_use]
pub fn extract_record_name(fqdn: &str, zone: &str) -> String {
    let fqdn = un_fqdn(fqdn);
    let zone = un_fqdn(zone);
    if zone.is_empty() || fqdn.len() <= zone.len() {
        return fqdn.to_string();
    }

    // DNS names compare case-insensitively
    let split = fqdn.len() - zone.len() - 1;
    if fqdn.is_char_boundary(split)
        && fqdn[split..].starts_with('.')
        && fqdn[split + 1..].eq_ignore_ascii_case(zone)
    {
        return fqdn[..split].to_string();
    }
    fqdn.to_string()
}

async fn read_secret_key(
    secrets: &dyn SecretStore,
    namespace: &str,
    name: &str,
    key: &str,
) -> Result<SecretString, SolverError> {
    let data = secrets.get_secret_data(namespace, name).await?;
    let value = data.get(key).ok_or_else(|| SolverError::SecretKeyNotFound {
        key: key.to_string(),
        namespace: namespace.to_string(),
        name: name.to_string(),
    })?;
    Ok(SecretString::from(String::from_utf8_lossy(value).into_owned()))
}
