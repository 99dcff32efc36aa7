// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Credential store access.
//!
//! Solvers never read credentials from issuer configuration. They hold a
//! reference (secret name + key) and resolve it through a [`SecretStore`] on
//! every call. [`KubeSecretStore`] is the production implementation backed by
//! the Kubernetes API.

use crate::errors::SolverError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use std::collections::BTreeMap;
use tracing::debug;

/// Decoded contents of a secret: key to raw bytes.
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Read-only access to namespaced secrets.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the data of secret `name` in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::SecretNotFound`] if the secret does not exist and
    /// [`SolverError::SecretStore`] for any other API failure.
    async fn get_secret_data(&self, namespace: &str, name: &str)
        -> Result<SecretData, SolverError>;
}

/// [`SecretStore`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn get_secret_data(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<SecretData, SolverError> {
        let secret_api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);

        debug!(namespace = %namespace, secret = %name, "Fetching credential secret");

        let secret = secret_api
            .get_opt(name)
            .await
            .map_err(|source| SolverError::SecretStore {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source,
            })?
            .ok_or_else(|| SolverError::SecretNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })?;

        Ok(secret_data(&secret))
    }
}

/// Merge `data` and `stringData` of a secret into raw bytes per key.
///
/// `stringData` wins on conflicts, matching how the API server folds it in on write.
#[must_use]
pub fn secret_data(secret: &Secret) -> SecretData {
    let mut converted = SecretData::new();
    if let Some(data) = secret.data.as_ref() {
        for (key, value) in data {
            converted.insert(key.clone(), value.0.clone());
        }
    }
    if let Some(string_data) = secret.string_data.as_ref() {
        for (key, value) in string_data {
            converted.insert(key.clone(), value.as_bytes().to_vec());
        }
    }
    converted
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod credentials_tests;
