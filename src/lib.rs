// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # godaddy-webhook - cert-manager DNS-01 solver for GoDaddy
//!
//! This crate lets cert-manager complete ACME DNS-01 challenges for domains
//! hosted at GoDaddy. cert-manager posts each challenge to this webhook, which
//! publishes (or neutralizes) a single TXT record through the GoDaddy domains
//! API, using credentials referenced from Kubernetes Secrets.
//!
//! ## Modules
//!
//! - [`solver`] - The solver contract and registry
//! - [`godaddy`] - The GoDaddy solver and its API client
//! - [`credentials`] - Secret resolution
//! - [`zone`] - Authoritative zone discovery
//! - [`challenge`] - Webhook wire types
//! - [`server`] - Webhook API server
//! - [`options`] - Process configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use godaddy_webhook::challenge::{ChallengeAction, ChallengeRequest};
//! use godaddy_webhook::godaddy::GodaddyDnsSolver;
//! use godaddy_webhook::solver::Solver;
//! use tokio::sync::watch;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (_stop_tx, stop_rx) = watch::channel(false);
//! let mut solver = GodaddyDnsSolver::new();
//! solver.initialize(kube::Config::infer().await?, stop_rx).await?;
//!
//! let challenge = ChallengeRequest {
//!     action: ChallengeAction::Present,
//!     key: "token".to_string(),
//!     resource_namespace: "cert-manager".to_string(),
//!     resolved_fqdn: "_acme-challenge.example.com.".to_string(),
//!     resolved_zone: "example.com.".to_string(),
//!     config: Some(serde_json::json!({
//!         "apiKeyRef": { "name": "godaddy", "key": "key" },
//!         "apiSecretRef": { "name": "godaddy", "key": "secret" },
//!         "production": true
//!     })),
//!     ..ChallengeRequest::default()
//! };
//! solver.present(&challenge).await?;
//! # Ok(())
//! # }
//! ```

pub mod challenge;
pub mod constants;
pub mod credentials;
pub mod errors;
pub mod godaddy;
pub mod metrics;
pub mod options;
pub mod server;
pub mod solver;
pub mod zone;
