// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The solver contract and the registry the webhook host dispatches through.
//!
//! A [`Solver`] publishes and retracts DNS-01 challenge records for one DNS
//! provider. The webhook host routes each challenge to the solver whose
//! [`Solver::name`] matches the resource cert-manager posted to, so names must
//! be unique within one process.
//!
//! # Example
//!
//! ```rust,no_run
//! use godaddy_webhook::godaddy::GodaddyDnsSolver;
//! use godaddy_webhook::solver::{Solver, SolverRegistry};
//! use tokio::sync::watch;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (_stop_tx, stop_rx) = watch::channel(false);
//! let kube_config = kube::Config::infer().await?;
//!
//! let mut solver = GodaddyDnsSolver::new();
//! solver.initialize(kube_config, stop_rx).await?;
//!
//! let mut registry = SolverRegistry::new();
//! registry.register(solver)?;
//! # Ok(())
//! # }
//! ```

use crate::challenge::{ChallengeAction, ChallengeRequest};
use crate::errors::SolverError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// Provider-specific logic for presenting and cleaning up DNS-01 challenges.
#[async_trait]
pub trait Solver: Send + Sync {
    /// Name issuers use to select this solver. Unique within the process.
    fn name(&self) -> &str;

    /// Called once at startup, before the server starts accepting challenges.
    ///
    /// `kube_config` is used to build clients for the credential store.
    /// `stop` flips to `true` when the process is shutting down.
    async fn initialize(
        &mut self,
        kube_config: kube::Config,
        stop: watch::Receiver<bool>,
    ) -> Result<(), SolverError>;

    /// Publish the challenge record. Must tolerate repeated calls.
    async fn present(&self, challenge: &ChallengeRequest) -> Result<(), SolverError>;

    /// Retract the challenge record. Must tolerate a record that is already gone.
    async fn clean_up(&self, challenge: &ChallengeRequest) -> Result<(), SolverError>;

    /// Run whichever of [`Solver::present`] or [`Solver::clean_up`] the request asks for.
    async fn handle(&self, challenge: &ChallengeRequest) -> Result<(), SolverError> {
        match challenge.action {
            ChallengeAction::Present => self.present(challenge).await,
            ChallengeAction::CleanUp => self.clean_up(challenge).await,
        }
    }
}

/// Registering a solver failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Another solver already uses this name
    #[error("a solver named '{0}' is already registered")]
    DuplicateName(String),
}

/// Initialized solvers keyed by [`Solver::name`].
#[derive(Clone, Default)]
pub struct SolverRegistry {
    solvers: BTreeMap<String, Arc<dyn Solver>>,
}

impl SolverRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a solver.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if a solver with the same name exists.
    pub fn register<S: Solver + 'static>(&mut self, solver: S) -> Result<(), RegistryError> {
        let name = solver.name().to_string();
        if self.solvers.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.solvers.insert(name, Arc::new(solver));
        Ok(())
    }

    /// Look up a solver by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Solver>> {
        self.solvers.get(name).cloned()
    }

    /// Names of all registered solvers, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.solvers.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.solvers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solvers.is_empty()
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod solver_tests;
