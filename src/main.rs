// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::Parser;
use godaddy_webhook::{
    constants::TOKIO_WORKER_THREADS,
    godaddy::GodaddyDnsSolver,
    options::WebhookOptions,
    server::{self, AppState},
    solver::{Solver, SolverRegistry},
    zone::RecursiveZoneResolver,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

fn main() -> Result<()> {
    let options = WebhookOptions::parse();

    // A missing group name is fatal before anything else starts
    let group = options.group_name()?;

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("godaddy-webhook")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(options, group))
}

async fn async_main(
    options: WebhookOptions,
    group: godaddy_webhook::options::GroupName,
) -> Result<()> {
    init_tracing();

    info!(group = %group, "Starting GoDaddy DNS-01 webhook");

    // reqwest, kube and the TLS listener share the ring provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    let listen_address = options.listen_address()?;
    let tls = options.tls_files()?;

    let (stop_tx, stop_rx) = watch::channel(false);

    debug!("Loading Kubernetes client configuration");
    let kube_config = kube::Config::infer()
        .await
        .context("Failed to load Kubernetes client configuration")?;

    let resolver = if options.dns01_recursive_nameservers.is_empty() {
        RecursiveZoneResolver::from_system(options.dns_query_timeout())
    } else {
        RecursiveZoneResolver::new(
            options.dns01_recursive_nameservers.clone(),
            options.dns_query_timeout(),
        )
    };
    info!(nameservers = ?resolver.nameservers(), "Zone discovery configured");

    let mut solver = GodaddyDnsSolver::with_zone_resolver(Arc::new(resolver));
    solver
        .initialize(kube_config, stop_rx.clone())
        .await
        .context("Failed to initialize GoDaddy solver")?;

    let mut registry = SolverRegistry::new();
    registry.register(solver)?;

    let app = server::router(Arc::new(AppState::new(group, registry)));

    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        let _ = stop_tx.send(true);
    });

    server::serve(listen_address, app, tls, stop_rx).await?;

    info!("Webhook stopped");
    Ok(())
}

/// Initialize logging.
///
/// Format: timestamp file:line LEVEL message
///
/// Respects `RUST_LOG` (default `info`) and `RUST_LOG_FORMAT=json|text`.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    debug!("Logging initialized with file and line number tracking");
}

/// Resolves on SIGTERM or Ctrl+C.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod main_tests;
