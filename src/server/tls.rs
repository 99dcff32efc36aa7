// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTPS serving for the webhook API.
//!
//! The aggregation layer only talks to extension servers over TLS. The
//! certificate is normally issued by cert-manager itself and mounted from a
//! Secret.

use super::wait_for_shutdown;
use crate::options::TlsFiles;
use anyhow::{Context, Result};
use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnectionBuilder;
use hyper_util::service::TowerToHyperService;
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, info, warn};

/// Build a rustls server configuration from PEM files.
///
/// # Errors
///
/// Returns an error if either file is unreadable, contains no usable PEM
/// material, or the key does not match the certificate.
pub fn load_server_config(files: &TlsFiles) -> Result<Arc<ServerConfig>> {
    let certs = CertificateDer::pem_file_iter(&files.cert)
        .with_context(|| format!("Failed to open certificate file {}", files.cert.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to parse certificate file {}", files.cert.display()))?;
    if certs.is_empty() {
        anyhow::bail!("No certificates found in {}", files.cert.display());
    }

    let key = PrivateKeyDer::from_pem_file(&files.key)
        .with_context(|| format!("Failed to load private key {}", files.key.display()))?;

    let mut config =
        ServerConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()
            .context("Failed to select TLS protocol versions")?
            .with_no_client_auth()
            .with_single_cert(certs, key)
            .context("Certificate and private key do not form a valid pair")?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(Arc::new(config))
}

/// Accept TLS connections on `listener` until `shutdown` flips to `true`.
///
/// Connections already accepted are allowed to finish on their own tasks.
///
/// # Errors
///
/// Currently never fails once the listener is bound; accept errors are logged
/// and the loop continues.
pub async fn serve_tls(
    listener: TcpListener,
    app: Router,
    config: Arc<ServerConfig>,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let acceptor = TlsAcceptor::from(config);
    let stop = wait_for_shutdown(shutdown);
    tokio::pin!(stop);

    loop {
        tokio::select! {
            () = &mut stop => {
                info!("Shutdown requested, no longer accepting connections");
                return Ok(());
            }
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                };

                let acceptor = acceptor.clone();
                let app = app.clone();
                tokio::spawn(async move {
                    let tls_stream = match acceptor.accept(stream).await {
                        Ok(tls_stream) => tls_stream,
                        Err(e) => {
                            debug!(peer = %peer, error = %e, "TLS handshake failed");
                            return;
                        }
                    };

                    let builder = ConnectionBuilder::new(TokioExecutor::new());
                    if let Err(e) = builder
                        .serve_connection(TokioIo::new(tls_stream), TowerToHyperService::new(app))
                        .await
                    {
                        debug!(peer = %peer, error = %e, "Connection closed with error");
                    }
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "tls_tests.rs"]
mod tls_tests;
