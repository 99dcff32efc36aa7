// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Webhook API server.
//!
//! cert-manager reaches solvers through the Kubernetes aggregation layer,
//! which proxies requests for the webhook's API group to this server. The
//! server exposes:
//!
//! - `POST /apis/{group}/v1alpha1/{solver}` - submit a `ChallengePayload`
//! - `GET /apis/{group}` and `GET /apis/{group}/v1alpha1` - discovery
//! - `GET /healthz`, `/livez`, `/readyz` - probes
//! - `GET /metrics` - Prometheus metrics
//!
//! Solver failures are not HTTP errors: the reply is still a
//! `ChallengePayload`, with `success: false` and the error in `status`.

pub mod tls;

use crate::challenge::{ChallengePayload, ChallengeResponse};
use crate::constants::{
    CHALLENGE_PAYLOAD_KIND, CHALLENGE_VERB, METRICS_PATH, WEBHOOK_API_VERSION,
};
use crate::metrics;
use crate::options::{GroupName, TlsFiles};
use crate::solver::SolverRegistry;
use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
    APIGroup, APIResource, APIResourceList, GroupVersionForDiscovery, Status,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// State shared by all request handlers.
pub struct AppState {
    group: GroupName,
    solvers: SolverRegistry,
}

impl AppState {
    #[must_use]
    pub fn new(group: GroupName, solvers: SolverRegistry) -> Self {
        Self { group, solvers }
    }

    fn group_version(&self) -> String {
        format!("{}/{WEBHOOK_API_VERSION}", self.group)
    }
}

/// Build the webhook router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/livez", get(healthz))
        .route("/readyz", get(healthz))
        .route(METRICS_PATH, get(metrics_handler))
        .route("/apis/{group}", get(api_group))
        .route("/apis/{group}/{version}", get(api_resources))
        .route("/apis/{group}/{version}/{resource}", post(submit_challenge))
        .with_state(state)
}

/// Serve `app` on `addr` until `shutdown` flips to `true`.
///
/// HTTPS is served when `tls` is given, plain HTTP otherwise.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound, TLS material cannot be
/// loaded, or the server fails.
pub async fn serve(
    addr: SocketAddr,
    app: Router,
    tls: Option<TlsFiles>,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind webhook server to {addr}"))?;

    match tls {
        Some(files) => {
            let config = tls::load_server_config(&files)?;
            info!(address = %addr, "Webhook server listening (https)");
            tls::serve_tls(listener, app, config, shutdown).await
        }
        None => {
            warn!(address = %addr, "Webhook server listening without TLS");
            axum::serve(listener, app)
                .with_graceful_shutdown(wait_for_shutdown(shutdown))
                .await
                .context("Webhook server error")
        }
    }
}

/// Resolves once `shutdown` is `true` or its sender is gone.
pub(crate) async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn metrics_handler() -> Response {
    match metrics::gather_metrics() {
        Ok(text) => (StatusCode::OK, text).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to gather metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn api_group(State(state): State<Arc<AppState>>, Path(group): Path<String>) -> Response {
    if group != state.group.as_str() {
        return status_response(StatusCode::NOT_FOUND, format!("API group {group} not served"));
    }

    let version = GroupVersionForDiscovery {
        group_version: state.group_version(),
        version: WEBHOOK_API_VERSION.to_string(),
    };
    Json(APIGroup {
        name: state.group.to_string(),
        preferred_version: Some(version.clone()),
        versions: vec![version],
        ..APIGroup::default()
    })
    .into_response()
}

async fn api_resources(
    State(state): State<Arc<AppState>>,
    Path((group, version)): Path<(String, String)>,
) -> Response {
    if group != state.group.as_str() || version != WEBHOOK_API_VERSION {
        return status_response(
            StatusCode::NOT_FOUND,
            format!("API version {group}/{version} not served"),
        );
    }

    let resources = state
        .solvers
        .names()
        .map(|name| APIResource {
            name: name.to_string(),
            singular_name: name.to_string(),
            kind: CHALLENGE_PAYLOAD_KIND.to_string(),
            namespaced: false,
            verbs: vec![CHALLENGE_VERB.to_string()],
            ..APIResource::default()
        })
        .collect();

    Json(APIResourceList {
        group_version: state.group_version(),
        resources,
    })
    .into_response()
}

async fn submit_challenge(
    State(state): State<Arc<AppState>>,
    Path((group, version, resource)): Path<(String, String, String)>,
    body: Bytes,
) -> Response {
    if group != state.group.as_str() || version != WEBHOOK_API_VERSION {
        return status_response(
            StatusCode::NOT_FOUND,
            format!("API version {group}/{version} not served"),
        );
    }

    let Some(solver) = state.solvers.get(&resource) else {
        return status_response(
            StatusCode::NOT_FOUND,
            format!("no solver named '{resource}' is registered"),
        );
    };

    let payload: ChallengePayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            return status_response(
                StatusCode::BAD_REQUEST,
                format!("invalid ChallengePayload: {e}"),
            );
        }
    };

    let Some(request) = payload.request else {
        return status_response(
            StatusCode::BAD_REQUEST,
            "ChallengePayload has no request".to_string(),
        );
    };

    let action = request.action.to_string();
    let start = Instant::now();
    let response = match solver.handle(&request).await {
        Ok(()) => {
            info!(
                solver = %resource,
                action = %action,
                uid = %request.uid,
                fqdn = %request.resolved_fqdn,
                "Challenge handled"
            );
            metrics::record_challenge(&resource, &action, "success", start.elapsed());
            ChallengeResponse::success(request.uid.clone())
        }
        Err(err) => {
            error!(
                solver = %resource,
                action = %action,
                uid = %request.uid,
                fqdn = %request.resolved_fqdn,
                error = %err,
                "Challenge failed"
            );
            metrics::record_challenge(&resource, &action, err.kind().reason(), start.elapsed());
            ChallengeResponse::failure(request.uid.clone(), &err)
        }
    };

    (StatusCode::CREATED, Json(ChallengePayload::reply(response))).into_response()
}

/// Kubernetes-style `Status` error body.
fn status_response(code: StatusCode, message: String) -> Response {
    let status = Status {
        status: Some("Failure".to_string()),
        message: Some(message),
        reason: code.canonical_reason().map(|r| r.replace(' ', "")),
        code: Some(i32::from(code.as_u16())),
        ..Status::default()
    };
    (code, Json(status)).into_response()
}
