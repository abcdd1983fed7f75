//! HTTP search API for the catalog indexer.
//!
//! Queries are forwarded to the engine as they arrive, whether or not
//! ingestion has finished.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info, instrument, warn};

use crate::IndexingError;
use catalog_indexer_repository::IndexHandle;
use catalog_indexer_shared::SearchQuery;

/// How long in-flight requests may take to finish after shutdown starts.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared state for the request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub index: IndexHandle,
}

/// Query string accepted by `GET /search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub limit: Option<usize>,
    pub page: Option<usize>,
}

impl From<SearchParams> for SearchQuery {
    fn from(params: SearchParams) -> Self {
        let mut query = SearchQuery::new(params.query.unwrap_or_default());
        if let Some(limit) = params.limit {
            query = query.with_limit(limit);
        }
        if let Some(page) = params.page {
            query = query.with_page(page);
        }
        query
    }
}

/// Build the API router.
pub fn router(index: IndexHandle) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/health", get(health))
        .with_state(AppState { index })
}

/// `GET /search`: the engine's response, passed through unchanged.
#[instrument(skip(state))]
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = SearchQuery::from(params);

    match state.index.search(&query).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            error!(error = %e, "Search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// `GET /health`: whether the engine reports itself healthy.
pub async fn health(State(state): State<AppState>) -> Response {
    let healthy = match state.index.client().health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            warn!(error = %e, "Health check failed");
            false
        }
    };

    if healthy {
        Json(json!({ "status": "ok" })).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded" })),
        )
            .into_response()
    }
}

/// Serve `router` until `shutdown` resolves, then drain for at most
/// [`SHUTDOWN_TIMEOUT`].
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<(), IndexingError>
where
    F: Future<Output = ()>,
{
    let stop = Arc::new(Notify::new());
    let trigger = Arc::clone(&stop);

    let server = axum::serve(listener, router)
        .with_graceful_shutdown(async move { trigger.notified().await });
    let mut server = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut server => return flatten(result),
        _ = shutdown => {
            info!("Shutting down server...");
            stop.notify_one();
        }
    }

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut server).await {
        Ok(result) => flatten(result),
        Err(_) => {
            warn!(timeout = ?SHUTDOWN_TIMEOUT, "Server did not drain in time, forcing shutdown");
            server.abort();
            Ok(())
        }
    }
}

fn flatten(result: Result<io::Result<()>, tokio::task::JoinError>) -> Result<(), IndexingError> {
    result.map_err(io::Error::other)??;
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
