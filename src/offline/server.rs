//! Local HTTP server answering app-shell requests through the offline worker.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tower_http::cors::{Any, CorsLayer};

use super::{CachedResponse, FetchOutcome, HttpNetwork, Network, OfflineWorker};
use crate::config::OfflineConfig;
use crate::error::{Error, Result};

type WorkerState<N> = Arc<OfflineWorker<N>>;

fn to_response(response: CachedResponse, cache: &'static str) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = axum::http::Response::builder()
        .status(status)
        .header("x-cache", cache);
    if let Some(content_type) = response.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(response.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

async fn serve_asset<N: Network + 'static>(
    State(worker): State<WorkerState<N>>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let path = uri.path_and_query().map_or("/", |p| p.as_str());
    let url = match worker.resolve(&format!(".{path}")) {
        Ok(url) => url,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match worker.fetch(&url).await {
        Ok(FetchOutcome::Cached(response)) => to_response(response, "hit"),
        Ok(FetchOutcome::Network(response)) => to_response(response, "miss"),
        Ok(FetchOutcome::Passthrough) => StatusCode::MISDIRECTED_REQUEST.into_response(),
        Err(e) => {
            log::warn!("Offline and not cached: {url} ({e})");
            (StatusCode::BAD_GATEWAY, "Offline").into_response()
        }
    }
}

/// Builds the router serving every path through `worker`.
pub fn router<N: Network + 'static>(worker: Arc<OfflineWorker<N>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .fallback(serve_asset::<N>)
        .layer(cors)
        .with_state(worker)
}

/// Installs and activates the worker, then serves until the process exits.
///
/// # Errors
///
/// Returns an error if the install fails, or the server cannot bind.
pub async fn run_server(config: &OfflineConfig) -> Result<()> {
    let worker = OfflineWorker::new(config, HttpNetwork::default())?;

    let cached = worker.install().await?;
    log::info!("Installed {cached} assets into {}", worker.cache_name());
    match worker.activate().await {
        Ok(deleted) if !deleted.is_empty() => {
            log::info!("Removed {} stale generation(s)", deleted.len());
        }
        Ok(_) => {}
        Err(e) => log::warn!("Cache activation failed: {e}"),
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| Error::Config(format!("bind address: {e}")))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Serving {} offline on http://{addr}", worker.origin());

    axum::serve(listener, router(Arc::new(worker))).await?;
    Ok(())
}
