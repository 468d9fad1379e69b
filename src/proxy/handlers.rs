//! Proxy Handlers
//!
//! The fetch interception entry point plus the stats and health endpoints.
//!
//! Every request that is not a GET for an image bypasses the buckets
//! entirely and is relayed to the origin. Image requests run the
//! cache-first state machine: hit (touch and return), miss (fetch, store,
//! enforce capacity, return), or origin failure (fallback image, else 502).

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, Method, StatusCode},
    response::Response,
    Json,
};
use tokio::sync::RwLock;
use tracing::warn;

use crate::cache::{classify, is_image_path, CachedImage, TieredStore};
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::{HealthResponse, StatsResponse};
use crate::upstream::{HttpUpstream, OutboundRequest, Upstream, UpstreamResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The tiered cache, behind a single writer lock
    pub store: Arc<RwLock<TieredStore>>,
    /// Network side, injectable for tests
    pub upstream: Arc<dyn Upstream>,
    /// Path of the preloaded fallback image
    pub fallback_asset: String,
}

impl AppState {
    /// Creates a new AppState from a store and an upstream.
    pub fn new(
        store: TieredStore,
        upstream: Arc<dyn Upstream>,
        fallback_asset: impl Into<String>,
    ) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            upstream,
            fallback_asset: fallback_asset.into(),
        }
    }

    /// Creates a new AppState from configuration, with a live HTTP upstream.
    pub fn from_config(config: &Config) -> Self {
        let store = TieredStore::new(config.cache_version.clone());
        let upstream = Arc::new(HttpUpstream::new(config.upstream_origin.clone()));
        Self::new(store, upstream, config.fallback_asset.clone())
    }
}

// == Eligibility ==
/// Whether a request is subject to image caching.
///
/// Eligible iff the method is GET and either the path carries an image
/// extension or the client declared an image destination via
/// `Sec-Fetch-Dest`. Everything else goes straight to the origin.
pub fn is_image_request(method: &Method, path: &str, fetch_dest: Option<&str>) -> bool {
    method == Method::GET && (is_image_path(path) || fetch_dest == Some("image"))
}

// == Intercept Handler ==
/// Fallback route handler: intercepts every request not matched by an
/// explicit route.
pub async fn intercept_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response> {
    let (parts, body) = request.into_parts();

    let path = parts.uri.path().to_string();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    let fetch_dest = parts
        .headers
        .get("sec-fetch-dest")
        .and_then(|v| v.to_str().ok());

    if !is_image_request(&parts.method, &path, fetch_dest) {
        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        return passthrough(&state, parts.method, path_and_query, content_type, body).await;
    }

    // The cache key is the full path and query; classification looks at the
    // same string the origin will resolve.
    let kind = classify(&path_and_query);

    // Hit path: the lookup itself refreshes recency, so the entry is already
    // most-recently-used by the time we respond.
    {
        let mut store = state.store.write().await;
        if let Some(entry) = store.lookup(kind, &path_and_query) {
            return cached_response(entry);
        }
    }

    // Miss path. The lock is not held across the origin fetch, so two
    // concurrent misses for a near-full bucket may both insert before
    // either enforcement pass runs; the next pass clears the whole excess.
    match state.upstream.send(OutboundRequest::get(&path_and_query)).await {
        Ok(response) => {
            if response.is_cacheable() {
                let entry = CachedImage::new(response.body.clone(), response.content_type.clone());
                let mut store = state.store.write().await;
                store.insert(kind, path_and_query.clone(), entry);
                store.enforce_capacity(kind);
            }
            relay_response(response)
        }
        Err(err) => {
            warn!(path = %path_and_query, error = %err, "origin fetch failed, trying fallback");
            let mut store = state.store.write().await;
            match store.serve_fallback(&state.fallback_asset) {
                Some(entry) => cached_response(entry),
                None => Err(ProxyError::FallbackUnavailable),
            }
        }
    }
}

// == Passthrough ==
/// Relays a non-image request to the origin without touching any bucket.
async fn passthrough(
    state: &AppState,
    method: Method,
    path_and_query: String,
    content_type: Option<String>,
    body: Body,
) -> Result<Response> {
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| ProxyError::InvalidRequest(e.to_string()))?;

    let outbound = OutboundRequest {
        method,
        path_and_query,
        content_type,
        body,
    };

    let response = state
        .upstream
        .send(outbound)
        .await
        .map_err(|e| ProxyError::UpstreamUnavailable(e.to_string()))?;

    relay_response(response)
}

// == Response Builders ==
/// Builds a 200 response from a cached entry.
fn cached_response(entry: CachedImage) -> Result<Response> {
    let mut builder = Response::builder().status(StatusCode::OK);
    if let Some(content_type) = &entry.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(entry.body))
        .map_err(|e| ProxyError::Internal(e.to_string()))
}

/// Builds a response relaying an origin response as-is.
fn relay_response(response: UpstreamResponse) -> Result<Response> {
    let status = StatusCode::from_u16(response.status)
        .map_err(|e| ProxyError::Internal(e.to_string()))?;
    let mut builder = Response::builder().status(status);
    if let Some(content_type) = &response.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(response.body))
        .map_err(|e| ProxyError::Internal(e.to_string()))
}

// == Stats Handler ==
/// Handler for GET /stats
///
/// Returns current cache statistics and per-bucket usage.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.store.read().await;
    let stats = store.stats();
    let sizes = store.bucket_sizes();

    Json(StatsResponse::new(&stats, sizes))
}

// == Health Handler ==
/// Handler for GET /healthz
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
