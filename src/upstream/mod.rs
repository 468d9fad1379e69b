//! Upstream Module
//!
//! The network side of the proxy. Everything the proxy cannot answer from
//! its buckets goes through the [`Upstream`] trait, which keeps the handler
//! logic testable against a scripted fake instead of a live origin.

use async_trait::async_trait;
use axum::http::{header, Method};
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

// == Upstream Error ==
/// Transport-level failure reaching the origin.
///
/// Covers connection refusals, DNS failures, and body read errors. HTTP
/// error statuses are not errors here; they come back as responses.
#[derive(Debug, Error)]
#[error("upstream request failed: {0}")]
pub struct UpstreamError(pub String);

// == Outbound Request ==
/// The parts of an inbound request the proxy relays to the origin.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    /// Path plus query string, e.g. "/assets/logo.svg?v=2"
    pub path_and_query: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl OutboundRequest {
    /// Builds a bodyless GET for a path.
    pub fn get(path_and_query: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path_and_query: path_and_query.into(),
            content_type: None,
            body: Bytes::new(),
        }
    }
}

// == Upstream Response ==
/// A response fetched from the origin, fully buffered.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Whether this response may be stored in a bucket.
    ///
    /// Only plain 200 responses are cached; redirects, partial content,
    /// and error statuses are relayed without being stored.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200
    }
}

// == Upstream Trait ==
/// Sends requests to the configured origin.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn send(&self, req: OutboundRequest) -> Result<UpstreamResponse, UpstreamError>;
}

// == HTTP Upstream ==
/// Production [`Upstream`] backed by a reqwest client.
pub struct HttpUpstream {
    client: reqwest::Client,
    origin: String,
}

impl HttpUpstream {
    /// Creates a client targeting the given origin base URL.
    ///
    /// A trailing slash on the origin is trimmed so joining with the
    /// request path never doubles one up.
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            client: reqwest::Client::new(),
            origin: origin.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn send(&self, req: OutboundRequest) -> Result<UpstreamResponse, UpstreamError> {
        let url = format!("{}{}", self.origin, req.path_and_query);
        debug!(method = %req.method, %url, "forwarding to origin");

        let mut builder = self.client.request(req.method, &url);
        if let Some(content_type) = &req.content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if !req.body.is_empty() {
            builder = builder.body(req.body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| UpstreamError(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError(e.to_string()))?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
