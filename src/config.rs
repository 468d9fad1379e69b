//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Origin the proxy forwards to, e.g. "http://localhost:3000"
    pub upstream_origin: String,
    /// Version tag baked into bucket names; bumping it invalidates all
    /// buckets from earlier deployments at activation
    pub cache_version: String,
    /// Path of the image served when both cache and origin fail
    pub fallback_asset: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `UPSTREAM_ORIGIN` - Origin base URL (default: http://localhost:3000)
    /// - `CACHE_VERSION` - Bucket version tag (default: v1)
    /// - `FALLBACK_ASSET` - Fallback image path (default: /assets/fallback-image.svg)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            upstream_origin: env::var("UPSTREAM_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            cache_version: env::var("CACHE_VERSION").unwrap_or_else(|_| "v1".to_string()),
            fallback_asset: env::var("FALLBACK_ASSET")
                .unwrap_or_else(|_| "/assets/fallback-image.svg".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            upstream_origin: "http://localhost:3000".to_string(),
            cache_version: "v1".to_string(),
            fallback_asset: "/assets/fallback-image.svg".to_string(),
        }
    }
}
