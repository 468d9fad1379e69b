//! Proxy Module
//!
//! HTTP surface of the caching proxy: the interception handler, the stats
//! and health endpoints, and the router wiring them together.
//!
//! # Endpoints
//! - `GET /stats` - Cache statistics and per-bucket usage
//! - `GET /healthz` - Health check endpoint
//! - everything else - intercepted, cached image traffic served
//!   cache-first, the rest relayed to the origin

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
