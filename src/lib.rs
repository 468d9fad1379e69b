//! Tiercache - A tiered image caching reverse proxy
//!
//! Intercepts GET requests for image assets, serves them cache-first from
//! capacity-limited LRU buckets, and falls back to a preloaded image when
//! both cache and origin fail.

pub mod cache;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod proxy;
pub mod upstream;

pub use config::Config;
pub use proxy::{create_router, AppState};
