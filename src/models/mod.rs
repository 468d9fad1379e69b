//! Response models for the proxy's own endpoints
//!
//! The proxy mostly relays raw image bytes; these DTOs cover the JSON
//! bodies of the stats, health, and error responses.

pub mod responses;

// Re-export commonly used types
pub use responses::{BucketUsage, ErrorResponse, HealthResponse, StatsResponse};
