//! Pixpress Infrastructure Library
//!
//! Shared infrastructure for the HTTP service:
//! - Middleware (request ID, security headers)
//! - Tracing subscriber initialization

pub mod middleware;
pub mod telemetry;

pub use middleware::{
    request_id_middleware, security_headers_middleware, RequestId, SecurityHeadersConfig,
};
pub use telemetry::init_telemetry;
