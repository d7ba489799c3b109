//! Middleware
//!
//! Tower middleware for request processing.

pub mod auth;
pub mod cors;
pub mod metrics;
pub mod rate_limit;
pub mod security;

pub use auth::{require_admin, require_auth, AuthUser};
pub use metrics::track_metrics;
pub use rate_limit::{
    rate_limit_api, rate_limit_auth, EndpointType, RateLimitConfig, RateLimitInfo, RateLimiter,
    RateLimiters,
};
pub use security::{create_security_headers_layer, SecurityHeadersConfig, SecurityHeadersLayer};
