//! Rate Limiting Middleware
//!
//! In-process sliding window rate limiting keyed by client identity.
//! Authentication endpoints get a stricter budget than the rest of the API.

use std::collections::VecDeque;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use serde::Serialize;

use crate::config::RateLimitSettings;
use crate::presentation::middleware::auth::AuthUser;
use crate::shared::error::ErrorResponse;
use crate::startup::AppState;

// ============================================================================
// Rate Limit Configuration
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per window
    pub requests_per_window: u32,
    /// Window duration in seconds
    pub window_seconds: u64,
}

/// Endpoint groups with separate budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointType {
    /// Login, register, refresh
    Auth,
    /// Everything else under `/api`
    Api,
}

impl EndpointType {
    pub fn config(&self, settings: &RateLimitSettings) -> RateLimitConfig {
        let requests_per_window = match self {
            EndpointType::Auth => settings.auth_requests_per_window,
            EndpointType::Api => settings.api_requests_per_window,
        };
        RateLimitConfig {
            requests_per_window,
            window_seconds: settings.window_seconds,
        }
    }
}

// ============================================================================
// Rate Limit Response
// ============================================================================

/// Information about rate limit status returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window
    pub limit: u32,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Unix timestamp when the rate limit resets
    pub reset_at: i64,
    /// Seconds until the rate limit resets
    pub retry_after: u64,
}

#[derive(Debug, Serialize)]
struct RateLimitExceededResponse {
    #[serde(flatten)]
    error: ErrorResponse,
    rate_limit: RateLimitInfo,
}

// ============================================================================
// Rate Limiter Implementation
// ============================================================================

/// Sliding window rate limiter.
///
/// Each identifier maps to the timestamps (ms) of its requests inside the
/// current window. Entries older than the window are dropped on every check.
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: DashMap<String, VecDeque<i64>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
        }
    }

    /// Check and record a request at the current time.
    pub fn check(&self, identifier: &str) -> Result<RateLimitInfo, RateLimitInfo> {
        self.check_at(identifier, chrono::Utc::now().timestamp_millis())
    }

    /// Returns `Ok` when allowed, `Err` when rate limited.
    pub fn check_at(&self, identifier: &str, now_ms: i64) -> Result<RateLimitInfo, RateLimitInfo> {
        let window_ms = (self.config.window_seconds * 1000) as i64;
        let window_start = now_ms - window_ms;
        let limit = self.config.requests_per_window;

        let mut entry = self.windows.entry(identifier.to_string()).or_default();
        let timestamps = entry.value_mut();
        while timestamps.front().is_some_and(|&t| t <= window_start) {
            timestamps.pop_front();
        }

        let reset_at_ms = timestamps.front().map_or(now_ms, |&t| t) + window_ms;
        let reset_at = (reset_at_ms + 999) / 1000;

        if (timestamps.len() as u32) < limit {
            timestamps.push_back(now_ms);
            Ok(RateLimitInfo {
                limit,
                remaining: limit - timestamps.len() as u32,
                reset_at,
                retry_after: 0,
            })
        } else {
            let retry_ms = (reset_at_ms - now_ms).max(0);
            Err(RateLimitInfo {
                limit,
                remaining: 0,
                reset_at,
                retry_after: (retry_ms as u64).div_ceil(1000),
            })
        }
    }

    /// Drop identifiers with no requests inside the window.
    pub fn purge_idle(&self, now_ms: i64) {
        let window_start = now_ms - (self.config.window_seconds * 1000) as i64;
        self.windows
            .retain(|_, timestamps| timestamps.back().is_some_and(|&t| t > window_start));
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

/// Limiters shared through application state.
pub struct RateLimiters {
    pub auth: RateLimiter,
    pub api: RateLimiter,
}

impl RateLimiters {
    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        Self {
            auth: RateLimiter::new(EndpointType::Auth.config(settings)),
            api: RateLimiter::new(EndpointType::Api.config(settings)),
        }
    }

    fn for_endpoint(&self, endpoint_type: EndpointType) -> &RateLimiter {
        match endpoint_type {
            EndpointType::Auth => &self.auth,
            EndpointType::Api => &self.api,
        }
    }

    /// Periodically purge idle identifiers until the process exits.
    pub fn spawn_cleanup(self: &Arc<Self>, every: std::time::Duration) {
        let limiters = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let now_ms = chrono::Utc::now().timestamp_millis();
                limiters.auth.purge_idle(now_ms);
                limiters.api.purge_idle(now_ms);
            }
        });
    }
}

// ============================================================================
// Identifier Extraction
// ============================================================================

/// Extract the rate limit identifier from a request.
///
/// Priority:
/// 1. Authenticated user ID
/// 2. X-Forwarded-For header (first hop)
/// 3. X-Real-IP header
/// 4. Client IP address
fn extract_identifier(request: &Request, client_ip: Option<IpAddr>) -> String {
    if let Some(auth_user) = request.extensions().get::<AuthUser>() {
        return format!("user:{}", auth_user.user_id);
    }

    // Note: This header can be spoofed if not behind a trusted proxy
    if let Some(forwarded_for) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(first_ip) = forwarded_for.split(',').next() {
            let ip = first_ip.trim();
            if ip.parse::<IpAddr>().is_ok() {
                return format!("ip:{}", ip);
            }
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
    {
        if real_ip.parse::<IpAddr>().is_ok() {
            return format!("ip:{}", real_ip);
        }
    }

    match client_ip {
        Some(ip) => format!("ip:{}", ip),
        None => {
            tracing::warn!("Could not determine client identifier for rate limiting");
            "ip:unknown".to_string()
        }
    }
}

// ============================================================================
// Middleware Functions
// ============================================================================

/// Rate limiting middleware for authentication endpoints.
pub async fn rate_limit_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    rate_limit_inner(state, request, next, EndpointType::Auth).await
}

/// Rate limiting middleware for standard API endpoints.
pub async fn rate_limit_api(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    rate_limit_inner(state, request, next, EndpointType::Api).await
}

async fn rate_limit_inner(
    state: AppState,
    request: Request,
    next: Next,
    endpoint_type: EndpointType,
) -> Response {
    // Present when served with `into_make_service_with_connect_info`
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let identifier = extract_identifier(&request, client_ip);

    match state.rate_limiters.for_endpoint(endpoint_type).check(&identifier) {
        Ok(info) => {
            let mut response = next.run(request).await;
            add_rate_limit_headers(response.headers_mut(), &info);
            response
        }
        Err(info) => {
            tracing::warn!(
                identifier = %identifier,
                endpoint_type = ?endpoint_type,
                "Rate limit exceeded"
            );
            create_rate_limit_response(info)
        }
    }
}

fn add_rate_limit_headers(headers: &mut header::HeaderMap, info: &RateLimitInfo) {
    if let Ok(v) = header::HeaderValue::from_str(&info.limit.to_string()) {
        headers.insert("X-RateLimit-Limit", v);
    }
    if let Ok(v) = header::HeaderValue::from_str(&info.remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", v);
    }
    if let Ok(v) = header::HeaderValue::from_str(&info.reset_at.to_string()) {
        headers.insert("X-RateLimit-Reset", v);
    }
}

/// Create a 429 Too Many Requests response.
fn create_rate_limit_response(info: RateLimitInfo) -> Response {
    let mut headers = header::HeaderMap::new();
    add_rate_limit_headers(&mut headers, &info);
    if let Ok(v) = header::HeaderValue::from_str(&info.retry_after.to_string()) {
        headers.insert(header::RETRY_AFTER, v);
    }

    let body = RateLimitExceededResponse {
        error: ErrorResponse {
            code: 10006,
            message: "You are being rate limited. Please slow down.".to_string(),
            errors: None,
        },
        rate_limit: info,
    };

    (StatusCode::TOO_MANY_REQUESTS, headers, Json(body)).into_response()
}

// ============================================================================
// Tests
// ============================================================================
