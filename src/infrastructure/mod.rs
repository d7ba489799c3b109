//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database pool, migrations and repositories (PostgreSQL)
//! - Language model client for note extraction
//! - Prometheus metrics

pub mod ai;
pub mod database;
pub mod metrics;
pub mod repositories;
