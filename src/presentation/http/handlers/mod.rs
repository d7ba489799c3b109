//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod ai;
pub mod auth;
pub mod blog_post;
pub mod category;
pub mod health;
pub mod medication;
pub mod medication_log;
pub mod public_blog;
pub mod tag;
pub mod user;
