//! REST API endpoint tests.

mod access_tests;
mod auth_tests;
mod consumer_tests;
mod health_tests;
mod middleware_tests;
mod upload_tests;
