//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! - **ConsumerCategory**: Consumer-side naming of blog post types

mod consumer_category;

pub use consumer_category::*;
