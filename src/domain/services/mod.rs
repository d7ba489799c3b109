//! # Domain Services
//!
//! Domain services encapsulate business logic that doesn't naturally belong
//! to a single entity. They are pure functions over domain entities.
//!
//! ## Services
//!
//! - **calendar**: Medication logs projected as calendar events
//! - **log_export**: CSV rendering of medication logs
//! - **note_extraction**: Parsing of language-model replies to medication notes

mod calendar;
mod log_export;
mod note_extraction;

pub use calendar::*;
pub use log_export::*;
pub use note_extraction::*;
