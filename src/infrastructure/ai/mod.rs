//! Language model clients.

pub mod openai_client;

pub use openai_client::OpenAiNoteExtractor;
