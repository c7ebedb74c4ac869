pub mod client;
pub mod error;
pub mod json;

pub use client::{OllamaClient, OllamaConfig, TextGenerator};
pub use error::GenerationError;
pub use json::ParseError;
