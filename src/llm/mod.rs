//! Gemini-backed implementations of the extraction and advice collaborators.

pub mod advisor;
pub mod client;
pub mod extractor;
pub mod prompts;
pub mod types;
pub mod utils;

pub use advisor::*;
pub use client::*;
pub use extractor::*;
pub use types::*;
