//! Gemini provider access: request payloads, the REST client and response normalization.

pub mod client;
pub mod extract;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{GeminiClient, GenerativeModel};
pub use extract::{ResponseShape, extract_text};
pub use types::{Content, InlineData, Part};
