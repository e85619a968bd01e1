//! In-memory [`GenerativeModel`] used by handler tests.

use crate::error::ProviderError;
use crate::gemini::client::GenerativeModel;
use crate::gemini::types::Content;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;

pub struct MockModel {
    reply: Result<Value, ProviderError>,
    calls: Mutex<Vec<Vec<Content>>>,
}

impl MockModel {
    /// Replies with a standard `candidates[0].content.parts[0].text` response.
    pub fn replying(text: &str) -> Self {
        Self::with_response(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        }))
    }

    pub fn with_response(response: Value) -> Self {
        Self {
            reply: Ok(response),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(ProviderError::new(message)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every `contents` list received so far.
    pub fn calls(&self) -> Vec<Vec<Content>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate_content(
        &self,
        contents: Vec<Content>,
    ) -> Result<Value, ProviderError> {
        self.calls.lock().unwrap().push(contents);
        self.reply.clone()
    }
}
