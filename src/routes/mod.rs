//! HTTP routes for both gateways.

pub mod chat;
pub mod multimodal;

use crate::error::ApiError;
use crate::gemini::GenerativeModel;
use actix_web::web;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared, read-only per-service state.
pub struct AppState {
    pub model: Arc<dyn GenerativeModel>,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        upload_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            model,
            upload_dir: upload_dir.into(),
        }
    }
}

/// JSON extractor config that reports malformed bodies as `{"error": ...}` with HTTP 400.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::warn!("Rejected JSON body: {}", err);
        ApiError::bad_request(err.to_string()).into()
    })
}
