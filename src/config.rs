//! Gateway configuration
//!
//! Both services are configured from the process environment (after `.env` is loaded)
//! into an explicit [`GatewayConfig`] that is handed to the server constructor.

use crate::error::ApiError;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Default model for the chat gateway.
pub const CHAT_MODEL: &str = "gemini-2.5-flash";
/// Default model for the multimodal gateway.
pub const MULTIMODAL_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub api_key: String,
    /// Bare model id, without a `models/` prefix.
    pub model: String,
    pub base_url: String,
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
}

impl GatewayConfig {
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: normalize_model(&model.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
        }
    }

    /// Reads the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if `GEMINI_API_KEY` is missing or `PORT` is not a valid port.
    pub fn from_env(default_model: &str) -> Result<Self, ApiError> {
        Self::from_lookup(default_model, |key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`GatewayConfig::from_env`].
    pub fn from_lookup(
        default_model: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ApiError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = var("GEMINI_API_KEY").ok_or_else(|| ApiError::config("GEMINI_API_KEY must be set"))?;
        let model = var("GEMINI_MODEL").unwrap_or_else(|| default_model.to_string());

        let mut config = Self::new(api_key, model);

        if let Some(port) = var("PORT") {
            config.port = port
                .parse()
                .map_err(|e| ApiError::config(format!("Invalid PORT '{port}': {e}")))?;
        }
        if let Some(host) = var("HOST") {
            config.host = host;
        }
        if let Some(base_url) = var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(dir) = var("UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_port(
        mut self,
        port: u16,
    ) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_base_url(
        mut self,
        base_url: impl Into<String>,
    ) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_upload_dir(
        mut self,
        upload_dir: impl Into<PathBuf>,
    ) -> Self {
        self.upload_dir = upload_dir.into();
        self
    }
}

fn normalize_model(model: &str) -> String {
    model.strip_prefix("models/").unwrap_or(model).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::from_lookup(CHAT_MODEL, lookup_from(&[("GEMINI_API_KEY", "secret")])).unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn test_overrides() {
        let config = GatewayConfig::from_lookup(
            MULTIMODAL_MODEL,
            lookup_from(&[
                ("GEMINI_API_KEY", "secret"),
                ("GEMINI_MODEL", "models/gemini-2.0-flash"),
                ("PORT", "8081"),
                ("HOST", "127.0.0.1"),
                ("GEMINI_BASE_URL", "http://localhost:9999"),
                ("UPLOAD_DIR", "/tmp/gateway"),
            ]),
        )
        .unwrap();

        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.port, 8081);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/gateway"));
    }

    #[test]
    fn test_missing_api_key() {
        let err = GatewayConfig::from_lookup(CHAT_MODEL, lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_invalid_port() {
        let err = GatewayConfig::from_lookup(
            CHAT_MODEL,
            lookup_from(&[("GEMINI_API_KEY", "secret"), ("PORT", "http")]),
        )
        .unwrap_err();
        assert!(err.message().contains("Invalid PORT"));
    }

    #[test]
    fn test_builder_methods() {
        let config = GatewayConfig::new("key", "gemini-2.0-flash")
            .with_port(0)
            .with_base_url("http://127.0.0.1:1234")
            .with_upload_dir("tmp");

        assert_eq!(config.port, 0);
        assert_eq!(config.base_url, "http://127.0.0.1:1234");
        assert_eq!(config.upload_dir, PathBuf::from("tmp"));
    }
}
