//! Server bootstrap shared by the two gateway binaries.

use crate::config::{CHAT_MODEL, GatewayConfig, MULTIMODAL_MODEL};
use crate::gemini::{GeminiClient, GenerativeModel};
use crate::routes::chat::ChatApiDoc;
use crate::routes::multimodal::MultimodalApiDoc;
use crate::routes::{self, AppState, json_config};
use actix_web::middleware::{Condition, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Gateway {
    #[strum(serialize = "chat gateway")]
    Chat,
    #[strum(serialize = "multimodal gateway")]
    Multimodal,
}

impl Gateway {
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Gateway::Chat => CHAT_MODEL,
            Gateway::Multimodal => MULTIMODAL_MODEL,
        }
    }

    /// The browser chat page is served cross-origin friendly; the upload API is not.
    const fn allows_cors(self) -> bool {
        matches!(self, Gateway::Chat)
    }

    /// Registers this gateway's routes and its Swagger UI.
    pub fn configure(
        self,
        cfg: &mut web::ServiceConfig,
    ) {
        let openapi = match self {
            Gateway::Chat => ChatApiDoc::openapi(),
            Gateway::Multimodal => MultimodalApiDoc::openapi(),
        };

        // Swagger UI first so the chat gateway's preflight catch-all doesn't shadow it
        cfg.service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", openapi));

        match self {
            Gateway::Chat => routes::chat::configure(cfg),
            Gateway::Multimodal => routes::multimodal::configure(cfg),
        }
    }
}

/// Initializes `tracing` output, honouring `RUST_LOG` and defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type"))
}

/// Runs `gateway` until the process is stopped.
///
/// # Errors
///
/// Returns an error if the upload directory cannot be created or the address cannot be bound.
pub async fn run(
    gateway: Gateway,
    config: GatewayConfig,
) -> std::io::Result<()> {
    if gateway == Gateway::Multimodal {
        tokio::fs::create_dir_all(&config.upload_dir).await?;
    }

    let model: Arc<dyn GenerativeModel> = Arc::new(GeminiClient::new(&config));
    let state = web::Data::new(AppState::new(model, config.upload_dir.clone()));

    tracing::info!(
        "Starting {} at http://{}:{} (model {}, docs at /swagger-ui/)",
        gateway,
        config.host,
        config.port,
        config.model
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(json_config())
            .wrap(Condition::new(gateway.allows_cors(), cors_headers()))
            .configure(|cfg| gateway.configure(cfg))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::mock::MockModel;
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[::core::prelude::v1::test]
    fn test_default_models() {
        assert_eq!(Gateway::Chat.default_model(), "gemini-2.5-flash");
        assert_eq!(Gateway::Multimodal.default_model(), "gemini-2.0-flash");
        assert_eq!(Gateway::Chat.to_string(), "chat gateway");
    }

    #[::core::prelude::v1::test]
    fn test_openapi_documents_routes() {
        let chat = ChatApiDoc::openapi();
        assert!(chat.paths.paths.contains_key("/api/chat"));

        let multimodal = MultimodalApiDoc::openapi();
        for path in ["/generate-text", "/generate-from-image", "/generate-from-document", "/generate-from-audio"] {
            assert!(multimodal.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[actix_web::test]
    async fn test_chat_gateway_sends_cors_headers() {
        let model: Arc<dyn GenerativeModel> = Arc::new(MockModel::replying("hi"));
        let state = web::Data::new(AppState::new(model, std::env::temp_dir()));
        let gateway = Gateway::Chat;
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(json_config())
                .wrap(Condition::new(gateway.allows_cors(), cors_headers()))
                .configure(|cfg| gateway.configure(cfg)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(serde_json::json!({ "messages": [{ "role": "user", "content": "Hi" }] }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("access-control-allow-origin").unwrap(), "*");

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api-doc/openapi.json").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_multimodal_gateway_has_no_cors_headers() {
        let dir = tempfile::tempdir().unwrap();
        let model: Arc<dyn GenerativeModel> = Arc::new(MockModel::replying("4"));
        let state = web::Data::new(AppState::new(model, dir.path()));
        let gateway = Gateway::Multimodal;
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(json_config())
                .wrap(Condition::new(gateway.allows_cors(), cors_headers()))
                .configure(|cfg| gateway.configure(cfg)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate-text")
            .set_json(serde_json::json!({ "prompt": "2+2=" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get("access-control-allow-origin").is_none());
    }
}
