//! Multimodal gateway: text, image, document and audio prompts.

use gemini_gateway::config::GatewayConfig;
use gemini_gateway::server::{self, Gateway};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenvy::dotenv();
    server::init_tracing();

    let config = GatewayConfig::from_env(Gateway::Multimodal.default_model()).map_err(|e| {
        tracing::error!("{}", e);
        std::io::Error::other(e.to_string())
    })?;

    server::run(Gateway::Multimodal, config).await
}
