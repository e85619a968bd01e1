//! Chat gateway: `POST /api/chat` plus the browser chat page.

use gemini_gateway::config::GatewayConfig;
use gemini_gateway::server::{self, Gateway};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // A missing .env file is fine; the environment may already be set
    let _ = dotenvy::dotenv();
    server::init_tracing();

    let config = GatewayConfig::from_env(Gateway::Chat.default_model()).map_err(|e| {
        tracing::error!("{}", e);
        std::io::Error::other(e.to_string())
    })?;

    server::run(Gateway::Chat, config).await
}
