//! # gemini-gateway
//!
//! Two small HTTP gateways in front of the Gemini `generateContent` API:
//!
//! - **Chat gateway** (`chat-gateway`): `POST /api/chat` takes the whole conversation
//!   history and returns the model's reply. Also serves a browser chat page at `/`
//!   that keeps the history client-side.
//! - **Multimodal gateway** (`multimodal-gateway`): `POST /generate-text` plus
//!   `POST /generate-from-image`, `/generate-from-document` and `/generate-from-audio`,
//!   which accept a multipart upload and send it to the model as inline data.
//!
//! Neither service keeps state between requests. Uploaded files live in a temporary
//! file that is removed when the request finishes, whether it succeeded or not.
//!
//! ## Library Usage
//!
//! The provider client and response normalization work without the `server` feature:
//!
//! ```toml
//! [dependencies]
//! gemini-gateway = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,no_run
//! use gemini_gateway::config::GatewayConfig;
//! use gemini_gateway::gemini::{Content, GeminiClient, GenerativeModel, Part, extract_text};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = GatewayConfig::new("your-api-key", "gemini-2.0-flash");
//!     let client = GeminiClient::new(&config);
//!
//!     let response = client
//!         .generate_content(vec![Content::user(vec![Part::text("2+2=")])])
//!         .await?;
//!
//!     println!("{}", extract_text(&response));
//!     Ok(())
//! }
//! ```
//!
//! ## Server Mode
//!
//! ```bash
//! GEMINI_API_KEY=... cargo run --bin chat-gateway
//! GEMINI_API_KEY=... PORT=3001 cargo run --bin multimodal-gateway
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod gemini;

#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod server;
#[cfg(feature = "server")]
pub mod upload;

pub use chat::{ChatMessage, ChatRequest, ChatResult, ChatRole};
pub use config::GatewayConfig;
pub use error::{ApiError, ErrorResponse, ProviderError};
pub use gemini::{GeminiClient, GenerativeModel, ResponseShape, extract_text};
