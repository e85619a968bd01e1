use crate::chat::{ChatMessage, ChatRequest, ChatResult, ChatRole};
use crate::error::{ApiError, ErrorResponse};
use crate::gemini::extract_text;
use crate::routes::AppState;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, guard, post, web};
use utoipa::OpenApi;

// Browser chat page, embedded at compile time
const INDEX_HTML: &str = include_str!("../../static/index.html");
const SCRIPT_JS: &str = include_str!("../../static/script.js");
const STYLE_CSS: &str = include_str!("../../static/style.css");

#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Generated reply", body = ChatResult),
        (status = 400, description = "Missing or malformed messages", body = ErrorResponse),
        (status = 500, description = "Provider error", body = ErrorResponse)
    )
)]
#[post("/api/chat")]
pub async fn chat(
    state: web::Data<AppState>,
    body: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    request.validate()?;

    tracing::info!(
        "Chat request with {} message(s) using model {}",
        request.messages.len(),
        state.model.model()
    );

    let response = state
        .model
        .generate_content(request.to_contents())
        .await
        .inspect_err(|e| tracing::error!("Chat generation failed: {}", e))?;

    Ok(HttpResponse::Ok().json(ChatResult {
        result: extract_text(&response),
    }))
}

#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(INDEX_HTML)
}

#[get("/index.html")]
async fn index_html() -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(INDEX_HTML)
}

#[get("/script.js")]
async fn script() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(SCRIPT_JS)
}

#[get("/style.css")]
async fn style() -> HttpResponse {
    HttpResponse::Ok().content_type("text/css; charset=utf-8").body(STYLE_CSS)
}

async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[derive(OpenApi)]
#[openapi(
    paths(chat),
    components(schemas(ChatRequest, ChatMessage, ChatRole, ChatResult, ErrorResponse))
)]
pub struct ChatApiDoc;

/// Registers the chat API, the chat page and CORS preflight handling.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(chat)
        .service(index)
        .service(index_html)
        .service(script)
        .service(style)
        .service(web::resource("/{tail:.*}").guard(guard::Options()).to(preflight));
}
