use crate::error::{ApiError, ErrorResponse};
use crate::gemini::{Content, Part, extract_text};
use crate::routes::AppState;
use crate::upload::UploadForm;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct TextPrompt {
    pub prompt: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct GenerationOutput {
    pub output: String,
}

/// Multipart body of `/generate-from-image`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImageForm {
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
    /// Defaults to "Describe the image".
    prompt: Option<String>,
}

/// Multipart body of `/generate-from-document`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct DocumentForm {
    #[schema(value_type = String, format = Binary)]
    document: Vec<u8>,
}

/// Multipart body of `/generate-from-audio`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct AudioForm {
    #[schema(value_type = String, format = Binary)]
    audio: Vec<u8>,
}

/// How an upload endpoint names its file field and instructs the model.
#[derive(Debug, Clone, Copy)]
pub struct UploadEndpoint {
    pub field: &'static str,
    pub label: &'static str,
    pub instruction: &'static str,
    /// Whether a non-blank `prompt` form field replaces `instruction`.
    pub prompt_override: bool,
}

pub const IMAGE: UploadEndpoint = UploadEndpoint {
    field: "image",
    label: "image",
    instruction: "Describe the image",
    prompt_override: true,
};

pub const DOCUMENT: UploadEndpoint = UploadEndpoint {
    field: "document",
    label: "document",
    instruction: "Analyze this document:",
    prompt_override: false,
};

pub const AUDIO: UploadEndpoint = UploadEndpoint {
    field: "audio",
    label: "audio",
    instruction: "Transcribe or analyze the following audio:",
    prompt_override: false,
};

impl UploadEndpoint {
    fn prompt<'a>(
        &self,
        form: &'a UploadForm,
    ) -> &'a str {
        if self.prompt_override {
            if let Some(prompt) = form.text("prompt").filter(|p| !p.trim().is_empty()) {
                return prompt;
            }
        }
        self.instruction
    }
}

#[utoipa::path(
    post,
    path = "/generate-text",
    request_body = TextPrompt,
    responses(
        (status = 200, description = "Generated text", body = GenerationOutput),
        (status = 400, description = "Missing prompt", body = ErrorResponse),
        (status = 500, description = "Provider error", body = ErrorResponse)
    )
)]
#[post("/generate-text")]
pub async fn generate_text(
    state: web::Data<AppState>,
    body: web::Json<TextPrompt>,
) -> Result<HttpResponse, ApiError> {
    let TextPrompt { prompt } = body.into_inner();
    if prompt.trim().is_empty() {
        return Err(ApiError::bad_request("Prompt is required."));
    }

    tracing::info!("Text generation request using model {}", state.model.model());

    let response = state
        .model
        .generate_content(vec![Content::user(vec![Part::text(prompt)])])
        .await
        .inspect_err(|e| tracing::error!("Text generation failed: {}", e))?;

    Ok(HttpResponse::Ok().json(GenerationOutput {
        output: extract_text(&response),
    }))
}

#[utoipa::path(
    post,
    path = "/generate-from-image",
    request_body(content = ImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Generated text", body = GenerationOutput),
        (status = 400, description = "No image file uploaded", body = ErrorResponse),
        (status = 500, description = "Provider error", body = ErrorResponse)
    )
)]
#[post("/generate-from-image")]
pub async fn generate_from_image(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    generate_from_upload(&state, payload, IMAGE).await
}

#[utoipa::path(
    post,
    path = "/generate-from-document",
    request_body(content = DocumentForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Generated text", body = GenerationOutput),
        (status = 400, description = "No document file uploaded", body = ErrorResponse),
        (status = 500, description = "Provider error", body = ErrorResponse)
    )
)]
#[post("/generate-from-document")]
pub async fn generate_from_document(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    generate_from_upload(&state, payload, DOCUMENT).await
}

#[utoipa::path(
    post,
    path = "/generate-from-audio",
    request_body(content = AudioForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Generated text", body = GenerationOutput),
        (status = 400, description = "No audio file uploaded", body = ErrorResponse),
        (status = 500, description = "Provider error", body = ErrorResponse)
    )
)]
#[post("/generate-from-audio")]
pub async fn generate_from_audio(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    generate_from_upload(&state, payload, AUDIO).await
}

/// Validate, encode, generate. The upload guard is dropped (and its file deleted) on
/// every return from this function.
async fn generate_from_upload(
    state: &AppState,
    payload: Multipart,
    endpoint: UploadEndpoint,
) -> Result<HttpResponse, ApiError> {
    let text_fields: &[&str] = if endpoint.prompt_override { &["prompt"] } else { &[] };
    let mut form = UploadForm::from_multipart(payload, &state.upload_dir, &[endpoint.field], text_fields).await?;
    let upload = form.require_file(endpoint.field, endpoint.label)?;

    tracing::info!(
        "Generating from {} upload '{}' ({} bytes, {}) using model {}",
        upload.field(),
        upload.file_name().unwrap_or("<unnamed>"),
        upload.size(),
        upload.mime_type(),
        state.model.model()
    );

    let attachment = upload.to_inline_part().await?;
    let contents = vec![Content::user(vec![Part::text(endpoint.prompt(&form)), attachment])];

    let response = state
        .model
        .generate_content(contents)
        .await
        .inspect_err(|e| tracing::error!("Generation from {} failed: {}", endpoint.label, e))?;

    Ok(HttpResponse::Ok().json(GenerationOutput {
        output: extract_text(&response),
    }))
}

#[derive(OpenApi)]
#[openapi(
    paths(generate_text, generate_from_image, generate_from_document, generate_from_audio),
    components(schemas(TextPrompt, GenerationOutput, ImageForm, DocumentForm, AudioForm, ErrorResponse))
)]
pub struct MultimodalApiDoc;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(generate_text)
        .service(generate_from_image)
        .service(generate_from_document)
        .service(generate_from_audio);
}
