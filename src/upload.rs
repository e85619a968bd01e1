//! Temporary storage for multipart uploads
//!
//! Every uploaded file is streamed to a uniquely named file in the upload directory and
//! owned by a [`TempUpload`]. The file is removed when the guard is dropped, so it never
//! outlives the request that created it, whatever path the handler exits through.

use crate::error::ApiError;
use crate::gemini::Part;
use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

/// Per-file size cap, matching the provider's inline data limit.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
/// Cap for plain text form fields such as `prompt`.
pub const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// An uploaded file on disk, deleted on drop.
#[derive(Debug)]
pub struct TempUpload {
    path: TempPath,
    field: String,
    file_name: Option<String>,
    mime_type: String,
    size: usize,
}

impl TempUpload {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Declared content type of the part.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Reads the file and wraps it as a base64 inline data part.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file can no longer be read.
    pub async fn to_inline_part(&self) -> std::io::Result<Part> {
        let bytes = tokio::fs::read(self.path()).await?;
        Ok(Part::inline(self.mime_type.clone(), &bytes))
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        tracing::debug!("Removing upload '{}' at {}", self.field, self.path.display());
    }
}

/// Parsed multipart form: stored files plus text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    files: HashMap<String, TempUpload>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Consumes the multipart payload.
    ///
    /// Only file parts named in `file_fields` and text parts named in `text_fields` are kept;
    /// every other part is drained and discarded. File parts with an empty file name and no
    /// content (an unset browser file input) are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] for malformed payloads or oversized parts and
    /// [`ApiError::Internal`] if the upload directory cannot be written.
    pub async fn from_multipart(
        mut payload: Multipart,
        upload_dir: &Path,
        file_fields: &[&str],
        text_fields: &[&str],
    ) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = payload.next().await {
            let mut field = field?;
            let Some(name) = field.name().map(str::to_owned) else {
                drain(&mut field).await?;
                continue;
            };

            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_owned);

            match file_name {
                Some(file_name) if file_fields.contains(&name.as_str()) => {
                    if let Some(upload) = store_file(&mut field, upload_dir, &name, file_name).await? {
                        tracing::info!(
                            "Stored upload '{}' from {} ({} bytes, {})",
                            upload.field(),
                            upload.file_name().unwrap_or("<unnamed>"),
                            upload.size(),
                            upload.mime_type()
                        );
                        form.files.insert(name, upload);
                    }
                }
                Some(_) => {
                    tracing::debug!("Discarding unexpected file field '{}'", name);
                    drain(&mut field).await?;
                }
                None if text_fields.contains(&name.as_str()) => {
                    let value = read_text(&mut field, &name).await?;
                    form.fields.insert(name, value);
                }
                None => {
                    tracing::debug!("Discarding unexpected text field '{}'", name);
                    drain(&mut field).await?;
                }
            }
        }

        Ok(form)
    }

    /// Value of a text field.
    #[must_use]
    pub fn text(
        &self,
        name: &str,
    ) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn take_file(
        &mut self,
        name: &str,
    ) -> Option<TempUpload> {
        self.files.remove(name)
    }

    /// The validation step shared by every upload endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] with `No <label> file uploaded.` if the field is missing.
    pub fn require_file(
        &mut self,
        name: &str,
        label: &str,
    ) -> Result<TempUpload, ApiError> {
        self.take_file(name)
            .ok_or_else(|| ApiError::bad_request(format!("No {label} file uploaded.")))
    }
}

async fn store_file(
    field: &mut Field,
    upload_dir: &Path,
    name: &str,
    file_name: String,
) -> Result<Option<TempUpload>, ApiError> {
    let mime_type = field
        .content_type()
        .map_or_else(|| DEFAULT_MIME_TYPE.to_string(), ToString::to_string);

    let (file, path) = tempfile::Builder::new()
        .prefix("upload-")
        .tempfile_in(upload_dir)?
        .into_parts();
    let mut file = tokio::fs::File::from_std(file);
    let mut size = 0;

    // `path` is dropped (and the file removed) on any early return below.
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        size += chunk.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(ApiError::bad_request(format!(
                "Uploaded file exceeds the {} MiB limit.",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    if size == 0 && file_name.is_empty() {
        return Ok(None);
    }

    Ok(Some(TempUpload {
        path,
        field: name.to_string(),
        file_name: Some(file_name).filter(|n| !n.is_empty()),
        mime_type,
        size,
    }))
}

async fn read_text(
    field: &mut Field,
    name: &str,
) -> Result<String, ApiError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(ApiError::bad_request(format!("Form field '{name}' is too large.")));
        }
        buf.extend_from_slice(&chunk);
    }
    String::from_utf8(buf).map_err(|_| ApiError::bad_request(format!("Form field '{name}' is not valid UTF-8.")))
}

async fn drain(field: &mut Field) -> Result<(), ApiError> {
    while let Some(chunk) = field.next().await {
        chunk?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::Part;
    use crate::routes::test_support::{self, FormPart};
    use actix_web::error::PayloadError;
    use actix_web::http::header::{self, HeaderMap, HeaderValue};
    use actix_web::web::Bytes;

    fn temp_upload(
        dir: &Path,
        contents: &[u8],
    ) -> TempUpload {
        let file = tempfile::Builder::new().prefix("upload-").tempfile_in(dir).unwrap();
        std::fs::write(file.path(), contents).unwrap();
        TempUpload {
            path: file.into_temp_path(),
            field: "image".to_string(),
            file_name: Some("cat.png".to_string()),
            mime_type: "image/png".to_string(),
            size: contents.len(),
        }
    }

    #[test]
    fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let upload = temp_upload(dir.path(), b"png bytes");
        let path = upload.path().to_path_buf();

        assert!(path.exists());
        drop(upload);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_to_inline_part() {
        let dir = tempfile::tempdir().unwrap();
        let upload = temp_upload(dir.path(), b"png bytes");

        assert_eq!(upload.field(), "image");
        assert_eq!(upload.file_name(), Some("cat.png"));
        assert_eq!(upload.size(), 9);
        assert_eq!(upload.to_inline_part().await.unwrap(), Part::inline("image/png", b"png bytes"));
    }

    fn multipart_payload(body: Vec<u8>) -> Multipart {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(&test_support::content_type()).unwrap(),
        );
        let stream = futures_util::stream::once(async move { Ok::<_, PayloadError>(Bytes::from(body)) });
        Multipart::new(&headers, stream)
    }

    #[actix_web::test]
    async fn test_unrequested_text_fields_are_not_kept() {
        let dir = tempfile::tempdir().unwrap();
        let names: Vec<String> = (0..200).map(|i| format!("f{i}")).collect();
        let filler = vec![b'a'; 1024];

        let mut parts: Vec<FormPart<'_>> = names
            .iter()
            .map(|name| FormPart {
                name,
                file: None,
                data: &filler,
            })
            .collect();
        parts.push(FormPart {
            name: "prompt",
            file: None,
            data: b"Count the cats",
        });

        let payload = multipart_payload(test_support::multipart_body(&parts));
        let form = UploadForm::from_multipart(payload, dir.path(), &["image"], &["prompt"])
            .await
            .unwrap();

        assert_eq!(form.fields.len(), 1);
        assert_eq!(form.text("prompt"), Some("Count the cats"));
        assert!(form.text("f0").is_none());
    }

    #[actix_web::test]
    async fn test_text_fields_ignored_when_none_requested() {
        let dir = tempfile::tempdir().unwrap();
        let body = test_support::multipart_body(&[
            FormPart {
                name: "prompt",
                file: None,
                data: b"ignored",
            },
            FormPart {
                name: "audio",
                file: Some(("note.mp3", "audio/mpeg")),
                data: b"ID3",
            },
        ]);

        let mut form = UploadForm::from_multipart(multipart_payload(body), dir.path(), &["audio"], &[])
            .await
            .unwrap();

        assert!(form.fields.is_empty());
        let upload = form.require_file("audio", "audio").unwrap();
        assert_eq!(upload.file_name(), Some("note.mp3"));
        assert_eq!(upload.size(), 3);
    }

    #[test]
    fn test_require_file_missing() {
        let mut form = UploadForm::default();
        let err = form.require_file("document", "document").unwrap_err();

        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(err.message(), "No document file uploaded.");
    }

    #[test]
    fn test_require_file_present() {
        let dir = tempfile::tempdir().unwrap();
        let mut form = UploadForm::default();
        form.files.insert("image".to_string(), temp_upload(dir.path(), b"x"));
        form.fields.insert("prompt".to_string(), "What breed?".to_string());

        assert_eq!(form.text("prompt"), Some("What breed?"));
        let upload = form.require_file("image", "image").unwrap();
        assert_eq!(upload.mime_type(), "image/png");
        assert!(form.take_file("image").is_none());
    }
}
