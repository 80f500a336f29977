use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, ETAG};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use todo_app_shared::{FileListResponse, FileResponse, MessageResponse};
use tracing::debug;

use crate::error::WebError;
use crate::SharedState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// RFC 5987 `attr-char`s that can stay as they are.
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// `filename` gets an ASCII-only stand-in, `filename*` carries the real key.
fn content_disposition(key: &str) -> String {
    let fallback: String = key
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        utf8_percent_encode(key, FILENAME_ENCODE_SET)
    )
}

#[utoipa::path(
    get,
    path = "/v1/files",
    responses((status = 200, description = "Every stored file", body = FileListResponse))
)]
pub async fn list_files(State(state): State<SharedState>) -> Result<Json<FileListResponse>, WebError> {
    let files = state.files.list().await?;
    Ok(Json(FileListResponse { files }))
}

/// Multipart upload, the file goes in the `file` field and gets a generated key.
#[utoipa::path(
    post,
    path = "/v1/files",
    request_body(content_type = "multipart/form-data", description = "A `file` field"),
    responses(
        (status = 201, description = "File stored", body = FileResponse),
        (status = 400, description = "Missing or unreadable file field"),
    )
)]
pub async fn upload_file(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<FileResponse>), WebError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != "file" {
            debug!("Ignoring unknown multipart field: {}", field_name);
            continue;
        }
        let filename = field.file_name().map(|s| s.to_string());
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let data = field.bytes().await?;
        debug!("Read {} bytes for {:?}", data.len(), filename);
        upload = Some((filename, content_type, data));
    }

    let (filename, content_type, data) =
        upload.ok_or_else(|| WebError::bad_request("Missing file data in upload"))?;

    let file = state
        .files
        .upload_generated(filename.as_deref(), &content_type, data.to_vec())
        .await?;
    Ok((StatusCode::CREATED, Json(FileResponse { file })))
}

/// Raw upload to a chosen key, the body is the file.
#[utoipa::path(
    put,
    path = "/v1/files/{key}",
    params(("key" = String, Path, description = "Storage key")),
    request_body(content_type = "application/octet-stream", description = "File contents"),
    responses(
        (status = 201, description = "File stored", body = FileResponse),
        (status = 400, description = "Invalid key"),
    )
)]
pub async fn put_file(
    Path(key): Path<String>,
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<FileResponse>), WebError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    let file = state.files.upload(&key, content_type, body.to_vec()).await?;
    Ok((StatusCode::CREATED, Json(FileResponse { file })))
}

#[utoipa::path(
    get,
    path = "/v1/files/{key}",
    params(("key" = String, Path, description = "Storage key")),
    responses(
        (status = 200, description = "The file contents"),
        (status = 400, description = "Invalid key"),
        (status = 404, description = "No such file"),
    )
)]
pub async fn download_file(
    Path(key): Path<String>,
    State(state): State<SharedState>,
) -> Result<Response, WebError> {
    let stored = state
        .files
        .get(&key)
        .await?
        .ok_or_else(|| WebError::not_found("File not found"))?;

    debug!("Downloading file {}", key);

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, stored.object.content_type.clone()),
            (CONTENT_DISPOSITION, content_disposition(&stored.object.key)),
            (ETAG, format!("\"{}\"", stored.object.etag)),
        ],
        stored.body,
    )
        .into_response())
}

#[utoipa::path(
    delete,
    path = "/v1/files/{key}",
    params(("key" = String, Path, description = "Storage key")),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 404, description = "No such file"),
    )
)]
pub async fn delete_file(
    Path(key): Path<String>,
    State(state): State<SharedState>,
) -> Result<Json<MessageResponse>, WebError> {
    match state.files.delete(&key).await? {
        true => Ok(Json(MessageResponse {
            message: "File deleted successfully".to_string(),
        })),
        false => Err(WebError::not_found("File not found")),
    }
}
