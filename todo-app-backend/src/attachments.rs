//! Attachment routes. These wrap every body in a `success` envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use todo_app_shared::{AttachFileRequest, AttachmentDto, TodoError};
use utoipa::ToSchema;

use crate::error::{json_response, WebError};
use crate::SharedState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttachmentResponse {
    pub success: bool,
    pub data: AttachmentDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttachmentListResponse {
    pub success: bool,
    pub data: Vec<AttachmentDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DetachResponse {
    pub success: bool,
    pub message: String,
}

/// Same status codes as [`WebError`], with `"success": false` in the body.
#[derive(Debug)]
pub struct EnvelopeError(WebError);

impl IntoResponse for EnvelopeError {
    fn into_response(self) -> Response {
        json_response(
            self.0.status,
            serde_json::json!({
                "success": false,
                "error": self.0.message,
            }),
        )
    }
}

impl From<TodoError> for EnvelopeError {
    fn from(err: TodoError) -> Self {
        EnvelopeError(err.into())
    }
}

impl From<JsonRejection> for EnvelopeError {
    fn from(rejection: JsonRejection) -> Self {
        EnvelopeError(rejection.into())
    }
}

#[utoipa::path(
    post,
    path = "/v1/todos/{id}/attachments",
    params(("id" = String, Path, description = "Todo id")),
    request_body = AttachFileRequest,
    responses(
        (status = 201, description = "Attachment recorded", body = AttachmentResponse),
        (status = 400, description = "Invalid file metadata"),
        (status = 404, description = "No such todo"),
    )
)]
pub async fn attach_file(
    Path(todo_id): Path<String>,
    State(state): State<SharedState>,
    payload: Result<Json<AttachFileRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AttachmentResponse>), EnvelopeError> {
    let Json(request) = payload?;
    let attachment = state.attachments.attach(&todo_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(AttachmentResponse {
            success: true,
            data: AttachmentDto::from(&attachment),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/v1/todos/{id}/attachments",
    params(("id" = String, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Attachments, newest first", body = AttachmentListResponse),
    )
)]
pub async fn list_attachments(
    Path(todo_id): Path<String>,
    State(state): State<SharedState>,
) -> Result<Json<AttachmentListResponse>, EnvelopeError> {
    let attachments = state.attachments.list_for_todo(&todo_id).await?;
    Ok(Json(AttachmentListResponse {
        success: true,
        data: attachments.iter().map(AttachmentDto::from).collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/v1/todos/{id}/attachments/{attachment_id}",
    params(
        ("id" = String, Path, description = "Todo id"),
        ("attachment_id" = String, Path, description = "Attachment id"),
    ),
    responses(
        (status = 200, description = "Attachment removed", body = DetachResponse),
        (status = 404, description = "No such attachment on this todo"),
    )
)]
pub async fn detach_file(
    Path((todo_id, attachment_id)): Path<(String, String)>,
    State(state): State<SharedState>,
) -> Result<Json<DetachResponse>, EnvelopeError> {
    state.attachments.detach(&todo_id, &attachment_id).await?;
    Ok(Json(DetachResponse {
        success: true,
        message: "Attachment removed successfully".to_string(),
    }))
}
