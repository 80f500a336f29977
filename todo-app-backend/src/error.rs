use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use todo_app_shared::TodoError;
use tracing::error;

/// An error on its way out as an HTTP response, `{"error": message}`.
#[derive(Debug)]
pub struct WebError {
    pub(crate) status: StatusCode,
    pub(crate) message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        WebError {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        WebError::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        WebError::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

pub(crate) fn json_response(status: StatusCode, body: serde_json::Value) -> axum::response::Response {
    let mut response = axum::response::Response::new(body.to_string().into());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        json_response(
            self.status,
            serde_json::json!({
                "error": self.message,
            }),
        )
    }
}

impl From<TodoError> for WebError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::Validation(message) => WebError::bad_request(message),
            TodoError::NotFound(message) => WebError::not_found(message),
            other => {
                error!("Request failed: {}", other);
                WebError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        WebError::bad_request(rejection.body_text())
    }
}

impl From<MultipartError> for WebError {
    fn from(err: MultipartError) -> Self {
        error!("Failed to read multipart field: {:?}", err);
        WebError::bad_request(format!("Failed to read multipart field: {}", err))
    }
}
