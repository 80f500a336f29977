pub mod attachments;
pub mod blob;
pub mod cli;
pub mod entity;
pub mod error;
pub mod files;
pub mod logging;
pub mod middleware;
pub mod migration;
pub mod openapi;
pub mod repository;
pub mod service;
pub mod storage;
#[cfg(test)]
mod tests;
pub mod todos;

use attachments::{attach_file, detach_file, list_attachments};
use axum::{
    body::Body,
    error_handling::HandleErrorLayer,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Response, StatusCode},
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use files::{delete_file, download_file, list_files, put_file, upload_file};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, sync::Arc, time::Duration};
use todo_app_shared::{TodoError, MAX_FILE_SIZE};
use todos::{create_todo, delete_todo, get_todo, list_todos, update_todo};
use tower::{BoxError, ServiceBuilder};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::{
    blob::{BlobStore, FsBlobStore, MemoryBlobStore},
    cli::CliOpts,
    logging::logging_layer,
    repository::{
        AttachmentRepository, SeaOrmAttachmentRepository, SeaOrmTodoRepository, TodoRepository,
    },
    service::{AttachmentService, FileService, TodoService},
};

/// Room for multipart boundaries and headers on top of the largest file.
const UPLOAD_OVERHEAD: usize = 1024 * 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub type SharedState = Arc<AppState>;

/// Everything a handler needs, wired once at startup.
pub struct AppState {
    pub stage: String,
    pub cors_origin: Option<HeaderValue>,
    pub todos: TodoService,
    pub attachments: AttachmentService,
    pub files: FileService,
}

impl AppState {
    pub async fn new(cli: &CliOpts) -> Result<Self, TodoError> {
        let db_path = cli.db_path();
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let conn = storage::start_db(Some(&db_path)).await?;

        let blobs: Arc<dyn BlobStore> = match cli.memory_blobs {
            true => {
                warn!("Uploaded files are kept in memory and will be lost on restart");
                Arc::new(MemoryBlobStore::new())
            }
            false => Arc::new(FsBlobStore::new(cli.blob_path()).await?),
        };

        let cors_origin = cli
            .cors_origin
            .as_deref()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|err| {
                    TodoError::Configuration(format!("Invalid CORS origin {origin:?}: {err}"))
                })
            })
            .transpose()?;

        Ok(Self::with_stores(conn, blobs, cli.stage.clone(), cors_origin))
    }

    pub fn with_stores(
        conn: DatabaseConnection,
        blobs: Arc<dyn BlobStore>,
        stage: String,
        cors_origin: Option<HeaderValue>,
    ) -> Self {
        let todo_repo: Arc<dyn TodoRepository> = Arc::new(SeaOrmTodoRepository::new(conn.clone()));
        let attachment_repo: Arc<dyn AttachmentRepository> =
            Arc::new(SeaOrmAttachmentRepository::new(conn));

        Self {
            stage,
            cors_origin,
            todos: TodoService::new(todo_repo.clone(), attachment_repo.clone()),
            attachments: AttachmentService::new(attachment_repo, todo_repo),
            files: FileService::new(blobs),
        }
    }

    #[cfg(test)]
    pub async fn test() -> Self {
        let conn = storage::start_db(None)
            .await
            .expect("Failed to start test DB");
        Self::with_stores(
            conn,
            Arc::new(MemoryBlobStore::new()),
            "test".to_string(),
            None,
        )
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub stage: String,
}

#[utoipa::path(
    get,
    path = "/v1/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        stage: state.stage.clone(),
    })
}

pub fn build_app<T>(shared_state: &SharedState) -> Router<T> {
    let upload_limit = DefaultBodyLimit::max(MAX_FILE_SIZE as usize + UPLOAD_OVERHEAD);

    let router = Router::new()
        .route("/v1/health", get(health))
        .route("/v1/todos", get(list_todos).post(create_todo))
        .route(
            "/v1/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route(
            "/v1/todos/{id}/attachments",
            get(list_attachments).post(attach_file),
        )
        .route(
            "/v1/todos/{id}/attachments/{attachment_id}",
            delete(detach_file),
        )
        .route(
            "/v1/files",
            get(list_files)
                .post(upload_file)
                .layer(upload_limit.clone()),
        )
        .route(
            "/v1/files/{key}",
            get(download_file)
                .put(put_file)
                .delete(delete_file)
                .layer(upload_limit),
        )
        .merge(openapi::api_route());

    router
        .layer(
            ServiceBuilder::new()
                .layer(middleware::corslayer(shared_state.cors_origin.clone()))
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    |response: &Response<Body>| {
                        if response.status() == StatusCode::OK {
                            "private, no-store".parse().ok()
                        } else {
                            None
                        }
                    },
                ))
                // Handle errors from middleware
                .layer(HandleErrorLayer::new(handle_error))
                .load_shed()
                .concurrency_limit(1024)
                .timeout(REQUEST_TIMEOUT)
                .layer(logging_layer()),
        )
        .with_state(shared_state.clone())
}

async fn handle_error(error: BoxError) -> impl IntoResponse {
    if error.is::<tower::timeout::error::Elapsed>() {
        return (StatusCode::REQUEST_TIMEOUT, Cow::from("request timed out"));
    }

    if error.is::<tower::load_shed::error::Overloaded>() {
        let msg = "service is overloaded, try again later";
        error!("{}", msg);
        return (StatusCode::SERVICE_UNAVAILABLE, Cow::from(msg));
    }

    let msg = format!("Unhandled internal error: {error}");
    error!("{}", msg);
    (StatusCode::INTERNAL_SERVER_ERROR, Cow::from(msg))
}

#[tokio::test]
async fn test_handle_error() {
    let err = tower::timeout::error::Elapsed::new();
    let res = handle_error(Box::new(err)).await.into_response();
    assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);

    let err = tower::load_shed::error::Overloaded::new();
    let res = handle_error(Box::new(err)).await.into_response();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let res = handle_error("boom".into()).await.into_response();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
