use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use todo_app_shared::{
    CreateTodoRequest, MessageResponse, TodoDto, TodoListResponse, TodoResponse, UpdateTodoRequest,
};
use tracing::debug;

use crate::error::WebError;
use crate::SharedState;

/// Lists every todo, newest first.
#[utoipa::path(
    get,
    path = "/v1/todos",
    responses(
        (status = 200, description = "All todos", body = TodoListResponse),
        (status = 500, description = "Store failure"),
    )
)]
pub async fn list_todos(State(state): State<SharedState>) -> Result<Json<TodoListResponse>, WebError> {
    let todos = state.todos.list().await?;
    Ok(Json(TodoListResponse {
        todos: todos.iter().map(TodoDto::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/v1/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoResponse),
        (status = 400, description = "Invalid body or empty title"),
    )
)]
pub async fn create_todo(
    State(state): State<SharedState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoResponse>), WebError> {
    let Json(request) = payload?;
    let todo = state.todos.create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(TodoResponse {
            todo: TodoDto::from(todo),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/v1/todos/{id}",
    params(("id" = String, Path, description = "Todo id")),
    responses(
        (status = 200, description = "The todo", body = TodoResponse),
        (status = 404, description = "No such todo"),
    )
)]
pub async fn get_todo(
    Path(id): Path<String>,
    State(state): State<SharedState>,
) -> Result<Json<TodoResponse>, WebError> {
    match state.todos.get(&id).await? {
        Some(todo) => Ok(Json(TodoResponse {
            todo: TodoDto::from(todo),
        })),
        None => Err(WebError::not_found("Todo not found")),
    }
}

/// Partial update: only the fields present in the body change.
#[utoipa::path(
    put,
    path = "/v1/todos/{id}",
    params(("id" = String, Path, description = "Todo id")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Updated todo", body = TodoResponse),
        (status = 400, description = "Invalid body or empty title"),
        (status = 404, description = "No such todo"),
    )
)]
pub async fn update_todo(
    Path(id): Path<String>,
    State(state): State<SharedState>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoResponse>, WebError> {
    let Json(request) = payload?;
    debug!("Updating todo {}: {:?}", id, request);
    match state.todos.update(&id, request).await? {
        Some(todo) => Ok(Json(TodoResponse {
            todo: TodoDto::from(todo),
        })),
        None => Err(WebError::not_found("Todo not found")),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/todos/{id}",
    params(("id" = String, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Todo deleted", body = MessageResponse),
        (status = 404, description = "No such todo"),
    )
)]
pub async fn delete_todo(
    Path(id): Path<String>,
    State(state): State<SharedState>,
) -> Result<Json<MessageResponse>, WebError> {
    match state.todos.delete(&id).await? {
        true => Ok(Json(MessageResponse {
            message: "Todo deleted successfully".to_string(),
        })),
        false => Err(WebError::not_found("Todo not found")),
    }
}
