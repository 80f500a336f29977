use crate::attachments::{AttachmentListResponse, AttachmentResponse, DetachResponse};
use crate::{build_app, AppState, HealthResponse};
use axum::body::Bytes;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, ETAG};
use axum::http::StatusCode;
use axum::Router;
use axum_test::*;
use serde_json::json;
use std::sync::{Arc, Once};
use std::time::Duration;
use todo_app_shared::{
    FileListResponse, FileResponse, MessageResponse, TodoListResponse, TodoResponse,
};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use uuid::Uuid;

static INIT: Once = Once::new();

async fn setup_test_server() -> TestServer {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                "todo_app_backend=debug,tower_http=debug",
            ))
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
    let shared_state = Arc::new(AppState::test().await);
    let app: Router = build_app(&shared_state);

    let config = TestServerConfig {
        expect_success_by_default: true,
        restrict_requests_with_http_schema: false,
        default_content_type: None,
        default_scheme: Some("http".into()),
        ..Default::default()
    };

    TestServer::new_with_config(app, config).unwrap()
}

async fn create_todo(server: &TestServer, title: &str) -> TodoResponse {
    let res = server
        .post("/v1/todos")
        .json(&json!({ "title": title }))
        .await;
    res.assert_status(StatusCode::CREATED);
    res.json()
}

fn attach_body(file_key: &str, filename: &str, size: i64) -> serde_json::Value {
    json!({
        "fileKey": file_key,
        "originalFilename": filename,
        "fileSize": size,
        "contentType": "text/plain",
    })
}

#[tokio::test]
async fn test_failing_setup_server() {
    // I sure hope this path isn't writeable!
    let path = std::path::PathBuf::from(format!(
        "/asdfasdf{}/asd{}fsadfdf",
        Uuid::new_v4(),
        Uuid::new_v4()
    ));
    crate::storage::start_db(Some(&path))
        .await
        .expect_err("Should fail to open DB");
}

#[tokio::test]
async fn test_api_todo_lifecycle() {
    let server = setup_test_server().await;

    let created = create_todo(&server, "Buy milk").await.todo;
    assert!(!created.id.is_empty());
    assert!(!created.completed);
    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.description, None);
    assert_eq!(created.created_at, created.updated_at);

    let res = server.get(&format!("/v1/todos/{}", created.id)).await;
    res.assert_status_ok();
    let fetched: TodoResponse = res.json();
    assert_eq!(fetched.todo, created);

    let res = server
        .put(&format!("/v1/todos/{}", created.id))
        .json(&json!({ "completed": true }))
        .await;
    res.assert_status_ok();
    let updated: TodoResponse = res.json();
    assert!(updated.todo.completed);
    assert_eq!(updated.todo.title, "Buy milk");
    assert_eq!(updated.todo.created_at, created.created_at);
    assert!(updated.todo.updated_at > created.updated_at);

    let res = server.delete(&format!("/v1/todos/{}", created.id)).await;
    res.assert_status_ok();
    let message: MessageResponse = res.json();
    assert!(!message.message.is_empty());

    let res = server
        .get(&format!("/v1/todos/{}", created.id))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 404);
}

#[tokio::test]
async fn test_api_create_todo_validation() {
    let server = setup_test_server().await;

    for body in [json!({ "title": "" }), json!({ "title": "   " })] {
        let res = server.post("/v1/todos").json(&body).expect_failure().await;
        assert_eq!(res.status_code(), 400);
        let error: serde_json::Value = res.json();
        assert_eq!(error["error"], "Title cannot be empty");
    }

    // no title at all
    let res = server
        .post("/v1/todos")
        .json(&json!({ "description": "orphan" }))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 400);

    let res = server
        .post("/v1/todos")
        .content_type("application/json")
        .bytes(Bytes::from_static(b"{not json"))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 400);

    let res = server.get("/v1/todos").await;
    let list: TodoListResponse = res.json();
    assert!(list.todos.is_empty());
}

#[tokio::test]
async fn test_api_list_todos_newest_first() {
    let server = setup_test_server().await;

    let mut ids = Vec::new();
    for title in ["first", "second", "third"] {
        ids.push(create_todo(&server, title).await.todo.id);
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let res = server.get("/v1/todos").await;
    res.assert_status_ok();
    let list: TodoListResponse = res.json();
    let listed: Vec<String> = list.todos.into_iter().map(|t| t.id).collect();
    ids.reverse();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn test_api_update_todo() {
    let server = setup_test_server().await;

    let res = server
        .post("/v1/todos")
        .json(&json!({ "title": "A", "description": "B" }))
        .await;
    let created: TodoResponse = res.json();
    let url = format!("/v1/todos/{}", created.todo.id);

    // absent fields stay put
    let res = server.put(&url).json(&json!({ "title": "A2" })).await;
    let updated: TodoResponse = res.json();
    assert_eq!(updated.todo.title, "A2");
    assert_eq!(updated.todo.description.as_deref(), Some("B"));
    assert!(!updated.todo.completed);

    // explicit null clears
    let res = server.put(&url).json(&json!({ "description": null })).await;
    let updated: TodoResponse = res.json();
    assert_eq!(updated.todo.description, None);
    assert_eq!(updated.todo.title, "A2");

    let res = server
        .put(&url)
        .json(&json!({ "title": " " }))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 400);

    let res = server
        .put(&url)
        .json(&json!({ "completed": "yes" }))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 400);

    let res = server
        .put(&format!("/v1/todos/{}", Uuid::new_v4()))
        .json(&json!({ "completed": true }))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 404);

    let res = server.get(&url).await;
    let stored: TodoResponse = res.json();
    assert_eq!(stored.todo.title, "A2");
    assert_eq!(stored.todo.description, None);
}

#[tokio::test]
async fn test_api_delete_todo_twice() {
    let server = setup_test_server().await;
    let created = create_todo(&server, "delete me").await.todo;
    let url = format!("/v1/todos/{}", created.id);

    server.delete(&url).await.assert_status_ok();

    let res = server.delete(&url).expect_failure().await;
    assert_eq!(res.status_code(), 404);
}

#[tokio::test]
async fn test_api_attachments() {
    let server = setup_test_server().await;
    let todo = create_todo(&server, "with attachments").await.todo;
    let url = format!("/v1/todos/{}/attachments", todo.id);

    let res = server
        .post(&url)
        .json(&attach_body("key-1", "notes.txt", 12))
        .await;
    res.assert_status(StatusCode::CREATED);
    let first: AttachmentResponse = res.json();
    assert!(first.success);
    assert_eq!(first.data.todo_id, todo.id);
    assert_eq!(first.data.file_key, "key-1");
    assert_eq!(first.data.original_filename, "notes.txt");
    assert_eq!(first.data.file_size, 12);

    tokio::time::sleep(Duration::from_millis(2)).await;
    let res = server
        .post(&url)
        .json(&attach_body("key-2", "max.bin", 104_857_600))
        .await;
    let second: AttachmentResponse = res.json();

    let res = server.get(&url).await;
    res.assert_status_ok();
    let listed: AttachmentListResponse = res.json();
    assert!(listed.success);
    let ids: Vec<&str> = listed.data.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec![second.data.id.as_str(), first.data.id.as_str()]);

    let res = server
        .delete(&format!("{}/{}", url, first.data.id))
        .await;
    res.assert_status_ok();
    let detached: DetachResponse = res.json();
    assert!(detached.success);

    let res = server
        .delete(&format!("{}/{}", url, first.data.id))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 404);
    let error: serde_json::Value = res.json();
    assert_eq!(error["success"], false);
    assert_eq!(error["error"], "Attachment not found");

    let listed: AttachmentListResponse = server.get(&url).await.json();
    assert_eq!(listed.data.len(), 1);
}

#[tokio::test]
async fn test_api_attachment_errors() {
    let server = setup_test_server().await;

    let res = server
        .post("/v1/todos/nonexistent-id/attachments")
        .json(&attach_body("key", "a.txt", 1))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 404);
    let error: serde_json::Value = res.json();
    assert_eq!(error["success"], false);
    assert_eq!(error["error"], "Todo not found");

    let todo = create_todo(&server, "validation").await.todo;
    let url = format!("/v1/todos/{}/attachments", todo.id);

    for body in [
        attach_body("key", "a.txt", 104_857_601),
        attach_body("key", "", 1),
        attach_body("key", &"x".repeat(256), 1),
        json!({ "fileKey": "key" }),
    ] {
        debug!("attaching {}", body);
        let res = server.post(&url).json(&body).expect_failure().await;
        assert_eq!(res.status_code(), 400);
        let error: serde_json::Value = res.json();
        assert_eq!(error["success"], false);
    }

    let listed: AttachmentListResponse = server.get(&url).await.json();
    assert!(listed.data.is_empty());
}

#[tokio::test]
async fn test_api_delete_todo_removes_attachments() {
    let server = setup_test_server().await;
    let todo = create_todo(&server, "cascade").await.todo;
    let url = format!("/v1/todos/{}/attachments", todo.id);

    server
        .post(&url)
        .json(&attach_body("key", "a.txt", 1))
        .await
        .assert_status(StatusCode::CREATED);

    server
        .delete(&format!("/v1/todos/{}", todo.id))
        .await
        .assert_status_ok();

    let listed: AttachmentListResponse = server.get(&url).await.json();
    assert!(listed.data.is_empty());
}

#[tokio::test]
async fn test_api_files() {
    let server = setup_test_server().await;
    let content = b"This is a test file content for file testing.";

    let res = server
        .put("/v1/files/report.txt")
        .content_type("text/plain")
        .bytes(Bytes::from_static(content))
        .await;
    res.assert_status(StatusCode::CREATED);
    let stored: FileResponse = res.json();
    assert_eq!(stored.file.key, "report.txt");
    assert_eq!(stored.file.size, content.len() as u64);
    assert_eq!(stored.file.content_type, "text/plain");

    let res = server.get("/v1/files/report.txt").await;
    res.assert_status_ok();
    assert_eq!(res.as_bytes().as_ref(), content);
    assert_eq!(res.header(CONTENT_TYPE), "text/plain");
    let disposition = res.header(CONTENT_DISPOSITION);
    assert!(disposition.to_str().unwrap().contains("report.txt"));
    assert_eq!(
        res.header(ETAG).to_str().unwrap(),
        format!("\"{}\"", stored.file.etag)
    );

    let res = server.get("/v1/files").await;
    let listing: FileListResponse = res.json();
    assert_eq!(listing.files, vec![stored.file.clone()]);

    server
        .delete("/v1/files/report.txt")
        .await
        .assert_status_ok();

    let res = server
        .delete("/v1/files/report.txt")
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 404);

    let res = server
        .get("/v1/files/report.txt")
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 404);
}

#[tokio::test]
async fn test_api_file_key_validation() {
    let server = setup_test_server().await;

    for url in ["/v1/files/..secret", "/v1/files/a%2Fb", "/v1/files/a..b"] {
        let res = server
            .put(url)
            .bytes(Bytes::from_static(b"nope"))
            .expect_failure()
            .await;
        assert_eq!(res.status_code(), 400, "{url}");

        let res = server.get(url).expect_failure().await;
        assert_eq!(res.status_code(), 400, "{url}");
    }

    let listing: FileListResponse = server.get("/v1/files").await.json();
    assert!(listing.files.is_empty());
}

#[tokio::test]
async fn test_api_multipart_upload_then_attach() {
    let server = setup_test_server().await;
    let todo = create_todo(&server, "upload").await.todo;

    let file_content = b"First test file".to_vec();
    let form = axum_test::multipart::MultipartForm::new()
        .add_text("comment", "ignored")
        .add_part(
            "file",
            axum_test::multipart::Part::bytes(file_content.clone())
                .file_name("file1.txt")
                .mime_type("text/plain"),
        );

    let res = server.post("/v1/files").multipart(form).await;
    res.assert_status(StatusCode::CREATED);
    let uploaded: FileResponse = res.json();
    assert!(uploaded.file.key.ends_with(".txt"));
    assert_eq!(uploaded.file.size, file_content.len() as u64);

    let res = server
        .post(&format!("/v1/todos/{}/attachments", todo.id))
        .json(&json!({
            "fileKey": uploaded.file.key,
            "originalFilename": "file1.txt",
            "fileSize": uploaded.file.size,
            "contentType": uploaded.file.content_type,
        }))
        .await;
    let attached: AttachmentResponse = res.json();
    assert_eq!(attached.data.file_key, uploaded.file.key);

    // detaching leaves the stored file alone
    server
        .delete(&format!(
            "/v1/todos/{}/attachments/{}",
            todo.id, attached.data.id
        ))
        .await
        .assert_status_ok();
    let res = server
        .get(&format!("/v1/files/{}", uploaded.file.key))
        .await;
    assert_eq!(res.as_bytes().as_ref(), file_content.as_slice());

    let form = axum_test::multipart::MultipartForm::new().add_text("comment", "no file");
    let res = server
        .post("/v1/files")
        .multipart(form)
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 400);
}

#[tokio::test]
async fn test_api_health_and_docs() {
    let server = setup_test_server().await;

    let res = server.get("/v1/health").await;
    res.assert_status_ok();
    let health: HealthResponse = res.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.stage, "test");

    let res = server.get("/v1/openapi.json").await;
    res.assert_status_ok();
    let doc: serde_json::Value = res.json();
    assert!(doc["paths"].get("/v1/todos").is_some());
    assert!(doc["paths"].get("/v1/todos/{id}/attachments").is_some());
}

#[tokio::test]
async fn test_api_file_key_rejects_header_breaking_chars() {
    let server = setup_test_server().await;

    for url in [
        "/v1/files/a%0Ab",
        "/v1/files/a%0Db",
        "/v1/files/a%22b",
        "/v1/files/a%00b",
    ] {
        let res = server
            .put(url)
            .content_type("text/plain")
            .bytes(Bytes::from_static(b"never stored"))
            .expect_failure()
            .await;
        assert_eq!(res.status_code(), 400, "{url}");
        let error: serde_json::Value = res.json();
        assert!(error["error"].as_str().unwrap().starts_with("Invalid file key"));
    }

    let listing: FileListResponse = server.get("/v1/files").await.json();
    assert!(listing.files.is_empty());
}

#[tokio::test]
async fn test_api_download_non_ascii_key() {
    let server = setup_test_server().await;

    server
        .put("/v1/files/r%C3%A9sum%C3%A9.txt")
        .content_type("text/plain")
        .bytes(Bytes::from_static(b"cv"))
        .await
        .assert_status(StatusCode::CREATED);

    let res = server.get("/v1/files/r%C3%A9sum%C3%A9.txt").await;
    res.assert_status_ok();
    assert_eq!(res.as_bytes().as_ref(), b"cv");
    assert_eq!(
        res.header(CONTENT_DISPOSITION).to_str().unwrap(),
        "attachment; filename=\"r_sum_.txt\"; filename*=UTF-8''r%C3%A9sum%C3%A9.txt"
    );
}

#[tokio::test]
async fn test_api_detach_from_wrong_todo() {
    let server = setup_test_server().await;
    let owner = create_todo(&server, "owner").await.todo;
    let other = create_todo(&server, "other").await.todo;

    let res = server
        .post(&format!("/v1/todos/{}/attachments", owner.id))
        .json(&attach_body("key", "a.txt", 1))
        .await;
    let attached: AttachmentResponse = res.json();

    let res = server
        .delete(&format!(
            "/v1/todos/{}/attachments/{}",
            other.id, attached.data.id
        ))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 404);
    let error: serde_json::Value = res.json();
    assert_eq!(error["success"], false);
    assert_eq!(error["error"], "Attachment not found");

    let listed: AttachmentListResponse = server
        .get(&format!("/v1/todos/{}/attachments", owner.id))
        .await
        .json();
    assert_eq!(listed.data.len(), 1);

    server
        .delete(&format!(
            "/v1/todos/{}/attachments/{}",
            owner.id, attached.data.id
        ))
        .await
        .assert_status_ok();
}
