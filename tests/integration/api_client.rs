//! API client integration tests.
//!
//! Each test starts a mock task service, points an `ApiClient` at it and
//! checks the request the client sends and how the response is decoded.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use neurotask::api::{ApiClient, TaskApi};
use neurotask::core::{ReportedStatus, TaskDraft, TaskId, TaskStatus};
use neurotask::Error;

use crate::fixtures::{mock_service, task_json};

/// Test: List all tasks
/// Given a service holding two tasks
/// When the client lists tasks
/// Then both are decoded in service order
#[tokio::test]
async fn test_list_tasks() {
    let (server, client) = mock_service().await;
    Mock::given(method("GET"))
        .and(path("/api/Task"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_json("a1", "Write report", "pending"),
            task_json("b2", "Ship release", "completed"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = client.list_tasks().await.unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, TaskId::new("a1"));
    assert_eq!(tasks[1].display_status(), TaskStatus::Completed);
    assert!(tasks[0].created_at.is_some());
}

#[tokio::test]
async fn test_list_tolerates_numeric_ids_and_unknown_status() {
    let (server, client) = mock_service().await;
    Mock::given(method("GET"))
        .and(path("/api/Task"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "title": "Legacy", "description": null, "status": "archived"}
        ])))
        .mount(&server)
        .await;

    let tasks = client.list_tasks().await.unwrap();

    assert_eq!(tasks[0].id.as_str(), "7");
    assert_eq!(
        tasks[0].status,
        ReportedStatus::Unknown(serde_json::json!("archived"))
    );
    assert_eq!(tasks[0].display_status(), TaskStatus::Pending);
}

/// Test: Status filter parameter
/// Given a status
/// When listing by status
/// Then `?status=` carries the wire value; with no status it is omitted
#[tokio::test]
async fn test_list_by_status_query_parameter() {
    let (server, client) = mock_service().await;
    Mock::given(method("GET"))
        .and(path("/api/Task"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client
        .list_tasks_by_status(Some(TaskStatus::InProgress))
        .await
        .unwrap();
    client.list_tasks_by_status(None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url.query(), Some("status=in_progress"));
    assert_eq!(requests[1].url.query(), None);
}

#[tokio::test]
async fn test_create_task_body() {
    let (server, client) = mock_service().await;
    Mock::given(method("POST"))
        .and(path("/api/Task"))
        .and(body_json(json!({
            "title": "Buy milk",
            "description": "2 litres",
            "status": "pending"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(task_json("n1", "Buy milk", "pending")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .create_task(&TaskDraft::pending("Buy milk", "2 litres"))
        .await
        .unwrap();

    assert_eq!(created.id, TaskId::new("n1"));
}

#[tokio::test]
async fn test_update_status_puts_status_only() {
    let (server, client) = mock_service().await;
    Mock::given(method("PUT"))
        .and(path("/api/Task/a1/status"))
        .and(body_json(json!({"status": "canceled"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(task_json("a1", "Write report", "canceled")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let updated = client
        .update_task_status(&TaskId::new("a1"), TaskStatus::Canceled)
        .await
        .unwrap();

    assert!(updated.status.is(TaskStatus::Canceled));
}

#[tokio::test]
async fn test_update_task_sends_full_body() {
    let (server, client) = mock_service().await;
    Mock::given(method("PUT"))
        .and(path("/api/Task/a1"))
        .and(body_json(json!({
            "title": "Final report",
            "description": "",
            "status": "in_progress"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(task_json("a1", "Final report", "in_progress")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let draft = TaskDraft {
        title: "Final report".to_string(),
        description: Some(String::new()),
        status: ReportedStatus::Known(TaskStatus::InProgress),
    };
    client.update_task(&TaskId::new("a1"), &draft).await.unwrap();
}

#[tokio::test]
async fn test_delete_task_returns_confirmation() {
    let (server, client) = mock_service().await;
    Mock::given(method("DELETE"))
        .and(path("/api/Task/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detail": "Task deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let confirmation = client.delete_task(&TaskId::new("a1")).await.unwrap();
    assert_eq!(confirmation.detail, "Task deleted");
}

#[tokio::test]
async fn test_autocomplete_posts_title() {
    let (server, client) = mock_service().await;
    Mock::given(method("POST"))
        .and(path("/api/Task/autoComplete"))
        .and(body_json(json!({"title": "Plan trip"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"description": "Book flights."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let completion = client.autocomplete_description("Plan trip").await.unwrap();
    assert_eq!(completion.description, "Book flights.");
}

#[tokio::test]
async fn test_ai_insight_endpoints() {
    let (server, client) = mock_service().await;
    Mock::given(method("GET"))
        .and(path("/api/Task/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"summary": "All calm"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Task/suggest_priorities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "priorities": [{"task_title": "Ship release", "suggest_priorities": "First"}]
        })))
        .mount(&server)
        .await;

    assert_eq!(client.summarize_pending().await.unwrap().summary, "All calm");
    let suggestions = client.suggest_priorities().await.unwrap();
    assert_eq!(suggestions.priorities[0].task_title, "Ship release");
    assert_eq!(suggestions.priorities[0].suggestion, "First");
}

// ═══════════════════════════════════════════════════════════════════════════
// Failure mapping
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_http_error_status_is_reported() {
    let (server, client) = mock_service().await;
    Mock::given(method("DELETE"))
        .and(path("/api/Task/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Task not found"))
        .mount(&server)
        .await;

    let err = client.delete_task(&TaskId::new("missing")).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    match err {
        Error::Status { operation, body, .. } => {
            assert_eq!(operation, "delete task");
            assert_eq!(body, "Task not found");
        }
        other => panic!("Expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let (server, client) = mock_service().await;
    Mock::given(method("GET"))
        .and(path("/api/Task"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"not": "a list"})))
        .mount(&server)
        .await;

    let err = client.list_tasks().await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // Reserve a free port, then release it so nothing is listening there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ApiClient::new(&format!("http://127.0.0.1:{port}/api")).unwrap();

    let err = client.list_tasks().await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }), "got {err:?}");
    assert_eq!(err.status(), None);
}

/// The trait object dispatches to the same HTTP calls.
#[tokio::test]
async fn test_trait_object_dispatch() {
    let (server, client) = mock_service().await;
    Mock::given(method("PUT"))
        .and(path("/api/Task/a1/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(task_json("a1", "Write report", "completed")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api: &dyn TaskApi = &client;
    let task = api
        .update_task_status(TaskId::new("a1"), TaskStatus::Completed)
        .await
        .unwrap();
    assert_eq!(task.display_status(), TaskStatus::Completed);
}
