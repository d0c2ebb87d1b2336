//! HTTP client for the remote task service.
//!
//! One method per remote operation. Each call is a single best-effort
//! request: no retry, no timeout, no caching. Every failure is logged with
//! the operation name before it is returned to the caller.

use futures::future::BoxFuture;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::core::{Task, TaskDraft, TaskId, TaskStatus};
use crate::{Error, Result};

/// Body returned by `DELETE /Task/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    #[serde(default)]
    pub detail: String,
}

/// Body returned by `POST /Task/autoComplete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autocompletion {
    pub description: String,
}

/// Body returned by `GET /Task/summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSummary {
    pub summary: String,
}

/// One entry of the AI priority ranking, most important first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityHint {
    pub task_title: String,
    #[serde(rename = "suggest_priorities")]
    pub suggestion: String,
}

/// Body returned by `GET /Task/suggest_priorities`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrioritySuggestions {
    #[serde(default)]
    pub priorities: Vec<PriorityHint>,
}

#[derive(Serialize)]
struct StatusChangeRequest {
    status: TaskStatus,
}

#[derive(Serialize)]
struct AutocompleteRequest<'a> {
    title: &'a str,
}

/// Operations the TUI runtime needs from the task service.
///
/// `ApiClient` is the HTTP implementation; tests substitute in-memory ones.
pub trait TaskApi: Send + Sync {
    fn list_tasks(&self) -> BoxFuture<'_, Result<Vec<Task>>>;

    fn list_tasks_by_status(&self, status: Option<TaskStatus>)
        -> BoxFuture<'_, Result<Vec<Task>>>;

    fn create_task(&self, draft: TaskDraft) -> BoxFuture<'_, Result<Task>>;

    fn update_task_status(&self, id: TaskId, status: TaskStatus) -> BoxFuture<'_, Result<Task>>;

    fn update_task(&self, id: TaskId, draft: TaskDraft) -> BoxFuture<'_, Result<Task>>;

    fn delete_task(&self, id: TaskId) -> BoxFuture<'_, Result<DeleteConfirmation>>;

    fn autocomplete_description(&self, title: String) -> BoxFuture<'_, Result<Autocompletion>>;

    fn summarize_pending(&self) -> BoxFuture<'_, Result<PendingSummary>>;

    fn suggest_priorities(&self) -> BoxFuture<'_, Result<PrioritySuggestions>>;
}

/// reqwest-backed client rooted at `{base}/Task`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|_| Error::InvalidBaseUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/Task/<segments...>` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("Task").extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request.send().await.map_err(|source| {
            error!(operation, error = %source, "Transport failure");
            Error::Transport { operation, source }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(operation, status = status.as_u16(), body = %body, "Service returned an error");
            return Err(Error::Status {
                operation,
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(|source| {
            error!(operation, error = %source, "Failed to decode response");
            Error::Decode { operation, source }
        })
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let url = self.endpoint(&[]);
        debug!(%url, "list tasks");
        self.send("list tasks", self.client.get(url)).await
    }

    /// Server-side filtered list. `None` omits the `status` parameter.
    pub async fn list_tasks_by_status(&self, status: Option<TaskStatus>) -> Result<Vec<Task>> {
        let url = self.endpoint(&[]);
        debug!(%url, ?status, "list tasks by status");
        let mut request = self.client.get(url);
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }
        self.send("list tasks by status", request).await
    }

    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task> {
        let url = self.endpoint(&[]);
        debug!(%url, title = %draft.title, "create task");
        self.send("create task", self.client.post(url).json(draft))
            .await
    }

    pub async fn update_task_status(&self, id: &TaskId, status: TaskStatus) -> Result<Task> {
        let url = self.endpoint(&[id.as_str(), "status"]);
        debug!(%url, %status, "update task status");
        self.send(
            "update task status",
            self.client.put(url).json(&StatusChangeRequest { status }),
        )
        .await
    }

    pub async fn update_task(&self, id: &TaskId, draft: &TaskDraft) -> Result<Task> {
        let url = self.endpoint(&[id.as_str()]);
        debug!(%url, title = %draft.title, "update task");
        self.send("update task", self.client.put(url).json(draft))
            .await
    }

    pub async fn delete_task(&self, id: &TaskId) -> Result<DeleteConfirmation> {
        let url = self.endpoint(&[id.as_str()]);
        debug!(%url, "delete task");
        self.send("delete task", self.client.delete(url)).await
    }

    pub async fn autocomplete_description(&self, title: &str) -> Result<Autocompletion> {
        let url = self.endpoint(&["autoComplete"]);
        debug!(%url, %title, "autocomplete description");
        self.send(
            "autocomplete description",
            self.client.post(url).json(&AutocompleteRequest { title }),
        )
        .await
    }

    pub async fn summarize_pending(&self) -> Result<PendingSummary> {
        let url = self.endpoint(&["summary"]);
        debug!(%url, "summarize pending tasks");
        self.send("summarize pending tasks", self.client.get(url))
            .await
    }

    pub async fn suggest_priorities(&self) -> Result<PrioritySuggestions> {
        let url = self.endpoint(&["suggest_priorities"]);
        debug!(%url, "suggest priorities");
        self.send("suggest priorities", self.client.get(url)).await
    }
}

impl TaskApi for ApiClient {
    fn list_tasks(&self) -> BoxFuture<'_, Result<Vec<Task>>> {
        Box::pin(ApiClient::list_tasks(self))
    }

    fn list_tasks_by_status(
        &self,
        status: Option<TaskStatus>,
    ) -> BoxFuture<'_, Result<Vec<Task>>> {
        Box::pin(ApiClient::list_tasks_by_status(self, status))
    }

    fn create_task(&self, draft: TaskDraft) -> BoxFuture<'_, Result<Task>> {
        Box::pin(async move { ApiClient::create_task(self, &draft).await })
    }

    fn update_task_status(&self, id: TaskId, status: TaskStatus) -> BoxFuture<'_, Result<Task>> {
        Box::pin(async move { ApiClient::update_task_status(self, &id, status).await })
    }

    fn update_task(&self, id: TaskId, draft: TaskDraft) -> BoxFuture<'_, Result<Task>> {
        Box::pin(async move { ApiClient::update_task(self, &id, &draft).await })
    }

    fn delete_task(&self, id: TaskId) -> BoxFuture<'_, Result<DeleteConfirmation>> {
        Box::pin(async move { ApiClient::delete_task(self, &id).await })
    }

    fn autocomplete_description(&self, title: String) -> BoxFuture<'_, Result<Autocompletion>> {
        Box::pin(async move { ApiClient::autocomplete_description(self, &title).await })
    }

    fn summarize_pending(&self) -> BoxFuture<'_, Result<PendingSummary>> {
        Box::pin(ApiClient::summarize_pending(self))
    }

    fn suggest_priorities(&self) -> BoxFuture<'_, Result<PrioritySuggestions>> {
        Box::pin(ApiClient::suggest_priorities(self))
    }
}
