//! Test fixtures for integration tests.
//!
//! Provides helpers for:
//! - Starting a mock task service and a client pointed at it
//! - An in-memory `TaskApi` that behaves like the real service
//! - Driving the TEA loop until every issued request has been answered

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use futures::future::BoxFuture;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wiremock::MockServer;

use neurotask::api::{
    ApiClient, Autocompletion, DeleteConfirmation, PendingSummary, PriorityHint,
    PrioritySuggestions, TaskApi,
};
use neurotask::app::execute_command;
use neurotask::core::{ReportedStatus, Task, TaskDraft, TaskId, TaskStatus};
use neurotask::tea::{update, Command, Message, Model};
use neurotask::{Error, Result};

/// Base path the client is configured with, as a real deployment would be.
pub const API_PREFIX: &str = "/api";

/// Start a mock server and a client whose base URL is `{server}/api`.
pub async fn mock_service() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::new(&format!("{}{}", server.uri(), API_PREFIX))
        .expect("mock server URI should be a valid base URL");
    (server, client)
}

/// Service JSON for one task.
pub fn task_json(id: &str, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("about {title}"),
        "status": status,
        "created_at": "2024-05-01T12:00:00.123456",
        "updated_at": "2024-05-01T12:00:00.123456"
    })
}

pub fn task(id: &str, title: &str, status: TaskStatus) -> Task {
    Task {
        id: TaskId::new(id),
        title: title.to_string(),
        description: None,
        status: ReportedStatus::Known(status),
        created_at: None,
        updated_at: None,
    }
}

/// In-memory task service.
///
/// Assigns sequential ids, records every call by name, and can be told to
/// fail all mutations.
#[derive(Default)]
pub struct InMemoryApi {
    tasks: Mutex<Vec<Task>>,
    calls: Mutex<Vec<&'static str>>,
    next_id: AtomicUsize,
    fail_mutations: bool,
}

impl InMemoryApi {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            next_id: AtomicUsize::new(tasks.len() + 1),
            tasks: Mutex::new(tasks),
            ..Self::default()
        }
    }

    pub fn failing(tasks: Vec<Task>) -> Self {
        Self {
            fail_mutations: true,
            ..Self::with_tasks(tasks)
        }
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| **c == name).count()
    }

    fn record(&self, name: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(name);
        Ok(())
    }

    fn mutate(&self, name: &'static str) -> Result<()> {
        self.record(name)?;
        if self.fail_mutations {
            return Err(Error::Status {
                operation: name,
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(())
    }

    fn not_found(name: &'static str) -> Error {
        Error::Status {
            operation: name,
            status: 404,
            body: "Task not found".to_string(),
        }
    }

    fn with_task<T>(
        &self,
        name: &'static str,
        id: &TaskId,
        f: impl FnOnce(&mut Task) -> T,
    ) -> Result<T> {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| Self::not_found(name))?;
        Ok(f(task))
    }
}

impl TaskApi for InMemoryApi {
    fn list_tasks(&self) -> BoxFuture<'_, Result<Vec<Task>>> {
        Box::pin(async move {
            self.record("list_tasks")?;
            Ok(self.tasks())
        })
    }

    fn list_tasks_by_status(
        &self,
        status: Option<TaskStatus>,
    ) -> BoxFuture<'_, Result<Vec<Task>>> {
        Box::pin(async move {
            self.record("list_tasks_by_status")?;
            Ok(self
                .tasks()
                .into_iter()
                .filter(|t| status.map_or(true, |s| t.status.is(s)))
                .collect())
        })
    }

    fn create_task(&self, draft: TaskDraft) -> BoxFuture<'_, Result<Task>> {
        Box::pin(async move {
            self.mutate("create_task")?;
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let task = Task {
                id: TaskId::new(id.to_string()),
                title: draft.title,
                description: draft.description,
                status: draft.status,
                created_at: None,
                updated_at: None,
            };
            self.tasks.lock().unwrap().push(task.clone());
            Ok(task)
        })
    }

    fn update_task_status(&self, id: TaskId, status: TaskStatus) -> BoxFuture<'_, Result<Task>> {
        Box::pin(async move {
            self.mutate("update_task_status")?;
            self.with_task("update_task_status", &id, |t| {
                t.status = ReportedStatus::Known(status);
                t.clone()
            })
        })
    }

    fn update_task(&self, id: TaskId, draft: TaskDraft) -> BoxFuture<'_, Result<Task>> {
        Box::pin(async move {
            self.mutate("update_task")?;
            self.with_task("update_task", &id, |t| {
                t.title = draft.title;
                t.description = draft.description;
                t.status = draft.status;
                t.clone()
            })
        })
    }

    fn delete_task(&self, id: TaskId) -> BoxFuture<'_, Result<DeleteConfirmation>> {
        Box::pin(async move {
            self.mutate("delete_task")?;
            let mut tasks = self.tasks.lock().unwrap();
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            if tasks.len() == before {
                return Err(Self::not_found("delete_task"));
            }
            Ok(DeleteConfirmation {
                detail: "Task deleted".to_string(),
            })
        })
    }

    fn autocomplete_description(&self, title: String) -> BoxFuture<'_, Result<Autocompletion>> {
        Box::pin(async move {
            self.record("autocomplete_description")?;
            Ok(Autocompletion {
                description: format!("Steps to {title}."),
            })
        })
    }

    fn summarize_pending(&self) -> BoxFuture<'_, Result<PendingSummary>> {
        Box::pin(async move {
            self.record("summarize_pending")?;
            let pending = self
                .tasks()
                .iter()
                .filter(|t| t.status.is(TaskStatus::Pending))
                .count();
            Ok(PendingSummary {
                summary: format!("{pending} pending"),
            })
        })
    }

    fn suggest_priorities(&self) -> BoxFuture<'_, Result<PrioritySuggestions>> {
        Box::pin(async move {
            self.record("suggest_priorities")?;
            Ok(PrioritySuggestions {
                priorities: self
                    .tasks()
                    .into_iter()
                    .map(|t| PriorityHint {
                        task_title: t.title,
                        suggestion: "soon".to_string(),
                    })
                    .collect(),
            })
        })
    }
}

/// Feed one key press through `update`.
pub fn press(model: &mut Model, code: KeyCode) -> Vec<Command> {
    update(model, Message::Key(KeyEvent::new(code, KeyModifiers::empty())))
}

pub fn press_ctrl(model: &mut Model, c: char) -> Vec<Command> {
    update(
        model,
        Message::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)),
    )
}

pub fn type_text(model: &mut Model, text: &str) {
    for c in text.chars() {
        press(model, KeyCode::Char(c));
    }
}

/// Execute `cmds`, feed every completion back through `update`, and keep
/// going until no request is outstanding. Returns every command issued,
/// including follow-ups.
pub async fn run_to_idle(
    model: &mut Model,
    api: &Arc<dyn TaskApi>,
    cmds: Vec<Command>,
) -> Vec<Command> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let mut queue: VecDeque<Command> = cmds.into();
    let mut issued = Vec::new();
    let mut outstanding = 0usize;

    loop {
        while let Some(cmd) = queue.pop_front() {
            issued.push(cmd.clone());
            if execute_command(cmd, api, &tx, &cancel) {
                continue;
            }
            outstanding += 1;
        }
        if outstanding == 0 {
            break;
        }
        let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("request did not complete in time")
            .expect("message channel closed");
        outstanding -= 1;
        queue.extend(update(model, msg));
    }

    issued
}

/// A model that has completed its initial fetch.
pub async fn started_model(api: &Arc<dyn TaskApi>) -> Model {
    let mut model = Model::new("http://localhost:8000/api");
    let init = model.init();
    run_to_idle(&mut model, api, init).await;
    model
}

pub fn fetch_count(cmds: &[Command]) -> usize {
    cmds.iter()
        .filter(|c| matches!(c, Command::FetchTasks { .. }))
        .count()
}
