use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use crossterm::event::{self, Event, KeyEventKind};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::TaskApi;
use crate::render::RenderState;
use crate::tea::{update, Command, Message, Model};
use crate::Result;

const MAX_BG_MESSAGES: usize = 50;

pub struct LogicThread;

impl LogicThread {
    pub fn run(
        model: Model,
        api: Arc<dyn TaskApi>,
        publisher: StatePublisher,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()> {
        Runtime::new()?.block_on(Self::run_async(model, api, publisher, shutdown))
    }

    async fn run_async(
        mut model: Model,
        api: Arc<dyn TaskApi>,
        publisher: StatePublisher,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()> {
        debug!(base_url = %model.base_url, "LogicThread::run_async");
        let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<Message>();
        let cancel = CancellationToken::new();

        for cmd in model.init() {
            execute_command(cmd, &api, &msg_tx, &cancel);
        }
        model.dirty = true;
        publisher.flush(&mut model);

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            // Keyboard input (priority)
            while event::poll(Duration::ZERO)? {
                let msg = match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => Message::Key(key),
                    Event::Resize(w, h) => Message::Resize(w, h),
                    _ => continue,
                };

                for cmd in update(&mut model, msg) {
                    if execute_command(cmd, &api, &msg_tx, &cancel) {
                        shutdown.store(true, Ordering::Relaxed);
                        return Ok(());
                    }
                }

                publisher.flush(&mut model);
            }

            // Request completions (bounded)
            for _ in 0..MAX_BG_MESSAGES {
                let Ok(msg) = msg_rx.try_recv() else { break };
                for cmd in update(&mut model, msg) {
                    if execute_command(cmd, &api, &msg_tx, &cancel) {
                        shutdown.store(true, Ordering::Relaxed);
                        return Ok(());
                    }
                }
            }

            publisher.flush(&mut model);

            tokio::time::sleep(Duration::from_micros(500)).await;
        }

        cancel.cancel();
        Ok(())
    }
}

/// Run one command. API commands are spawned onto the current tokio runtime
/// and report back through `msg_tx`; they are dropped unanswered once
/// `cancel` fires.
///
/// Returns `true` when the app should quit.
pub fn execute_command(
    cmd: Command,
    api: &Arc<dyn TaskApi>,
    msg_tx: &mpsc::UnboundedSender<Message>,
    cancel: &CancellationToken,
) -> bool {
    match cmd {
        Command::FetchTasks { request } => {
            debug!(request = request.0, "Command::FetchTasks");
            let api = api.clone();
            spawn_request(
                msg_tx,
                cancel,
                "list tasks",
                async move { api.list_tasks().await },
                move |result| match result {
                    Ok(tasks) => Message::TasksLoaded { request, tasks },
                    Err(e) => Message::TasksLoadFailed {
                        request,
                        error: e.to_string(),
                    },
                },
            );
        }

        Command::UpdateTaskStatus { id, status } => {
            debug!(%id, %status, "Command::UpdateTaskStatus");
            let api = api.clone();
            let task_id = id.clone();
            spawn_request(
                msg_tx,
                cancel,
                "update task status",
                async move { api.update_task_status(task_id, status).await },
                move |result| match result {
                    Ok(task) => Message::TaskStatusUpdated(task),
                    Err(e) => Message::TaskStatusUpdateFailed(id, e.to_string()),
                },
            );
        }

        Command::DeleteTask { id } => {
            debug!(%id, "Command::DeleteTask");
            let api = api.clone();
            let task_id = id.clone();
            spawn_request(
                msg_tx,
                cancel,
                "delete task",
                async move { api.delete_task(task_id).await },
                move |result| match result {
                    Ok(_) => Message::TaskDeleted(id),
                    Err(e) => Message::TaskDeleteFailed(id, e.to_string()),
                },
            );
        }

        Command::CreateTask { draft } => {
            debug!(title = %draft.title, "Command::CreateTask");
            let api = api.clone();
            spawn_request(
                msg_tx,
                cancel,
                "create task",
                async move { api.create_task(draft).await },
                |result| match result {
                    Ok(task) => Message::TaskCreated(task),
                    Err(e) => Message::TaskCreateFailed(e.to_string()),
                },
            );
        }

        Command::AutocompleteDescription { title } => {
            debug!(title = %title, "Command::AutocompleteDescription");
            let api = api.clone();
            spawn_request(
                msg_tx,
                cancel,
                "autocomplete description",
                async move { api.autocomplete_description(title).await },
                |result| match result {
                    Ok(completion) => Message::DescriptionSuggested(completion.description),
                    Err(e) => Message::DescriptionSuggestFailed(e.to_string()),
                },
            );
        }

        Command::SaveTask { id, draft } => {
            debug!(%id, "Command::SaveTask");
            let api = api.clone();
            let task_id = id.clone();
            spawn_request(
                msg_tx,
                cancel,
                "save task",
                async move { api.update_task(task_id, draft).await },
                move |result| match result {
                    Ok(task) => Message::TaskSaved(task),
                    Err(e) => Message::TaskSaveFailed(id, e.to_string()),
                },
            );
        }

        Command::FetchSummary => {
            debug!("Command::FetchSummary");
            let api = api.clone();
            spawn_request(
                msg_tx,
                cancel,
                "summarize pending tasks",
                async move { api.summarize_pending().await },
                |result| match result {
                    Ok(summary) => Message::SummaryReady(summary.summary),
                    Err(e) => Message::InsightFailed(e.to_string()),
                },
            );
        }

        Command::FetchPriorities => {
            debug!("Command::FetchPriorities");
            let api = api.clone();
            spawn_request(
                msg_tx,
                cancel,
                "suggest priorities",
                async move { api.suggest_priorities().await },
                |result| match result {
                    Ok(suggestions) => Message::PrioritiesReady(suggestions.priorities),
                    Err(e) => Message::InsightFailed(e.to_string()),
                },
            );
        }

        Command::Quit => {
            debug!("Command::Quit");
            cancel.cancel();
            return true;
        }
    }

    false
}

/// Spawn `request` and send its outcome back as a message, unless
/// `cancel` fires first.
fn spawn_request<T, F, M>(
    msg_tx: &mpsc::UnboundedSender<Message>,
    cancel: &CancellationToken,
    operation: &'static str,
    request: F,
    into_message: M,
) where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
    M: FnOnce(Result<T>) -> Message + Send + 'static,
{
    let tx = msg_tx.clone();
    let cancel = cancel.clone();
    tokio::spawn(async move {
        let result = tokio::select! {
            _ = cancel.cancelled() => {
                debug!(operation, "Request cancelled");
                return;
            }
            result = request => result,
        };
        let _ = tx.send(into_message(result));
    });
}

/// Create the snapshot channel between the logic thread and the renderer.
pub fn state_channel() -> (StatePublisher, Receiver<RenderState>) {
    let (tx, rx) = crossbeam_channel::bounded(1);
    let publisher = StatePublisher {
        tx,
        stale: rx.clone(),
    };
    (publisher, rx)
}

/// Sending half of the snapshot channel.
///
/// The channel holds one snapshot. Publishing replaces a snapshot the
/// renderer has not taken yet, so the renderer always sees the newest state
/// and the logic thread never blocks.
pub struct StatePublisher {
    tx: Sender<RenderState>,
    stale: Receiver<RenderState>,
}

impl StatePublisher {
    /// Returns `false` once the renderer is gone.
    pub fn publish(&self, mut state: RenderState) -> bool {
        loop {
            match self.tx.try_send(state) {
                Ok(()) => return true,
                Err(TrySendError::Full(pending)) => {
                    let _ = self.stale.try_recv();
                    state = pending;
                }
                Err(TrySendError::Disconnected(_)) => return false,
            }
        }
    }

    /// Publish a snapshot if the model changed. `dirty` stays set when the
    /// snapshot could not be delivered.
    pub fn flush(&self, model: &mut Model) {
        if model.dirty && self.publish(model.snapshot()) {
            model.dirty = false;
        }
    }
}
