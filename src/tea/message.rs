//! Messages for the TEA (The Elm Architecture) pattern.
//!
//! Messages are inputs to the update function - they come from the keyboard
//! or from request completions reported by the runtime.

use crossterm::event::KeyEvent;

use crate::api::PriorityHint;
use crate::core::{Task, TaskId};

use super::list::RequestId;

/// Input messages to the update function.
#[derive(Debug)]
pub enum Message {
    // Keyboard/terminal events
    Key(KeyEvent),
    Resize(u16, u16),

    // List fetch
    TasksLoaded { request: RequestId, tasks: Vec<Task> },
    TasksLoadFailed { request: RequestId, error: String },

    // Mutations
    TaskCreated(Task),
    TaskCreateFailed(String),
    TaskStatusUpdated(Task),
    TaskStatusUpdateFailed(TaskId, String),
    TaskSaved(Task),
    TaskSaveFailed(TaskId, String),
    TaskDeleted(TaskId),
    TaskDeleteFailed(TaskId, String),

    // Autocomplete
    DescriptionSuggested(String),
    DescriptionSuggestFailed(String),

    // AI insights
    SummaryReady(String),
    PrioritiesReady(Vec<PriorityHint>),
    InsightFailed(String),
}
