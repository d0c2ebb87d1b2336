//! Commands for the TEA (The Elm Architecture) pattern.
//!
//! Commands are outputs from the update function - they represent side effects
//! to be executed by the runtime.

use crate::core::{TaskDraft, TaskId, TaskStatus};

use super::list::RequestId;

/// Output commands from the update function.
/// Each API command becomes exactly one request to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // List
    FetchTasks { request: RequestId },
    UpdateTaskStatus { id: TaskId, status: TaskStatus },
    DeleteTask { id: TaskId },

    // Form
    CreateTask { draft: TaskDraft },
    AutocompleteDescription { title: String },

    // Edit modal
    SaveTask { id: TaskId, draft: TaskDraft },

    // AI insights
    FetchSummary,
    FetchPriorities,

    // App lifecycle
    Quit,
}
