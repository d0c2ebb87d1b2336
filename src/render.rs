use crate::core::{StatusCounts, StatusFilter, Task, TaskId, TaskStatus};
use crate::tea::{Insight, Mode, Notification};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Render loop frame budget (60fps).
pub const FRAME_DURATION: Duration = Duration::from_micros(16_666);

#[derive(Debug, Clone)]
pub struct TaskView {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    /// Status as displayed; unknown service values show as pending.
    pub status: TaskStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description_text().to_string(),
            status: task.display_status(),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Snapshot of the new-task form.
#[derive(Debug, Clone, Default)]
pub struct FormView {
    pub title: String,
    pub description: String,
    pub submitting: bool,
    pub autocompleting: bool,
    pub can_autocomplete: bool,
}

/// Snapshot of the open edit modal.
#[derive(Debug, Clone, Default)]
pub struct EditorView {
    pub title: String,
    pub description: String,
    pub saving: bool,
}

static VERSION_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn next_version() -> u64 {
    VERSION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone)]
pub struct RenderState {
    pub version: u64,
    /// Tasks passing the active filter, in service order.
    pub tasks: Vec<TaskView>,
    pub selected: usize,
    pub filter: StatusFilter,
    /// Counts over the full set, not the filtered view.
    pub counts: StatusCounts,
    pub loading: bool,
    pub mode: Mode,
    pub form: FormView,
    pub editor: Option<EditorView>,
    /// Highlighted status while the picker is open.
    pub picker: Option<TaskStatus>,
    /// Title of the task awaiting delete confirmation.
    pub confirm_delete: Option<String>,
    pub insight: Option<Insight>,
    pub notification: Option<Notification>,
    /// Whether the keymap legend is expanded (toggled by '?')
    pub show_keymap: bool,
    pub base_url: String,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            version: 0,
            tasks: Vec::new(),
            selected: 0,
            filter: StatusFilter::ALL,
            counts: StatusCounts::default(),
            loading: false,
            mode: Mode::List,
            form: FormView::default(),
            editor: None,
            picker: None,
            confirm_delete: None,
            insight: None,
            notification: None,
            show_keymap: false,
            base_url: String::new(),
        }
    }
}
