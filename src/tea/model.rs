//! Model for the TEA (The Elm Architecture) pattern.
//!
//! The Model is pure application state - no channels, no handles, no runtime infrastructure.

use crate::api::PriorityHint;
use crate::render::{next_version, EditorView, FormView, RenderState, TaskView};

use super::command::Command;
use super::editor::EditModal;
use super::form::{FormField, TaskForm};
use super::list::TaskList;

/// Level of a notification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Error notification - displayed in red with "Error:" prefix
    Error,
    /// Informational notification - displayed in green
    Info,
}

/// A notification message to display to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// The severity level of the notification
    pub level: NotificationLevel,
    /// The notification message text
    pub message: String,
}

/// Which component owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    List,
    /// Typing into the new-task form.
    Form(FormField),
    /// Typing into the edit modal.
    Edit(FormField),
    /// Choosing a new status for the selected task.
    StatusPick,
    /// Delete confirmation.
    Confirm,
    /// AI insight overlay.
    Insight,
}

/// AI insight overlay content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insight {
    LoadingSummary,
    LoadingPriorities,
    Summary(String),
    Priorities(Vec<PriorityHint>),
}

impl Insight {
    pub fn title(&self) -> &'static str {
        match self {
            Insight::LoadingSummary | Insight::Summary(_) => "Resumen de pendientes",
            Insight::LoadingPriorities | Insight::Priorities(_) => "Prioridades sugeridas",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Insight::LoadingSummary | Insight::LoadingPriorities)
    }
}

/// Pure application state - the single source of truth.
pub struct Model {
    pub list: TaskList,
    pub form: TaskForm,
    pub editor: EditModal,
    pub mode: Mode,
    pub insight: Option<Insight>,

    pub notification: Option<Notification>,
    /// Whether the keymap legend is expanded (toggled by '?')
    pub show_keymap: bool,

    // Dirty flag - set when state changes and render is needed
    pub dirty: bool,

    /// Service base URL, shown in the header.
    pub base_url: String,
}

impl Model {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            list: TaskList::default(),
            form: TaskForm::default(),
            editor: EditModal::default(),
            mode: Mode::default(),
            insight: None,
            notification: None,
            show_keymap: false,
            dirty: true,
            base_url: base_url.into(),
        }
    }

    /// Commands to run at startup: the initial list fetch.
    pub fn init(&mut self) -> Vec<Command> {
        vec![self.refresh()]
    }

    /// Start a fresh list fetch. Supersedes any fetch still in flight.
    pub fn refresh(&mut self) -> Command {
        self.dirty = true;
        Command::FetchTasks {
            request: self.list.begin_fetch(),
        }
    }

    /// Create an immutable snapshot for the render thread.
    ///
    /// Each snapshot gets a monotonically increasing version number so the
    /// render thread can skip redundant draws.
    pub fn snapshot(&self) -> RenderState {
        let tasks: Vec<TaskView> = self.list.visible().into_iter().map(TaskView::from).collect();

        let editor = self.editor.is_open().then(|| EditorView {
            title: self.editor.title.clone(),
            description: self.editor.description.clone(),
            saving: self.editor.saving,
        });

        let confirm_delete = match self.mode {
            Mode::Confirm => self.list.pending_delete_task().map(|t| t.title.clone()),
            _ => None,
        };

        RenderState {
            version: next_version(),
            tasks,
            selected: self.list.selected,
            filter: self.list.filter,
            counts: self.list.counts(),
            loading: self.list.loading,
            mode: self.mode,
            form: FormView {
                title: self.form.title.clone(),
                description: self.form.description.clone(),
                submitting: self.form.submitting,
                autocompleting: self.form.autocompleting,
                can_autocomplete: self.form.can_autocomplete(),
            },
            editor,
            picker: (self.mode == Mode::StatusPick).then_some(self.list.picker),
            confirm_delete,
            insight: self.insight.clone(),
            notification: self.notification.clone(),
            show_keymap: self.show_keymap,
            base_url: self.base_url.clone(),
        }
    }
}
