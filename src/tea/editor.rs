//! Edit modal state.
//!
//! Bound to one task at a time. Persistence is delegated: `submit` returns
//! the id and draft for the caller to send, and the caller reports back
//! through `saved` / `save_failed`.

use crate::core::{is_blank, Task, TaskDraft, TaskId};
use crate::{Error, Result};

use super::form::FormField;

/// Shown when the user tries to save without a title.
pub const BLANK_TITLE_MESSAGE: &str = "Por favor, ingresa un título para la tarea.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditModal {
    pub task: Option<Task>,
    pub title: String,
    pub description: String,
    pub saving: bool,
}

impl EditModal {
    pub fn is_open(&self) -> bool {
        self.task.is_some()
    }

    /// Open on `task`, seeding the fields from its current values.
    pub fn open(&mut self, task: &Task) {
        self.title = task.title.clone();
        self.description = task.description_text().to_string();
        self.task = Some(task.clone());
        self.saving = false;
    }

    /// Whether the modal is open on the task with `id`.
    pub fn is_editing(&self, id: &TaskId) -> bool {
        self.task.as_ref().is_some_and(|task| &task.id == id)
    }

    /// Close without saving.
    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
        }
    }

    /// Validate and produce the update to send.
    ///
    /// `Ok(None)` means there is nothing to do (closed, or a save is
    /// already in flight).
    pub fn submit(&mut self) -> Result<Option<(TaskId, TaskDraft)>> {
        let Some(task) = &self.task else {
            return Ok(None);
        };
        if self.saving {
            return Ok(None);
        }
        if is_blank(&self.title) {
            return Err(Error::Validation(BLANK_TITLE_MESSAGE.to_string()));
        }
        let draft = task.edited(&self.title, &self.description);
        let id = task.id.clone();
        self.saving = true;
        Ok(Some((id, draft)))
    }

    pub fn saved(&mut self) {
        self.close();
    }

    /// Stay open with the user's edits intact.
    pub fn save_failed(&mut self) {
        self.saving = false;
    }
}
