//! New-task form state.
//!
//! Holds the title and description being typed plus the two in-flight flags.
//! The form never talks to the service: `submit` and `begin_autocomplete`
//! hand back what should be sent, and the completion methods fold the
//! outcome back in.

use crate::core::{is_blank, TaskDraft};

/// Input field of the form and of the edit modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Description,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Título",
            FormField::Description => "Descripción",
        }
    }

    /// Cycle to the other field (Tab behavior).
    pub fn next(&self) -> FormField {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Title,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub submitting: bool,
    pub autocompleting: bool,
}

impl TaskForm {
    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
        }
    }

    /// Autocomplete is only offered once there is a title to complete from.
    pub fn can_autocomplete(&self) -> bool {
        !is_blank(&self.title) && !self.autocompleting
    }

    pub fn can_submit(&self) -> bool {
        !is_blank(&self.title) && !self.submitting
    }

    /// Start a create request. Returns `None` when the title is blank or a
    /// create is already in flight.
    pub fn submit(&mut self) -> Option<TaskDraft> {
        if !self.can_submit() {
            return None;
        }
        self.submitting = true;
        Some(TaskDraft::pending(&self.title, &self.description))
    }

    pub fn created(&mut self) {
        self.title.clear();
        self.description.clear();
        self.submitting = false;
    }

    /// Contents stay as typed so the user can retry.
    pub fn create_failed(&mut self) {
        self.submitting = false;
    }

    /// Start an autocomplete request, returning the title to send.
    pub fn begin_autocomplete(&mut self) -> Option<String> {
        if !self.can_autocomplete() {
            return None;
        }
        self.autocompleting = true;
        Some(self.title.clone())
    }

    /// Replace the description outright with the suggestion.
    pub fn autocompleted(&mut self, description: String) {
        self.description = description;
        self.autocompleting = false;
    }

    pub fn autocomplete_failed(&mut self) {
        self.autocompleting = false;
    }
}
