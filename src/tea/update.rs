//! Pure update function for the TEA (The Elm Architecture) pattern.
//!
//! The update function takes a model and a message, mutates the model,
//! and returns a list of commands to execute.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, error, info};

use crate::core::StatusFilter;

use super::command::Command;
use super::form::FormField;
use super::message::Message;
use super::model::{Insight, Mode, Model, Notification, NotificationLevel};

/// Helper to set an error notification and mark model as dirty.
fn set_error(model: &mut Model, message: String) {
    model.notification = Some(Notification {
        level: NotificationLevel::Error,
        message,
    });
    model.dirty = true;
}

/// Pure update function: Model + Message → Commands
///
/// This function:
/// 1. Takes the current model and an input message
/// 2. Mutates the model state (and sets dirty flag)
/// 3. Returns a list of commands (side effects) to execute
///
/// The function itself has no side effects - all I/O happens via returned Commands.
pub fn update(model: &mut Model, msg: Message) -> Vec<Command> {
    let mut cmds = Vec::new();

    match msg {
        Message::Key(key) => {
            model.notification = None; // Clear notification on any key press
            model.dirty = true; // Keyboard input always triggers render
            if is_ctrl(&key, 'c') {
                cmds.push(Command::Quit);
                return cmds;
            }
            match model.mode {
                Mode::List => update_list_mode(model, key, &mut cmds),
                Mode::Form(field) => update_form_mode(model, key, field, &mut cmds),
                Mode::Edit(field) => update_edit_mode(model, key, field, &mut cmds),
                Mode::StatusPick => update_status_pick_mode(model, key, &mut cmds),
                Mode::Confirm => update_confirm_mode(model, key, &mut cmds),
                Mode::Insight => update_insight_mode(model, key),
            }
        }

        Message::Resize(_, _) => {
            model.dirty = true; // Resize triggers re-render
        }

        Message::TasksLoaded { request, tasks } => {
            debug!(request = request.0, count = tasks.len(), "Message::TasksLoaded");
            if model.list.apply_fetch(request, tasks) {
                model.dirty = true;
            }
        }

        Message::TasksLoadFailed { request, error } => {
            error!(request = request.0, %error, "Error loading tasks");
            model.list.fetch_failed(request);
            model.dirty = true;
        }

        // Root composer: a created task triggers exactly one refresh.
        Message::TaskCreated(task) => {
            info!(id = %task.id, title = %task.title, "Task created");
            model.form.created();
            cmds.push(model.refresh());
        }

        Message::TaskCreateFailed(err) => {
            error!(error = %err, "Error creating task");
            model.form.create_failed();
            model.dirty = true;
        }

        Message::TaskStatusUpdated(task) => {
            info!(id = %task.id, status = ?task.status, "Task status updated");
            cmds.push(model.refresh());
        }

        Message::TaskStatusUpdateFailed(id, err) => {
            error!(%id, error = %err, "Error updating task status");
        }

        Message::TaskSaved(task) => {
            info!(id = %task.id, "Task saved");
            if model.editor.is_editing(&task.id) {
                model.editor.saved();
                if matches!(model.mode, Mode::Edit(_)) {
                    model.mode = Mode::List;
                }
            }
            cmds.push(model.refresh());
        }

        Message::TaskSaveFailed(id, err) => {
            error!(%id, error = %err, "Error saving task");
            if model.editor.is_editing(&id) {
                model.editor.save_failed();
                model.dirty = true;
            }
        }

        Message::TaskDeleted(id) => {
            info!(%id, "Task deleted");
            cmds.push(model.refresh());
        }

        Message::TaskDeleteFailed(id, err) => {
            error!(%id, error = %err, "Error deleting task");
        }

        Message::DescriptionSuggested(description) => {
            debug!(len = description.len(), "Message::DescriptionSuggested");
            model.form.autocompleted(description);
            model.dirty = true;
        }

        Message::DescriptionSuggestFailed(err) => {
            error!(error = %err, "Error auto-completing description");
            model.form.autocomplete_failed();
            model.dirty = true;
        }

        Message::SummaryReady(summary) => {
            // Ignore if the overlay was dismissed while loading
            if model.insight == Some(Insight::LoadingSummary) {
                model.insight = Some(Insight::Summary(summary));
                model.dirty = true;
            }
        }

        Message::PrioritiesReady(priorities) => {
            if model.insight == Some(Insight::LoadingPriorities) {
                model.insight = Some(Insight::Priorities(priorities));
                model.dirty = true;
            }
        }

        Message::InsightFailed(err) => {
            error!(error = %err, "Error fetching AI insight");
            close_insight(model);
        }
    }

    cmds
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

fn update_list_mode(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => model.list.select_next(),

        KeyCode::Char('k') | KeyCode::Up => model.list.select_prev(),

        KeyCode::Char('l') | KeyCode::Right => {
            let next = model.list.filter.next();
            model.list.set_filter(next);
        }

        KeyCode::Char('h') | KeyCode::Left => {
            let prev = model.list.filter.prev();
            model.list.set_filter(prev);
        }

        KeyCode::Char(c @ '0'..='4') => {
            let index = c as usize - '0' as usize;
            if let Some(filter) = StatusFilter::from_index(index) {
                model.list.set_filter(filter);
            }
        }

        KeyCode::Char('n') | KeyCode::Char('a') => {
            model.mode = Mode::Form(FormField::Title);
        }

        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(task) = model.list.selected_task() {
                let task = task.clone();
                model.editor.open(&task);
                model.mode = Mode::Edit(FormField::Title);
            }
        }

        KeyCode::Char('s') => {
            if model.list.begin_status_pick() {
                model.mode = Mode::StatusPick;
            }
        }

        KeyCode::Char('d') => {
            if model.list.request_delete() {
                model.mode = Mode::Confirm;
            }
        }

        KeyCode::Char('r') => {
            cmds.push(model.refresh());
        }

        KeyCode::Char('i') => {
            model.insight = Some(Insight::LoadingSummary);
            model.mode = Mode::Insight;
            cmds.push(Command::FetchSummary);
        }

        KeyCode::Char('p') => {
            model.insight = Some(Insight::LoadingPriorities);
            model.mode = Mode::Insight;
            cmds.push(Command::FetchPriorities);
        }

        KeyCode::Char('q') | KeyCode::Esc => {
            cmds.push(Command::Quit);
        }

        KeyCode::Char('?') => {
            model.show_keymap = !model.show_keymap;
        }

        _ => {}
    }
}

fn update_form_mode(model: &mut Model, key: KeyEvent, field: FormField, cmds: &mut Vec<Command>) {
    if is_ctrl(&key, 'g') {
        if let Some(title) = model.form.begin_autocomplete() {
            cmds.push(Command::AutocompleteDescription { title });
        }
        return;
    }

    match key.code {
        KeyCode::Enter => {
            // Blank titles are rejected here; no request is issued.
            if let Some(draft) = model.form.submit() {
                cmds.push(Command::CreateTask { draft });
                model.mode = Mode::List;
            }
        }

        KeyCode::Tab | KeyCode::BackTab => {
            model.mode = Mode::Form(field.next());
        }

        // Leave the form; its contents stay for later.
        KeyCode::Esc => {
            model.mode = Mode::List;
        }

        KeyCode::Backspace if !model.form.submitting => {
            model.form.field_mut(field).pop();
        }

        KeyCode::Char(c) if accepts_char(&key) && !model.form.submitting => {
            model.form.field_mut(field).push(c);
        }

        _ => {}
    }
}

fn update_edit_mode(model: &mut Model, key: KeyEvent, field: FormField, cmds: &mut Vec<Command>) {
    match key.code {
        KeyCode::Enter => match model.editor.submit() {
            Ok(Some((id, draft))) => cmds.push(Command::SaveTask { id, draft }),
            Ok(None) => {}
            Err(e) => set_error(model, validation_message(e)),
        },

        KeyCode::Tab | KeyCode::BackTab => {
            model.mode = Mode::Edit(field.next());
        }

        // Cancel: close without saving.
        KeyCode::Esc => {
            model.editor.close();
            model.mode = Mode::List;
        }

        KeyCode::Backspace if !model.editor.saving => {
            model.editor.field_mut(field).pop();
        }

        KeyCode::Char(c) if accepts_char(&key) && !model.editor.saving => {
            model.editor.field_mut(field).push(c);
        }

        _ => {}
    }
}

fn update_status_pick_mode(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => model.list.picker_next(),

        KeyCode::Char('k') | KeyCode::Up => model.list.picker_prev(),

        KeyCode::Enter => {
            if let Some((id, status)) = model.list.picked_change() {
                cmds.push(Command::UpdateTaskStatus { id, status });
            }
            model.mode = Mode::List;
        }

        KeyCode::Esc | KeyCode::Char('q') => {
            model.mode = Mode::List;
        }

        _ => {}
    }
}

fn update_confirm_mode(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('y') => {
            if let Some(id) = model.list.pending_delete.take() {
                cmds.push(Command::DeleteTask { id });
            }
            model.mode = Mode::List;
        }

        KeyCode::Esc | KeyCode::Char('n') => {
            model.list.pending_delete = None;
            model.mode = Mode::List;
        }

        _ => {}
    }
}

fn update_insight_mode(model: &mut Model, key: KeyEvent) {
    if matches!(
        key.code,
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')
    ) {
        close_insight(model);
    }
}

fn close_insight(model: &mut Model) {
    model.insight = None;
    if model.mode == Mode::Insight {
        model.mode = Mode::List;
    }
    model.dirty = true;
}

/// Plain characters only; control chords are commands, not text.
fn accepts_char(key: &KeyEvent) -> bool {
    !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

fn validation_message(err: crate::Error) -> String {
    match err {
        crate::Error::Validation(message) => message,
        other => other.to_string(),
    }
}
