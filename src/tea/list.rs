//! Task list state: the fetched set, the active filter and the selection.
//!
//! Selection indexes into the *filtered* view, not the full set.

use tracing::warn;

use crate::core::{StatusCounts, StatusFilter, Task, TaskId, TaskStatus};

/// Identifies one list fetch so late responses can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, Default)]
pub struct TaskList {
    pub tasks: Vec<Task>,
    pub filter: StatusFilter,
    pub selected: usize,
    pub loading: bool,
    /// Task awaiting delete confirmation.
    pub pending_delete: Option<TaskId>,
    /// Cursor of the status picker.
    pub picker: TaskStatus,
    latest_request: RequestId,
}

impl TaskList {
    pub fn visible(&self) -> Vec<&Task> {
        self.filter.apply(&self.tasks)
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.tasks)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(len - 1);
        }
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.selected = 0;
        }
    }

    /// Mark a fetch as in flight and return its id. Any earlier fetch still
    /// in flight becomes stale.
    pub fn begin_fetch(&mut self) -> RequestId {
        self.latest_request = RequestId(self.latest_request.0 + 1);
        self.loading = true;
        self.latest_request
    }

    pub fn is_latest(&self, request: RequestId) -> bool {
        request == self.latest_request
    }

    /// Replace the task set. Returns `false` (and changes nothing) when the
    /// response belongs to a superseded fetch.
    pub fn apply_fetch(&mut self, request: RequestId, tasks: Vec<Task>) -> bool {
        if !self.is_latest(request) {
            warn!(
                request = request.0,
                latest = self.latest_request.0,
                "Discarding stale task list response"
            );
            return false;
        }
        self.tasks = tasks;
        self.loading = false;
        self.clamp_selection();
        true
    }

    /// Prior tasks stay on screen.
    pub fn fetch_failed(&mut self, request: RequestId) {
        if self.is_latest(request) {
            self.loading = false;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Open the status picker on the selected task's current status.
    pub fn begin_status_pick(&mut self) -> bool {
        let Some(status) = self.selected_task().map(|t| t.display_status()) else {
            return false;
        };
        self.picker = status;
        true
    }

    pub fn picker_next(&mut self) {
        self.picker = TaskStatus::ALL[(self.picker.index() + 1) % TaskStatus::ALL.len()];
    }

    pub fn picker_prev(&mut self) {
        let len = TaskStatus::ALL.len();
        self.picker = TaskStatus::ALL[(self.picker.index() + len - 1) % len];
    }

    /// The selected task's id and the picked status, if it is a change.
    pub fn picked_change(&self) -> Option<(TaskId, TaskStatus)> {
        let task = self.selected_task()?;
        if task.status.is(self.picker) {
            return None;
        }
        Some((task.id.clone(), self.picker))
    }

    pub fn request_delete(&mut self) -> bool {
        self.pending_delete = self.selected_task().map(|t| t.id.clone());
        self.pending_delete.is_some()
    }

    pub fn pending_delete_task(&self) -> Option<&Task> {
        let id = self.pending_delete.as_ref()?;
        self.tasks.iter().find(|t| &t.id == id)
    }
}
