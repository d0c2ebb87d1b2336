//! Client-side status filtering.
//!
//! The list is always fetched in full and filtered here, so the counters in
//! the filter bar describe the whole set regardless of the active filter.

use super::task::{Task, TaskStatus};

/// Active status filter. `StatusFilter::ALL` shows every task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFilter(Option<TaskStatus>);

impl StatusFilter {
    pub const ALL: StatusFilter = StatusFilter(None);

    /// Filter options in the order the filter bar shows them.
    pub const OPTIONS: [StatusFilter; 5] = [
        StatusFilter(None),
        StatusFilter(Some(TaskStatus::Pending)),
        StatusFilter(Some(TaskStatus::InProgress)),
        StatusFilter(Some(TaskStatus::Completed)),
        StatusFilter(Some(TaskStatus::Canceled)),
    ];

    pub fn only(status: TaskStatus) -> Self {
        Self(Some(status))
    }

    pub fn status(&self) -> Option<TaskStatus> {
        self.0
    }

    pub fn is_all(&self) -> bool {
        self.0.is_none()
    }

    /// A task matches when the service reported exactly this status.
    pub fn matches(&self, task: &Task) -> bool {
        match self.0 {
            None => true,
            Some(status) => task.status.is(status),
        }
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }

    pub fn label(&self) -> &'static str {
        match self.0 {
            None => "Todas",
            Some(status) => status.label(),
        }
    }

    pub fn icon(&self) -> Option<&'static str> {
        self.0.map(|s| s.icon())
    }

    fn position(&self) -> usize {
        self.0.map(|s| s.index() + 1).unwrap_or(0)
    }

    /// Number-key shortcut: 0 is "all", 1-4 follow status order.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::OPTIONS.get(index).copied()
    }

    pub fn next(&self) -> Self {
        Self::OPTIONS[(self.position() + 1) % Self::OPTIONS.len()]
    }

    pub fn prev(&self) -> Self {
        let len = Self::OPTIONS.len();
        Self::OPTIONS[(self.position() + len - 1) % len]
    }
}

/// Per-filter task counts over the full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub all: usize,
    by_status: [usize; 4],
}

impl StatusCounts {
    pub fn tally(tasks: &[Task]) -> Self {
        let mut counts = Self {
            all: tasks.len(),
            by_status: [0; 4],
        };
        for task in tasks {
            if let Some(status) = TaskStatus::ALL.into_iter().find(|s| task.status.is(*s)) {
                counts.by_status[status.index()] += 1;
            }
        }
        counts
    }

    pub fn get(&self, filter: StatusFilter) -> usize {
        match filter.status() {
            None => self.all,
            Some(status) => self.by_status[status.index()],
        }
    }
}
