//! Core domain models for neurotask.
//!
//! The task entity, its closed status type, and client-side filtering.

pub mod filter;
pub mod task;

pub use filter::{StatusCounts, StatusFilter};
pub use task::{is_blank, ReportedStatus, Task, TaskDraft, TaskId, TaskStatus};
