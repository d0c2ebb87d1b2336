//! The Elm Architecture (TEA) implementation for the NeuroTask TUI.
//!
//! This module provides a clean separation of concerns:
//! - `Model`: Pure application state, composed of the list, form and editor
//! - `Message`: Inputs to the update function
//! - `Command`: Outputs (side effects) from the update function
//! - `update`: Pure function that transforms state

pub mod command;
pub mod editor;
pub mod form;
pub mod list;
pub mod message;
pub mod model;
pub mod update;

pub use command::Command;
pub use editor::{EditModal, BLANK_TITLE_MESSAGE};
pub use form::{FormField, TaskForm};
pub use list::{RequestId, TaskList};
pub use message::Message;
pub use model::{Insight, Mode, Model, Notification, NotificationLevel};
pub use update::update;
