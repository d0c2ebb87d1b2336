//! Task data model shared by the API client and the TUI.
//!
//! The service is the only source of truth for tasks; the client never
//! mutates a `Task` locally, it only reads what the last fetch returned and
//! builds `TaskDraft`s to send back.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// Identifier assigned by the remote service.
///
/// Treated as an opaque token. The service emits UUID strings, but numeric
/// ids are accepted too and kept in their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the first 8 characters for display.
    pub fn short(&self) -> String {
        self.0.chars().take(8).collect()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        })
    }
}

/// Task status, with the display metadata used by every view.
///
/// The filter bar, the task rows and the status picker all read their
/// labels and icons from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Canceled,
}

impl TaskStatus {
    /// Every status in display order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Canceled,
    ];

    /// Wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Canceled => "canceled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pendiente",
            TaskStatus::InProgress => "En Progreso",
            TaskStatus::Completed => "Completada",
            TaskStatus::Canceled => "Cancelada",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "⏳",
            TaskStatus::InProgress => "🚀",
            TaskStatus::Completed => "✅",
            TaskStatus::Canceled => "❌",
        }
    }

    /// Position in [`TaskStatus::ALL`].
    pub fn index(&self) -> usize {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
            TaskStatus::Canceled => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::Validation(format!("unknown status '{s}'")))
    }
}

/// Status exactly as the service reported it.
///
/// Any value outside the four known statuses, including `null`, numbers and
/// objects, is kept verbatim so that an edit sends it back untouched; it
/// only *displays* as pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportedStatus {
    Known(TaskStatus),
    Unknown(serde_json::Value),
}

impl ReportedStatus {
    /// Status used for labels, icons and pickers.
    pub fn display(&self) -> TaskStatus {
        match self {
            ReportedStatus::Known(status) => *status,
            ReportedStatus::Unknown(_) => TaskStatus::Pending,
        }
    }

    pub fn is(&self, status: TaskStatus) -> bool {
        matches!(self, ReportedStatus::Known(s) if *s == status)
    }
}

impl Default for ReportedStatus {
    fn default() -> Self {
        ReportedStatus::Known(TaskStatus::Pending)
    }
}

impl From<TaskStatus> for ReportedStatus {
    fn from(status: TaskStatus) -> Self {
        ReportedStatus::Known(status)
    }
}

/// A task as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ReportedStatus,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn display_status(&self) -> TaskStatus {
        self.status.display()
    }

    /// Description text, empty when absent.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Merge edited fields into this task, keeping its reported status.
    ///
    /// Title and description are trimmed. The description is always sent
    /// (possibly empty) so that clearing it reaches the service.
    pub fn edited(&self, title: &str, description: &str) -> TaskDraft {
        TaskDraft {
            title: title.trim().to_string(),
            description: Some(description.trim().to_string()),
            status: self.status.clone(),
        }
    }
}

/// Body of create and full-update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: ReportedStatus,
}

impl TaskDraft {
    /// Draft for a new task. Fields are sent as typed; an empty description
    /// is omitted.
    pub fn pending(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            status: ReportedStatus::Known(TaskStatus::Pending),
        }
    }
}

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Accepts RFC 3339 timestamps as well as the naive UTC form the service
/// emits (`2024-05-01T12:00:00.123456`). Anything else becomes `None`.
fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
