//! Task priorities, stored status and the computed task state.
//!
//! Only `incomplete` and `complete` are stored. A task whose due date has
//! passed while still incomplete is reported as `decayed`; that state is an
//! overlay computed at read time and never written back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Title given to tasks saved with a blank title.
pub const DEFAULT_TITLE: &str = "Untitled";

/// A stored enum value that does not match any variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} \"{value}\"")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(UnknownVariant {
                kind: "priority",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted task status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Incomplete,
    Complete,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Incomplete => "incomplete",
            TaskStatus::Complete => "complete",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incomplete" => Ok(TaskStatus::Incomplete),
            "complete" => Ok(TaskStatus::Complete),
            other => Err(UnknownVariant {
                kind: "task status",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// What clients see in the `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Incomplete,
    Complete,
    Decayed,
}

impl TaskState {
    pub fn of(status: TaskStatus, due_date: Option<Timestamp>, now: Timestamp) -> Self {
        match status {
            TaskStatus::Complete => TaskState::Complete,
            TaskStatus::Incomplete => match due_date {
                Some(due) if due < now => TaskState::Decayed,
                _ => TaskState::Incomplete,
            },
        }
    }
}

/// Transitions that change the stored status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Complete,
    Resume,
}

impl Transition {
    pub fn target(self) -> TaskStatus {
        match self {
            Transition::Complete => TaskStatus::Complete,
            Transition::Resume => TaskStatus::Incomplete,
        }
    }
}

/// A reminder must not fire after the deadline.
pub fn check_schedule(
    due_date: Option<Timestamp>,
    remind_at: Option<Timestamp>,
) -> Result<(), CoreError> {
    match (due_date, remind_at) {
        (Some(due), Some(remind)) if remind > due => Err(CoreError::InvalidSchedule),
        _ => Ok(()),
    }
}

/// Clamp a requested 1-based position into `[1, count]`.
pub fn clamp_position(requested: i64, count: i64) -> i32 {
    let upper = count.max(1);
    let clamped = requested.clamp(1, upper);
    i32::try_from(clamped).unwrap_or(i32::MAX)
}
