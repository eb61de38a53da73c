//! Task records consumed by the distribution engine.
//!
//! Task shapes arrive from the upload pipeline and the task store, so
//! deserialization is deliberately permissive: unknown priorities read as
//! medium, unknown statuses are carried as-is, and a premium that is
//! missing or unparseable reads as zero. An assignment must always be
//! possible for a non-empty roster.

use crate::{
    error::{DeskError, DeskResult},
    types::{MemberName, TaskId, HIGH_VALUE_PREMIUM},
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Task priority. Ordering runs low → medium → high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Parse a priority label. Anything unrecognised is medium.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Score multiplier applied by the hybrid strategy.
    pub fn multiplier(&self) -> f64 {
        match self {
            Priority::High => 1.5,
            Priority::Medium => 1.0,
            Priority::Low => 0.8,
        }
    }
}

impl From<Option<String>> for Priority {
    fn from(label: Option<String>) -> Self {
        label.as_deref().map(Priority::from_label).unwrap_or_default()
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Lifecycle status of a task in flight. Only `Open` counts toward load;
/// a missing, null or blank status is `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum TaskStatus {
    Open,
    #[default]
    Unknown,
    Other(String),
}

impl From<Option<String>> for TaskStatus {
    fn from(label: Option<String>) -> Self {
        match label {
            None => TaskStatus::Unknown,
            Some(s) if s.trim().is_empty() => TaskStatus::Unknown,
            Some(s) if s.trim().eq_ignore_ascii_case("open") => TaskStatus::Open,
            Some(s) if s.trim().eq_ignore_ascii_case("unknown") => TaskStatus::Unknown,
            Some(s) => TaskStatus::Other(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Open => "open".to_string(),
            TaskStatus::Unknown => "unknown".to_string(),
            TaskStatus::Other(s) => s,
        }
    }
}

/// A new task awaiting an assignee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    #[serde(rename = "type", alias = "task_type", default)]
    pub task_type: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "lenient_premium")]
    pub premium: f64,
}

impl TaskDescriptor {
    pub fn new(task_type: impl Into<String>, priority: Priority, premium: f64) -> Self {
        Self {
            task_type: task_type.into(),
            priority,
            premium,
        }
    }

    /// Premium as used in scoring: negative or non-finite values count as zero.
    pub fn effective_premium(&self) -> f64 {
        clamp_premium(self.premium)
    }

    pub fn is_high_value(&self) -> bool {
        self.effective_premium() >= HIGH_VALUE_PREMIUM
    }

    /// Strict check for callers that want to reject malformed uploads.
    /// The assignment path never calls this.
    pub fn validate(&self) -> DeskResult<()> {
        if self.task_type.trim().is_empty() {
            return Err(DeskError::InvalidTask {
                reason: "task type is blank".into(),
            });
        }
        if !self.premium.is_finite() || self.premium < 0.0 {
            return Err(DeskError::InvalidTask {
                reason: format!("premium {} is not a non-negative amount", self.premium),
            });
        }
        Ok(())
    }
}

/// A task already in flight, as supplied in the caller's snapshot.
/// A row without an id loads with an empty id rather than failing the
/// whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingTask {
    #[serde(default)]
    pub id: TaskId,
    #[serde(rename = "type", alias = "task_type", default)]
    pub task_type: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "lenient_premium")]
    pub premium: f64,
    #[serde(default, alias = "assignedTo")]
    pub assigned_to: Option<MemberName>,
    #[serde(default)]
    pub status: TaskStatus,
}

impl ExistingTask {
    pub fn new(
        id: impl Into<String>,
        task_type: impl Into<String>,
        priority: Priority,
        premium: f64,
        assigned_to: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            task_type: task_type.into(),
            priority,
            premium,
            assigned_to: Some(assigned_to.into()),
            status: TaskStatus::Open,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_open(&self) -> bool {
        self.status == TaskStatus::Open
    }

    /// True when this task is open and assigned to `member`.
    pub fn is_open_for(&self, member: &str) -> bool {
        self.is_open() && self.assigned_to.as_deref() == Some(member)
    }

    pub fn effective_premium(&self) -> f64 {
        clamp_premium(self.premium)
    }

    /// The assignment-relevant view of this task.
    pub fn descriptor(&self) -> TaskDescriptor {
        TaskDescriptor::new(self.task_type.clone(), self.priority, self.premium)
    }
}

fn clamp_premium(premium: f64) -> f64 {
    if premium.is_finite() && premium > 0.0 {
        premium
    } else {
        0.0
    }
}

/// Accepts a number, a numeric string ("$6,000.00"), or null.
/// Anything unparseable reads as zero.
fn lenient_premium<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let premium = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => {
            let cleaned: String = s.chars().filter(|c| !matches!(c, '$' | ',' | ' ')).collect();
            cleaned.parse().unwrap_or(0.0)
        }
        _ => 0.0,
    };
    Ok(premium)
}
