//! Task domain model for habits, dailies and todos.
//!
//! # Responsibility
//! - Define one task record with a common header and per-kind details.
//! - Provide constructors with creation defaults for each kind.
//!
//! # Invariants
//! - `name` is non-blank and at most `TASK_NAME_MAX_CHARS` characters.
//! - Daily repeat interval is at least 1.
//! - Only reward handlers change `strength`, daily `status` and todo
//!   `is_completed`.

use crate::model::strength::StrengthLadder;
use crate::model::validation::ModelValidationError;
use crate::model::{now_epoch_ms, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a task record.
pub type TaskId = Uuid;

/// Maximum task name length, in characters.
pub const TASK_NAME_MAX_CHARS: usize = 100;

/// Discriminant of the task variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Habit,
    Daily,
    Todo,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Habit => "habit",
            Self::Daily => "daily",
            Self::Todo => "todo",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "habit" => Some(Self::Habit),
            "daily" => Some(Self::Daily),
            "todo" => Some(Self::Todo),
            _ => None,
        }
    }
}

/// Whether performing a habit is rewarded or penalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitKind {
    Good,
    Bad,
}

impl HabitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "good" => Some(Self::Good),
            "bad" => Some(Self::Bad),
            _ => None,
        }
    }
}

/// Lifecycle state for habits and dailies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Active,
    Inactive,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Calendar cadence of a daily.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeats {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Repeats {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// Weekday anchor of a daily.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatOn {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    #[default]
    Everyday,
}

impl RepeatOn {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
            Self::Everyday => "everyday",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "monday" => Some(Self::Monday),
            "tuesday" => Some(Self::Tuesday),
            "wednesday" => Some(Self::Wednesday),
            "thursday" => Some(Self::Thursday),
            "friday" => Some(Self::Friday),
            "saturday" => Some(Self::Saturday),
            "sunday" => Some(Self::Sunday),
            "everyday" => Some(Self::Everyday),
            _ => None,
        }
    }
}

/// Unit of a daily repeat interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatUnit {
    #[default]
    Days,
    Weeks,
    Months,
}

impl RepeatUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "days" => Some(Self::Days),
            "weeks" => Some(Self::Weeks),
            "months" => Some(Self::Months),
            _ => None,
        }
    }
}

/// Cadence metadata of a daily.
///
/// Stored and returned as-is; the reward engine never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatPattern {
    pub repeats: Repeats,
    pub repeat_on: RepeatOn,
    pub interval: u32,
    pub unit: RepeatUnit,
}

impl Default for RepeatPattern {
    fn default() -> Self {
        Self {
            repeats: Repeats::Daily,
            repeat_on: RepeatOn::Everyday,
            interval: 1,
            unit: RepeatUnit::Days,
        }
    }
}

/// Per-kind task fields.
///
/// Serialized inline with the task header, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskDetails {
    Habit {
        kind: HabitKind,
        status: TaskStatus,
    },
    Daily {
        status: TaskStatus,
        repeat: RepeatPattern,
    },
    Todo {
        /// Unix epoch milliseconds.
        due_date: i64,
        is_completed: bool,
    },
}

impl TaskDetails {
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Habit { .. } => TaskKind::Habit,
            Self::Daily { .. } => TaskKind::Daily,
            Self::Todo { .. } => TaskKind::Todo,
        }
    }
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub name: String,
    pub notes: String,
    pub strength: StrengthLadder,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    #[serde(flatten)]
    pub details: TaskDetails,
}

impl Task {
    /// Creates an active habit at `Stable` strength.
    pub fn habit(user_id: UserId, name: impl Into<String>, kind: HabitKind) -> Self {
        Self::with_details(
            user_id,
            name,
            TaskDetails::Habit {
                kind,
                status: TaskStatus::Active,
            },
        )
    }

    /// Creates an active daily at `Stable` strength.
    pub fn daily(user_id: UserId, name: impl Into<String>, repeat: RepeatPattern) -> Self {
        Self::with_details(
            user_id,
            name,
            TaskDetails::Daily {
                status: TaskStatus::Active,
                repeat,
            },
        )
    }

    /// Creates an open todo at `Stable` strength.
    pub fn todo(user_id: UserId, name: impl Into<String>, due_date: i64) -> Self {
        Self::with_details(
            user_id,
            name,
            TaskDetails::Todo {
                due_date,
                is_completed: false,
            },
        )
    }

    fn with_details(user_id: UserId, name: impl Into<String>, details: TaskDetails) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            notes: String::new(),
            strength: StrengthLadder::default(),
            created_at: now_epoch_ms(),
            details,
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.details.kind()
    }

    /// Checks model invariants.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.is_nil() || self.user_id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::BlankTaskName);
        }
        let len = self.name.chars().count();
        if len > TASK_NAME_MAX_CHARS {
            return Err(ModelValidationError::TaskNameTooLong {
                len,
                max: TASK_NAME_MAX_CHARS,
            });
        }
        if let TaskDetails::Daily { repeat, .. } = &self.details {
            if repeat.interval == 0 {
                return Err(ModelValidationError::InvalidRepeatInterval);
            }
        }
        Ok(())
    }
}
