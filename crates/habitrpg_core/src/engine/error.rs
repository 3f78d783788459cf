//! Engine error kinds.

use crate::model::estate::Building;
use crate::model::task::{TaskId, TaskKind};
use crate::model::validation::ModelValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type EngineResult<T> = Result<T, EngineError>;

/// Failure of one engine operation.
///
/// Every variant except `CorruptState` is an expected, user-facing outcome.
/// `CorruptState` means the caller handed in a record that already breaks a
/// model invariant; the engine refuses to compute over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Experience grants must be non-negative.
    InvalidAmount(i64),
    /// A stat delta was negative.
    NegativeAllocation { stat: &'static str, value: i64 },
    /// Every stat delta was zero.
    EmptyAllocation,
    /// The allocation spends more points than the character holds.
    InsufficientPoints { requested: u64, available: u32 },
    /// The daily or todo is already done for this cycle.
    AlreadyCompleted(TaskId),
    /// The completion rule does not match the task variant.
    WrongTaskKind {
        task_id: TaskId,
        expected: TaskKind,
        actual: TaskKind,
    },
    /// The estate already produced within the current interval.
    ProductionAlreadyDone { next_available_at: i64 },
    /// Requested building level is outside the building's range.
    BuildingLevelOutOfRange { building: Building, level: u32 },
    /// Input record violates a model invariant.
    CorruptState(ModelValidationError),
}

impl EngineError {
    /// Stable machine-readable code used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "invalid_amount",
            Self::NegativeAllocation { .. } => "negative_allocation",
            Self::EmptyAllocation => "empty_allocation",
            Self::InsufficientPoints { .. } => "insufficient_points",
            Self::AlreadyCompleted(_) => "already_completed",
            Self::WrongTaskKind { .. } => "wrong_task_kind",
            Self::ProductionAlreadyDone { .. } => "production_already_done",
            Self::BuildingLevelOutOfRange { .. } => "building_level_out_of_range",
            Self::CorruptState(_) => "corrupt_state",
        }
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAmount(amount) => {
                write!(f, "exp amount must be non-negative, got {amount}")
            }
            Self::NegativeAllocation { stat, value } => {
                write!(f, "cannot allocate negative points to {stat}: {value}")
            }
            Self::EmptyAllocation => write!(f, "at least one point must be allocated"),
            Self::InsufficientPoints {
                requested,
                available,
            } => write!(
                f,
                "not enough unallocated stat points: requested {requested}, available {available}"
            ),
            Self::AlreadyCompleted(id) => write!(f, "task already completed: {id}"),
            Self::WrongTaskKind {
                task_id,
                expected,
                actual,
            } => write!(
                f,
                "task {task_id} is a {}, expected a {}",
                actual.as_str(),
                expected.as_str()
            ),
            Self::ProductionAlreadyDone { next_available_at } => write!(
                f,
                "resources can only be produced once per day; next production at {next_available_at}"
            ),
            Self::BuildingLevelOutOfRange { building, level } => write!(
                f,
                "{} level {level} is outside [{}, {}]",
                building.as_str(),
                building.min_level(),
                building.max_level()
            ),
            Self::CorruptState(err) => write!(f, "corrupt input state: {err}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CorruptState(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for EngineError {
    fn from(value: ModelValidationError) -> Self {
        Self::CorruptState(value)
    }
}
