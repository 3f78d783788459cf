//! Invariant violations shared by all domain models.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Domain invariant violation found by a model `validate()` call.
///
/// Seeing one of these at runtime means upstream data is corrupt; callers
/// should surface it instead of repairing the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    NilId,
    LevelBelowOne,
    HpAboveMax { current: u32, max: u32 },
    ManaAboveMax { current: u32, max: u32 },
    BlankTaskName,
    TaskNameTooLong { len: usize, max: usize },
    InvalidRepeatInterval,
    BuildingOutOfRange {
        building: &'static str,
        level: u32,
        min: u32,
        max: u32,
    },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "id must not be nil"),
            Self::LevelBelowOne => write!(f, "character level must be at least 1"),
            Self::HpAboveMax { current, max } => {
                write!(f, "current hp {current} exceeds max hp {max}")
            }
            Self::ManaAboveMax { current, max } => {
                write!(f, "current mana {current} exceeds max mana {max}")
            }
            Self::BlankTaskName => write!(f, "task name must not be blank"),
            Self::TaskNameTooLong { len, max } => {
                write!(f, "task name has {len} characters; max is {max}")
            }
            Self::InvalidRepeatInterval => write!(f, "repeat interval must be at least 1"),
            Self::BuildingOutOfRange {
                building,
                level,
                min,
                max,
            } => write!(
                f,
                "{building} level {level} is outside the allowed range [{min}, {max}]"
            ),
        }
    }
}

impl Error for ModelValidationError {}
