//! Character domain model.
//!
//! # Responsibility
//! - Hold the RPG stats owned by one user account.
//! - Check the invariants every engine operation relies on.
//!
//! # Invariants
//! - `current_hp <= max_hp` and `current_mana <= max_mana`.
//! - `current_level >= 1`.
//! - Base stats and unallocated points are non-negative (unsigned).

use crate::model::validation::ModelValidationError;
use crate::model::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a character record.
pub type CharacterId = Uuid;

const STARTING_HP: u32 = 10;
const STARTING_MANA: u32 = 10;

/// RPG character linked 1:1 to a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub user_id: UserId,
    pub current_hp: u32,
    pub max_hp: u32,
    pub current_mana: u32,
    pub max_mana: u32,
    pub current_exp: u64,
    pub current_level: u32,
    pub strength: u32,
    pub dexterity: u32,
    pub intelligence: u32,
    pub vigor: u32,
    pub unallocated_stat_points: u32,
}

impl Character {
    /// Creates a level-1 character with registration defaults.
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            current_hp: STARTING_HP,
            max_hp: STARTING_HP,
            current_mana: STARTING_MANA,
            max_mana: STARTING_MANA,
            current_exp: 0,
            current_level: 1,
            strength: 0,
            dexterity: 0,
            intelligence: 0,
            vigor: 0,
            unallocated_stat_points: 0,
        }
    }

    /// Checks model invariants.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.is_nil() || self.user_id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        if self.current_level == 0 {
            return Err(ModelValidationError::LevelBelowOne);
        }
        if self.current_hp > self.max_hp {
            return Err(ModelValidationError::HpAboveMax {
                current: self.current_hp,
                max: self.max_hp,
            });
        }
        if self.current_mana > self.max_mana {
            return Err(ModelValidationError::ManaAboveMax {
                current: self.current_mana,
                max: self.max_mana,
            });
        }
        Ok(())
    }

    /// Returns whether hp has dropped to zero.
    pub fn is_exhausted(&self) -> bool {
        self.current_hp == 0
    }
}
