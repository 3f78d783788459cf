//! Estate domain model.
//!
//! # Responsibility
//! - Hold building levels, resource stocks and passive bonuses of one user.
//! - Describe the allowed level range of each building.
//!
//! # Invariants
//! - `house`, `sawmill`, `quarry`, `iron_mine` stay within `[1, 10]`.
//! - `healing_pool`, `training_buddy` stay within `[0, 10]`.
//! - Stocks only grow through production.

use crate::model::validation::ModelValidationError;
use crate::model::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an estate record.
pub type EstateId = Uuid;

/// Estate building kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Building {
    House,
    Sawmill,
    Quarry,
    IronMine,
    HealingPool,
    TrainingBuddy,
}

impl Building {
    pub fn all() -> &'static [Building] {
        &[
            Self::House,
            Self::Sawmill,
            Self::Quarry,
            Self::IronMine,
            Self::HealingPool,
            Self::TrainingBuddy,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Sawmill => "sawmill",
            Self::Quarry => "quarry",
            Self::IronMine => "iron_mine",
            Self::HealingPool => "healing_pool",
            Self::TrainingBuddy => "training_buddy",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "house" => Some(Self::House),
            "sawmill" => Some(Self::Sawmill),
            "quarry" => Some(Self::Quarry),
            "iron_mine" => Some(Self::IronMine),
            "healing_pool" => Some(Self::HealingPool),
            "training_buddy" => Some(Self::TrainingBuddy),
            _ => None,
        }
    }

    /// Lowest allowed level.
    ///
    /// Production buildings always exist; bonus buildings may be unbuilt.
    pub fn min_level(self) -> u32 {
        match self {
            Self::House | Self::Sawmill | Self::Quarry | Self::IronMine => 1,
            Self::HealingPool | Self::TrainingBuddy => 0,
        }
    }

    pub fn max_level(self) -> u32 {
        10
    }

    pub fn accepts_level(self, level: u32) -> bool {
        (self.min_level()..=self.max_level()).contains(&level)
    }
}

/// Per-user estate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estate {
    pub id: EstateId,
    pub user_id: UserId,
    pub house: u32,
    pub sawmill: u32,
    pub quarry: u32,
    pub iron_mine: u32,
    pub healing_pool: u32,
    pub training_buddy: u32,
    pub wood: u32,
    pub iron: u32,
    pub stone: u32,
    pub bonus_hp: i32,
    pub bonus_exp: i32,
    /// Percentage applied to sawmill output.
    pub bonus_wood: i32,
    /// Percentage applied to iron mine output.
    pub bonus_iron: i32,
    /// Percentage applied to quarry output.
    pub bonus_stone: i32,
    /// Unix epoch milliseconds of the last successful production.
    pub last_production_at: Option<i64>,
}

impl Estate {
    /// Creates an estate with every building at its minimum level.
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            house: Building::House.min_level(),
            sawmill: Building::Sawmill.min_level(),
            quarry: Building::Quarry.min_level(),
            iron_mine: Building::IronMine.min_level(),
            healing_pool: Building::HealingPool.min_level(),
            training_buddy: Building::TrainingBuddy.min_level(),
            wood: 0,
            iron: 0,
            stone: 0,
            bonus_hp: 0,
            bonus_exp: 0,
            bonus_wood: 0,
            bonus_iron: 0,
            bonus_stone: 0,
            last_production_at: None,
        }
    }

    pub fn building_level(&self, building: Building) -> u32 {
        match building {
            Building::House => self.house,
            Building::Sawmill => self.sawmill,
            Building::Quarry => self.quarry,
            Building::IronMine => self.iron_mine,
            Building::HealingPool => self.healing_pool,
            Building::TrainingBuddy => self.training_buddy,
        }
    }

    pub(crate) fn building_level_mut(&mut self, building: Building) -> &mut u32 {
        match building {
            Building::House => &mut self.house,
            Building::Sawmill => &mut self.sawmill,
            Building::Quarry => &mut self.quarry,
            Building::IronMine => &mut self.iron_mine,
            Building::HealingPool => &mut self.healing_pool,
            Building::TrainingBuddy => &mut self.training_buddy,
        }
    }

    /// Checks model invariants.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.is_nil() || self.user_id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        for building in Building::all() {
            let level = self.building_level(*building);
            if !building.accepts_level(level) {
                return Err(ModelValidationError::BuildingOutOfRange {
                    building: building.as_str(),
                    level,
                    min: building.min_level(),
                    max: building.max_level(),
                });
            }
        }
        Ok(())
    }
}
