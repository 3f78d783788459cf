//! Estate resource production and bonus recomputation.
//!
//! # Invariants
//! - An estate produces at most once per `production_interval_ms`.
//! - Yield is `floor(level × (100 + bonus) / 100)` in exact integer math,
//!   never negative.
//! - Bonus recomputation depends only on building levels.

use crate::config::ProgressionConfig;
use crate::engine::error::{EngineError, EngineResult};
use crate::model::estate::{Building, Estate};
use serde::{Deserialize, Serialize};

const HOUSE_HP_BONUS: u32 = 5;
const HEALING_POOL_HP_BONUS: u32 = 10;
const TRAINING_BUDDY_EXP_BONUS: u32 = 2;

/// Resources produced by one production run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceYield {
    pub wood: u32,
    pub iron: u32,
    pub stone: u32,
}

/// Returns whether the estate may produce at `now`.
///
/// A `now` earlier than the last production never qualifies.
pub fn can_produce(estate: &Estate, now: i64, config: &ProgressionConfig) -> bool {
    match estate.last_production_at {
        None => true,
        Some(last) => now.saturating_sub(last) >= config.production_interval_ms,
    }
}

/// Earliest time the next production is allowed, if one is pending.
pub fn next_production_at(estate: &Estate, config: &ProgressionConfig) -> Option<i64> {
    estate
        .last_production_at
        .map(|last| last.saturating_add(config.production_interval_ms))
}

/// Yield the estate would produce right now.
pub fn production_yield(estate: &Estate) -> ResourceYield {
    ResourceYield {
        wood: scaled_output(estate.sawmill, estate.bonus_wood),
        iron: scaled_output(estate.iron_mine, estate.bonus_iron),
        stone: scaled_output(estate.quarry, estate.bonus_stone),
    }
}

/// Adds one day of production to the stocks and stamps `now`.
///
/// # Errors
/// - `ProductionAlreadyDone` inside the production interval.
/// - `CorruptState` when building levels are out of range.
pub fn produce(estate: &Estate, now: i64, config: &ProgressionConfig) -> EngineResult<Estate> {
    if !can_produce(estate, now, config) {
        return Err(EngineError::ProductionAlreadyDone {
            next_available_at: next_production_at(estate, config).unwrap_or(now),
        });
    }
    estate.validate()?;

    let output = production_yield(estate);
    let mut next = estate.clone();
    next.wood = next.wood.saturating_add(output.wood);
    next.iron = next.iron.saturating_add(output.iron);
    next.stone = next.stone.saturating_add(output.stone);
    next.last_production_at = Some(now);
    Ok(next)
}

/// Recomputes hp and exp bonuses from building levels.
///
/// Replaces the previous values; calling it twice gives the same estate.
pub fn recompute_bonuses(estate: &Estate) -> EngineResult<Estate> {
    estate.validate()?;
    let mut next = estate.clone();
    next.bonus_hp = to_bonus(
        estate.house * HOUSE_HP_BONUS + estate.healing_pool * HEALING_POOL_HP_BONUS,
    );
    next.bonus_exp = to_bonus(estate.training_buddy * TRAINING_BUDDY_EXP_BONUS);
    Ok(next)
}

/// Changes one building level and recomputes bonuses.
///
/// # Errors
/// - `BuildingLevelOutOfRange` when `level` is outside the building's range.
pub fn set_building_level(
    estate: &Estate,
    building: Building,
    level: u32,
) -> EngineResult<Estate> {
    if !building.accepts_level(level) {
        return Err(EngineError::BuildingLevelOutOfRange { building, level });
    }
    estate.validate()?;
    let mut next = estate.clone();
    *next.building_level_mut(building) = level;
    recompute_bonuses(&next)
}

fn scaled_output(level: u32, bonus_percent: i32) -> u32 {
    let scaled = i64::from(level) * (100 + i64::from(bonus_percent));
    u32::try_from(scaled.div_euclid(100).max(0)).unwrap_or(u32::MAX)
}

fn to_bonus(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
