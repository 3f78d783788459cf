//! Progression tuning knobs.
//!
//! # Responsibility
//! - Select one level curve and one set of reward/derived-stat constants.
//! - Keep every engine formula parameter in a single value passed by callers.
//!
//! # Invariants
//! - `Default` is the canonical ruleset: linear curve, no stat points on
//!   level-up, 5 mana per intelligence and 5 hp per vigor.
//! - Missing fields in serialized input fall back to the canonical value.

use serde::{Deserialize, Serialize};

/// Milliseconds between two productions of the same estate.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Experience curve used to compute the per-level threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelCurve {
    /// `100 × level`.
    #[default]
    Linear,
    /// `floor(100 × level^1.5)`.
    #[serde(rename = "power_law_1_5")]
    PowerLaw1_5,
}

/// Full set of progression and economy constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub level_curve: LevelCurve,
    /// Added to `max_hp` on every level gained.
    pub level_up_max_hp: u32,
    /// Unallocated stat points granted on every level gained.
    pub stat_points_per_level: u32,
    pub mana_per_intelligence: u32,
    pub hp_per_vigor: u32,
    pub good_habit_exp: u32,
    pub bad_habit_hp_penalty: u32,
    pub daily_exp: u32,
    pub todo_exp: u32,
    pub production_interval_ms: i64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            level_curve: LevelCurve::Linear,
            level_up_max_hp: 10,
            stat_points_per_level: 0,
            mana_per_intelligence: 5,
            hp_per_vigor: 5,
            good_habit_exp: 10,
            bad_habit_hp_penalty: 5,
            daily_exp: 15,
            todo_exp: 20,
            production_interval_ms: DAY_MS,
        }
    }
}
