//! Experience thresholds and level-up application.
//!
//! # Invariants
//! - `exp_required_for_level` is positive and non-decreasing for `level >= 1`.
//! - After `gain_exp`, `current_exp < exp_required_for_level(current_level)`.
//! - Each level gained adds `level_up_max_hp` to `max_hp` and fully heals.

use crate::config::{LevelCurve, ProgressionConfig};
use crate::engine::error::{EngineError, EngineResult};
use crate::model::character::Character;

const EXP_BASE: u64 = 100;
const POWER_LAW_EXPONENT: f64 = 1.5;

/// Experience needed to advance from `level` to `level + 1`.
///
/// Level 0 is treated as level 1.
pub fn exp_required_for_level(level: u32, curve: LevelCurve) -> u64 {
    let level = u64::from(level.max(1));
    match curve {
        LevelCurve::Linear => EXP_BASE * level,
        LevelCurve::PowerLaw1_5 => {
            (EXP_BASE as f64 * (level as f64).powf(POWER_LAW_EXPONENT)).floor() as u64
        }
    }
}

/// Adds experience and applies every level-up it unlocks.
///
/// Returns the updated character; the input is left untouched.
///
/// # Errors
/// - `InvalidAmount` when `amount < 0`, regardless of character state.
/// - `CorruptState` when the character breaks a model invariant.
pub fn gain_exp(
    character: &Character,
    amount: i64,
    config: &ProgressionConfig,
) -> EngineResult<Character> {
    gain_exp_with_levels(character, amount, config).map(|(next, _)| next)
}

/// Same as [`gain_exp`], also returning the number of levels gained.
pub fn gain_exp_with_levels(
    character: &Character,
    amount: i64,
    config: &ProgressionConfig,
) -> EngineResult<(Character, u32)> {
    let amount = u64::try_from(amount).map_err(|_| EngineError::InvalidAmount(amount))?;
    character.validate()?;

    let mut next = character.clone();
    next.current_exp = next.current_exp.saturating_add(amount);
    let levels = apply_level_ups(&mut next, config);
    Ok((next, levels))
}

/// Consumes banked experience; returns levels gained.
///
/// The level saturates at `u32::MAX`; exp left at the cap stays banked.
fn apply_level_ups(character: &mut Character, config: &ProgressionConfig) -> u32 {
    let (levels, remaining) = match config.level_curve {
        LevelCurve::Linear => linear_level_ups(character.current_level, character.current_exp),
        curve => stepwise_level_ups(character.current_level, character.current_exp, curve),
    };
    if levels == 0 {
        return 0;
    }

    character.current_exp = remaining;
    character.current_level += levels;
    character.max_hp = character
        .max_hp
        .saturating_add(levels.saturating_mul(config.level_up_max_hp));
    character.current_hp = character.max_hp;
    character.unallocated_stat_points = character
        .unallocated_stat_points
        .saturating_add(levels.saturating_mul(config.stat_points_per_level));
    levels
}

/// Exp needed to climb `levels` linear levels starting at `level`.
fn linear_cost(level: u32, levels: u32) -> u128 {
    let (level, levels) = (u128::from(level), u128::from(levels));
    u128::from(EXP_BASE) * (levels * level + levels * levels.saturating_sub(1) / 2)
}

/// Solves `50n² + (100L - 50)n <= exp` for the largest `n`.
///
/// The float root is only an estimate; exact integer costs settle it.
fn linear_level_ups(level: u32, exp: u64) -> (u32, u64) {
    let max_levels = u32::MAX - level;
    let base = EXP_BASE as f64;
    let b = base * f64::from(level) - base / 2.0;
    let root = (-b + (b * b + 2.0 * base * exp as f64).sqrt()) / base;
    let mut levels = (root.floor() as u32).min(max_levels);

    let budget = u128::from(exp);
    while levels > 0 && linear_cost(level, levels) > budget {
        levels -= 1;
    }
    while levels < max_levels && linear_cost(level, levels + 1) <= budget {
        levels += 1;
    }
    // cost <= exp, so the remainder fits in u64.
    (levels, (budget - linear_cost(level, levels)) as u64)
}

fn stepwise_level_ups(level: u32, exp: u64, curve: LevelCurve) -> (u32, u64) {
    let max_levels = u32::MAX - level;
    let mut levels = 0u32;
    let mut remaining = exp;
    while levels < max_levels {
        let threshold = exp_required_for_level(level + levels, curve);
        if remaining < threshold {
            break;
        }
        remaining -= threshold;
        levels += 1;
    }
    (levels, remaining)
}
