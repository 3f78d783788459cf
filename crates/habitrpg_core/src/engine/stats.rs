//! Manual stat allocation and resting.
//!
//! # Invariants
//! - Allocation spends exactly `sum(deltas)` unallocated points or nothing.
//! - `max_mana` grows by `intelligence × mana_per_intelligence` and `max_hp`
//!   by `vigor × hp_per_vigor`; current pools are not refilled.

use crate::config::ProgressionConfig;
use crate::engine::error::{EngineError, EngineResult};
use crate::model::character::Character;
use serde::{Deserialize, Serialize};

/// Requested stat point deltas.
///
/// Signed so that callers can pass raw input through; negative values are
/// rejected by `allocate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatAllocation {
    pub strength: i64,
    pub dexterity: i64,
    pub intelligence: i64,
    pub vigor: i64,
}

impl StatAllocation {
    fn entries(&self) -> [(&'static str, i64); 4] {
        [
            ("strength", self.strength),
            ("dexterity", self.dexterity),
            ("intelligence", self.intelligence),
            ("vigor", self.vigor),
        ]
    }
}

/// Spends unallocated points on base stats and grows derived maximums.
///
/// # Errors
/// - `NegativeAllocation` when any delta is negative.
/// - `EmptyAllocation` when every delta is zero.
/// - `InsufficientPoints` when the total exceeds `unallocated_stat_points`.
/// - `CorruptState` when the character breaks a model invariant.
pub fn allocate(
    character: &Character,
    allocation: &StatAllocation,
    config: &ProgressionConfig,
) -> EngineResult<Character> {
    let mut requested = 0u64;
    for (stat, value) in allocation.entries() {
        let points =
            u64::try_from(value).map_err(|_| EngineError::NegativeAllocation { stat, value })?;
        requested = requested.saturating_add(points);
    }
    if requested == 0 {
        return Err(EngineError::EmptyAllocation);
    }
    let available = character.unallocated_stat_points;
    if requested > u64::from(available) {
        return Err(EngineError::InsufficientPoints {
            requested,
            available,
        });
    }
    character.validate()?;

    // Every delta is now bounded by `available`, which fits in u32.
    let [strength, dexterity, intelligence, vigor] =
        allocation.entries().map(|(_, value)| clamp_points(value));

    let mut next = character.clone();
    next.strength = next.strength.saturating_add(strength);
    next.dexterity = next.dexterity.saturating_add(dexterity);
    next.intelligence = next.intelligence.saturating_add(intelligence);
    next.vigor = next.vigor.saturating_add(vigor);
    next.max_mana = next
        .max_mana
        .saturating_add(intelligence.saturating_mul(config.mana_per_intelligence));
    next.max_hp = next
        .max_hp
        .saturating_add(vigor.saturating_mul(config.hp_per_vigor));
    next.unallocated_stat_points = available - u32::try_from(requested).unwrap_or(available);
    Ok(next)
}

/// Refills hp and mana to their maximums.
pub fn restore(character: &Character) -> EngineResult<Character> {
    character.validate()?;
    let mut next = character.clone();
    next.current_hp = next.max_hp;
    next.current_mana = next.max_mana;
    Ok(next)
}

fn clamp_points(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{allocate, restore, StatAllocation};
    use crate::config::ProgressionConfig;
    use crate::engine::error::EngineError;
    use crate::model::character::Character;
    use uuid::Uuid;

    fn character_with_points(points: u32) -> Character {
        let mut character = Character::new(Uuid::new_v4());
        character.unallocated_stat_points = points;
        character
    }

    #[test]
    fn allocation_updates_base_and_derived_stats() {
        let start = character_with_points(6);
        let allocation = StatAllocation {
            strength: 2,
            dexterity: 1,
            intelligence: 1,
            vigor: 2,
        };

        let next = allocate(&start, &allocation, &ProgressionConfig::default()).unwrap();

        assert_eq!(next.strength, 2);
        assert_eq!(next.dexterity, 1);
        assert_eq!(next.intelligence, 1);
        assert_eq!(next.vigor, 2);
        assert_eq!(next.max_mana, start.max_mana + 5);
        assert_eq!(next.max_hp, start.max_hp + 10);
        assert_eq!(next.current_hp, start.current_hp);
        assert_eq!(next.unallocated_stat_points, 0);
    }

    #[test]
    fn derived_constants_follow_config() {
        let config = ProgressionConfig {
            hp_per_vigor: 10,
            ..ProgressionConfig::default()
        };
        let allocation = StatAllocation {
            vigor: 3,
            ..StatAllocation::default()
        };
        let next = allocate(&character_with_points(3), &allocation, &config).unwrap();
        assert_eq!(next.max_hp, 40);
    }

    #[test]
    fn overspending_is_rejected() {
        let start = character_with_points(2);
        let allocation = StatAllocation {
            strength: 2,
            vigor: 1,
            ..StatAllocation::default()
        };
        let err = allocate(&start, &allocation, &ProgressionConfig::default()).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientPoints {
                requested: 3,
                available: 2
            }
        );
    }

    #[test]
    fn negative_delta_is_rejected_before_point_check() {
        let allocation = StatAllocation {
            strength: 5,
            dexterity: -1,
            ..StatAllocation::default()
        };
        let err = allocate(
            &character_with_points(10),
            &allocation,
            &ProgressionConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::NegativeAllocation {
                stat: "dexterity",
                value: -1
            }
        );
    }

    #[test]
    fn empty_allocation_is_rejected() {
        let err = allocate(
            &character_with_points(10),
            &StatAllocation::default(),
            &ProgressionConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::EmptyAllocation);
    }

    #[test]
    fn huge_deltas_do_not_overflow() {
        let allocation = StatAllocation {
            strength: i64::MAX,
            dexterity: i64::MAX,
            intelligence: i64::MAX,
            vigor: i64::MAX,
        };
        let err = allocate(
            &character_with_points(10),
            &allocation,
            &ProgressionConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientPoints { .. }));
    }

    #[test]
    fn restore_refills_pools() {
        let mut tired = Character::new(Uuid::new_v4());
        tired.max_mana = 30;
        tired.current_mana = 4;
        tired.current_hp = 1;
        let rested = restore(&tired).unwrap();
        assert_eq!(rested.current_hp, rested.max_hp);
        assert_eq!(rested.current_mana, 30);
    }
}
