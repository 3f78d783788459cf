//! Strength ladder shared by all task kinds.
//!
//! # Responsibility
//! - Define the ordered resilience levels a task moves through.
//! - Provide the only step functions reward handlers may use.
//!
//! # Invariants
//! - Order is total: `Fragile < Weak < Stable < Strong < Unbreakable`.
//! - Steps saturate at both ends and never fail.

use serde::{Deserialize, Serialize};

/// Ordered resilience level of a task.
///
/// New tasks start at `Stable`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLadder {
    Fragile,
    Weak,
    #[default]
    Stable,
    Strong,
    Unbreakable,
}

const LADDER: [StrengthLadder; 5] = [
    StrengthLadder::Fragile,
    StrengthLadder::Weak,
    StrengthLadder::Stable,
    StrengthLadder::Strong,
    StrengthLadder::Unbreakable,
];

impl StrengthLadder {
    /// Returns all levels from weakest to strongest.
    pub fn all() -> &'static [StrengthLadder] {
        &LADDER
    }

    /// Zero-based position on the ladder.
    pub fn index(self) -> usize {
        match self {
            Self::Fragile => 0,
            Self::Weak => 1,
            Self::Stable => 2,
            Self::Strong => 3,
            Self::Unbreakable => 4,
        }
    }

    /// Moves one level up; `Unbreakable` stays `Unbreakable`.
    pub fn increase(self) -> Self {
        LADDER
            .get(self.index() + 1)
            .copied()
            .unwrap_or(Self::Unbreakable)
    }

    /// Moves one level down; `Fragile` stays `Fragile`.
    pub fn decrease(self) -> Self {
        match self.index().checked_sub(1) {
            Some(lower) => LADDER[lower],
            None => Self::Fragile,
        }
    }

    /// Stable string id used in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fragile => "fragile",
            Self::Weak => "weak",
            Self::Stable => "stable",
            Self::Strong => "strong",
            Self::Unbreakable => "unbreakable",
        }
    }

    /// Parses a stored string id.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fragile" => Some(Self::Fragile),
            "weak" => Some(Self::Weak),
            "stable" => Some(Self::Stable),
            "strong" => Some(Self::Strong),
            "unbreakable" => Some(Self::Unbreakable),
            _ => None,
        }
    }
}
