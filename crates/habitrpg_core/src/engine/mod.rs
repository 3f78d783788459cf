//! Progression and economy rules.
//!
//! # Responsibility
//! - Implement leveling, stat allocation, task rewards and estate production
//!   as pure functions from input records to new records.
//!
//! # Invariants
//! - No function here performs I/O or holds state between calls.
//! - Inputs are never mutated; a failed call has no effect.
//! - Inputs that break model invariants are rejected with `CorruptState`.

pub mod error;
pub mod experience;
pub mod production;
pub mod reward;
pub mod stats;
