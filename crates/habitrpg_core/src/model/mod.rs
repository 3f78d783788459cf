//! Domain model for characters, tasks and estates.
//!
//! # Responsibility
//! - Define canonical data structures used by the progression engine.
//! - Expose `validate()` checks for every persisted record.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Timestamps are Unix epoch milliseconds.

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub mod character;
pub mod estate;
pub mod strength;
pub mod task;
pub mod validation;

/// Stable identifier of the owning user account.
///
/// Issued by the external account system; the core never creates users.
pub type UserId = Uuid;

/// Current wall clock time as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
