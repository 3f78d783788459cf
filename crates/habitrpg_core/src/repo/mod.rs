//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts for characters, tasks and
//!   estates.
//! - Isolate SQLite query details from services and the pure engine.
//! - Provide the unit-of-work wrapper services open around each operation.
//!
//! # Invariants
//! - Repository writes enforce model `validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

use rusqlite::Row;
use uuid::Uuid;

pub mod character_repo;
pub mod error;
pub mod estate_repo;
pub mod task_repo;
pub mod unit_of_work;

use error::{RepoError, RepoResult};

pub(crate) fn parse_uuid_column(row: &Row<'_>, column: &str, label: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {label}")))
}

/// SQLite integers are signed; experience is stored as i64.
pub(crate) fn exp_to_db(value: u64) -> RepoResult<i64> {
    i64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("experience {value} exceeds storage range")))
}

pub(crate) fn exp_from_db(value: i64) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative experience `{value}` in storage")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
