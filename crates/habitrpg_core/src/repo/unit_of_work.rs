//! Scoped atomic unit of work.
//!
//! # Responsibility
//! - Run one service operation inside a single SQLite transaction.
//!
//! # Invariants
//! - The transaction starts `IMMEDIATE`: the write lock is taken before the
//!   first read, so two units of work never interleave a read-modify-write.
//! - Commit happens only when the closure returns `Ok`; any `Err` (or panic)
//!   drops the transaction, which rolls it back.
//! - Repositories used inside the closure must not open their own
//!   transactions.

use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Runs `work` inside an immediate transaction on `conn`.
///
/// # Errors
/// - Returns the closure error unchanged after rolling back.
/// - Returns SQLite failures from `BEGIN`/`COMMIT` converted into `E`.
pub fn in_unit_of_work<T, E, F>(conn: &Connection, work: F) -> Result<T, E>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    E: From<rusqlite::Error>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let value = work(&tx)?;
    tx.commit()?;
    Ok(value)
}
