//! Schema migrations for the progression store.
//!
//! # Responsibility
//! - List the schema steps for characters, estates and tasks.
//! - Bring a connection from its stored schema version to the latest one.
//!
//! # Invariants
//! - Versions start at 1 and increase by one per step.
//! - All pending steps run in one transaction; a failing step leaves
//!   `PRAGMA user_version` where it was.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "0001_init",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "0002_task_indexes",
        sql: include_str!("0002_task_indexes.sql"),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations; returns how many ran.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<u32> {
    migrate(conn, MIGRATIONS, latest_version())
}

fn migrate(conn: &mut Connection, steps: &[Migration], target: u32) -> DbResult<u32> {
    let from = current_user_version(conn)?;
    let latest = steps.last().map_or(0, |step| step.version);
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = steps
        .iter()
        .filter(|step| step.version > from && step.version <= target)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migration {
                version: step.version,
                name: step.name,
                source,
            })?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=done from={} to={} applied={}",
        from,
        target.min(latest),
        pending.len()
    );
    Ok(pending.len() as u32)
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
