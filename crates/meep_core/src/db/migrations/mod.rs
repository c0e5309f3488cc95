//! Ordered schema migrations for the meep database.
//!
//! # Responsibility
//! - Register schema steps (tables, relation indexes, fuel lookup key).
//! - Bring a connection from its recorded version up to `latest_version()`.
//!
//! # Invariants
//! - Versions start at 1 and increase by exactly one per step.
//! - All pending steps commit together or not at all.
//! - The committed version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::{debug, info};
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
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "relation_indexes",
        sql: include_str!("0002_relation_indexes.sql"),
    },
    Migration {
        version: 3,
        name: "fuel_lookup_key",
        sql: include_str!("0003_fuel_lookup_key.sql"),
    },
];

/// Returns the schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Returns the schema version recorded on `conn`.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Upgrades `conn` to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the database is newer than this build.
/// - `Sqlite` when a step fails; earlier steps of the same run are rolled
///   back with it.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_version(conn)?;
    let pending = pending_migrations(from_version)?;
    let Some(last) = pending.last() else {
        return Ok(());
    };
    let to_version = last.version;

    let tx = conn.transaction()?;
    for migration in pending {
        tx.execute_batch(migration.sql)?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.execute_batch(&format!("PRAGMA user_version = {to_version};"))?;
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from_version} to_version={to_version}");
    Ok(())
}

fn pending_migrations(from_version: u32) -> DbResult<&'static [Migration]> {
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }
    let applied = MIGRATIONS
        .iter()
        .take_while(|migration| migration.version <= from_version)
        .count();
    Ok(&MIGRATIONS[applied..])
}
