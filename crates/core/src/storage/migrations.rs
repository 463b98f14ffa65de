//! Schema migrations
//!
//! Each migration runs once and is recorded in `schema_migrations`.

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{info, instrument};

use crate::error::Result;

pub struct Migration {
    /// Sequential, starting from 1
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "Latest viewed section per hangout",
    sql: r#"
        CREATE TABLE IF NOT EXISTS latest_sections (
            hangout_id TEXT PRIMARY KEY,
            section TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#,
}];

fn ensure_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

pub(crate) fn current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> =
        conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })?;
    Ok(version.unwrap_or(0))
}

/// Apply every migration newer than the stored version
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    ensure_migrations_table(conn)?;

    let from = current_version(conn)?;
    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > from).collect();
    if pending.is_empty() {
        return Ok(());
    }

    for migration in pending {
        info!(
            version = migration.version,
            description = migration.description,
            "Applying migration"
        );

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
            params![migration.version, migration.description, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
    }

    info!(from, to = current_version(conn)?, "Database schema updated");
    Ok(())
}
