//! SQLite storage for client-side preferences

mod migrations;
mod parse;
mod sections;

use std::path::Path;

use rusqlite::Connection;
use tracing::instrument;

use crate::error::Result;

pub use sections::{SavedSection, SectionStore};

/// Local database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at `path`
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Self {
            conn: Connection::open(path)?,
        };
        db.init()?;
        Ok(db)
    }

    /// In-memory database for tests and throwaway sessions
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> u32 {
        migrations::current_version(&self.conn).unwrap_or(0)
    }

    pub fn sections(&self) -> SectionStore<'_> {
        SectionStore::new(&self.conn)
    }
}
