//! Latest viewed section per hangout
//!
//! Lets the client reopen a hangout on the section the member last had
//! on screen.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::{HangoutId, HangoutSection};
use crate::storage::parse::{parse_datetime, parse_section, OptionalExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSection {
    pub hangout_id: HangoutId,
    pub section: HangoutSection,
    pub updated_at: DateTime<Utc>,
}

pub struct SectionStore<'a> {
    conn: &'a Connection,
}

impl<'a> SectionStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Remember the section for a hangout (upsert)
    pub fn save(&self, hangout_id: &HangoutId, section: HangoutSection) -> Result<()> {
        self.conn.execute(
            "INSERT INTO latest_sections (hangout_id, section, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(hangout_id) DO UPDATE SET section = ?2, updated_at = ?3",
            params![hangout_id.as_str(), section.as_str(), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn get(&self, hangout_id: &HangoutId) -> Result<Option<SavedSection>> {
        let saved = self
            .conn
            .query_row(
                "SELECT section, updated_at FROM latest_sections WHERE hangout_id = ?1",
                params![hangout_id.as_str()],
                |row| {
                    let section: String = row.get(0)?;
                    let updated_at: String = row.get(1)?;
                    Ok(SavedSection {
                        hangout_id: hangout_id.clone(),
                        section: parse_section(0, &section)?,
                        updated_at: parse_datetime(1, &updated_at)?,
                    })
                },
            )
            .optional()?;
        Ok(saved)
    }

    /// Saved section, or the dashboard when nothing was saved
    pub fn load_or_default(&self, hangout_id: &HangoutId) -> Result<HangoutSection> {
        Ok(self
            .get(hangout_id)?
            .map(|saved| saved.section)
            .unwrap_or_default())
    }

    /// Forget a hangout, e.g. after it was deleted
    pub fn clear(&self, hangout_id: &HangoutId) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM latest_sections WHERE hangout_id = ?1",
            params![hangout_id.as_str()],
        )?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{HangoutId, HangoutSection};
    use crate::storage::Database;

    #[test]
    fn test_save_and_load() {
        let db = Database::open_in_memory().unwrap();
        let hangout = HangoutId::new("h1");

        assert_eq!(db.sections().get(&hangout).unwrap(), None);
        assert_eq!(
            db.sections().load_or_default(&hangout).unwrap(),
            HangoutSection::Dashboard
        );

        db.sections().save(&hangout, HangoutSection::Suggestions).unwrap();
        db.sections().save(&hangout, HangoutSection::Members).unwrap();

        let saved = db.sections().get(&hangout).unwrap().unwrap();
        assert_eq!(saved.section, HangoutSection::Members);
        assert_eq!(saved.hangout_id, hangout);
    }

    #[test]
    fn test_sections_are_per_hangout() {
        let db = Database::open_in_memory().unwrap();
        let first = HangoutId::new("h1");
        let second = HangoutId::new("h2");

        db.sections().save(&first, HangoutSection::Chat).unwrap();
        assert_eq!(
            db.sections().load_or_default(&second).unwrap(),
            HangoutSection::Dashboard
        );

        assert!(db.sections().clear(&first).unwrap());
        assert!(!db.sections().clear(&first).unwrap());
        assert_eq!(db.sections().get(&first).unwrap(), None);
    }

    #[test]
    fn test_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hangouts.db");
        let hangout = HangoutId::new("h1");

        {
            let db = Database::open(&path).unwrap();
            db.sections().save(&hangout, HangoutSection::Availability).unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(
            db.sections().load_or_default(&hangout).unwrap(),
            HangoutSection::Availability
        );
        assert_eq!(db.schema_version(), 1);
    }
}
