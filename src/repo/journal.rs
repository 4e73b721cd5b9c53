use rusqlite::OptionalExtension;

use super::bad_column;
use crate::database::{Database, DatabaseError};
use crate::models::{JournalEntry, JournalEntryPatch, Mood, NewJournalEntry};
use crate::utils::now_stamp;

/// Repository for journal entries, one per calendar day. Uniqueness per date
/// is maintained by routing all writes through [`upsert_by_date`]; direct
/// create/update exist for completeness.
///
/// [`upsert_by_date`]: JournalEntries::upsert_by_date
pub struct JournalEntries<'a> {
    db: &'a Database,
}

const COLUMNS: &str = "id, date, content, mood, created_at, updated_at";

impl<'a> JournalEntries<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn row_to_entry(row: &rusqlite::Row) -> Result<JournalEntry, rusqlite::Error> {
        let mood: Option<String> = row.get(3)?;
        let mood = match mood {
            Some(m) => Some(
                Mood::from_str(&m).ok_or_else(|| bad_column(3, format!("unknown mood: {m}")))?,
            ),
            None => None,
        };
        Ok(JournalEntry {
            id: row.get(0)?,
            date: row.get(1)?,
            content: row.get(2)?,
            mood,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    /// Get all journal entries, newest day first
    pub fn get_all(&self) -> Result<Vec<JournalEntry>, DatabaseError> {
        let mut stmt = self.db.conn().prepare(&format!(
            "SELECT {COLUMNS} FROM journal_entries ORDER BY date DESC"
        ))?;
        let entries = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<JournalEntry>, DatabaseError> {
        self.db
            .conn()
            .query_row(
                &format!("SELECT {COLUMNS} FROM journal_entries WHERE id = ?1"),
                [id],
                Self::row_to_entry,
            )
            .optional()
            .map_err(DatabaseError::from)
    }

    /// Get the entry for a calendar day, if any
    pub fn get_by_date(&self, date: &str) -> Result<Option<JournalEntry>, DatabaseError> {
        self.db
            .conn()
            .query_row(
                &format!("SELECT {COLUMNS} FROM journal_entries WHERE date = ?1"),
                [date],
                Self::row_to_entry,
            )
            .optional()
            .map_err(DatabaseError::from)
    }

    pub fn create(&self, input: NewJournalEntry) -> Result<JournalEntry, DatabaseError> {
        let entry = JournalEntry::new(input);
        self.db.conn().execute(
            "INSERT INTO journal_entries (id, date, content, mood, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                entry.id,
                entry.date,
                entry.content,
                entry.mood.map(|m| m.as_str()),
                entry.created_at,
                entry.updated_at
            ],
        )?;
        Ok(entry)
    }

    /// Merge a partial update onto an existing entry.
    /// Fails with NotFound if the id is absent.
    pub fn update(&self, id: &str, patch: JournalEntryPatch) -> Result<JournalEntry, DatabaseError> {
        let mut entry = self.get_by_id(id)?.ok_or_else(|| DatabaseError::NotFound {
            entity: "JournalEntry",
            id: id.to_string(),
        })?;

        if let Some(content) = patch.content {
            entry.content = content;
        }
        if let Some(mood) = patch.mood {
            entry.mood = mood;
        }
        entry.updated_at = now_stamp();

        self.db.conn().execute(
            "UPDATE journal_entries SET content = ?1, mood = ?2, updated_at = ?3 WHERE id = ?4",
            rusqlite::params![
                entry.content,
                entry.mood.map(|m| m.as_str()),
                entry.updated_at,
                entry.id
            ],
        )?;
        Ok(entry)
    }

    /// Delete an entry by id. Idempotent.
    pub fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        self.db
            .conn()
            .execute("DELETE FROM journal_entries WHERE id = ?1", [id])?;
        Ok(())
    }

    /// Create-if-absent / update-if-present, keyed by calendar day. The one
    /// entry point editors use; it is what keeps entries unique per date.
    /// On the update path a `None` mood leaves the stored mood unchanged
    /// (callers pass a mood only when the user picked one).
    pub fn upsert_by_date(
        &self,
        date: &str,
        content: &str,
        mood: Option<Mood>,
    ) -> Result<JournalEntry, DatabaseError> {
        match self.get_by_date(date)? {
            Some(existing) => self.update(
                &existing.id,
                JournalEntryPatch {
                    content: Some(content.to_string()),
                    mood: mood.map(Some),
                },
            ),
            None => self.create(NewJournalEntry {
                date: date.to_string(),
                content: content.to_string(),
                mood,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_creates_then_updates_a_single_record() {
        let db = Database::open_in_memory().unwrap();
        let journal = db.journal_entries();

        let first = journal
            .upsert_by_date("2024-06-01", "Great day", Some(Mood::Great))
            .unwrap();
        let fetched = journal.get_by_date("2024-06-01").unwrap().unwrap();
        assert_eq!(fetched.content, "Great day");
        assert_eq!(fetched.mood, Some(Mood::Great));

        let second = journal
            .upsert_by_date("2024-06-01", "Edited", None)
            .unwrap();
        // Same record, second call's content wins, prior mood retained
        assert_eq!(second.id, first.id);
        assert_eq!(second.content, "Edited");
        assert_eq!(second.mood, Some(Mood::Great));
        assert_eq!(journal.get_all().unwrap().len(), 1);
    }

    #[test]
    fn upsert_with_mood_overwrites_prior_mood() {
        let db = Database::open_in_memory().unwrap();
        let journal = db.journal_entries();

        journal
            .upsert_by_date("2024-06-01", "Great day", Some(Mood::Great))
            .unwrap();
        let entry = journal
            .upsert_by_date("2024-06-01", "Actually rough", Some(Mood::Bad))
            .unwrap();
        assert_eq!(entry.mood, Some(Mood::Bad));
    }

    #[test]
    fn get_by_date_returns_none_when_absent() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.journal_entries().get_by_date("2024-06-01").unwrap(), None);
    }

    #[test]
    fn get_all_lists_newest_day_first() {
        let db = Database::open_in_memory().unwrap();
        let journal = db.journal_entries();
        journal.upsert_by_date("2024-06-01", "first", None).unwrap();
        journal.upsert_by_date("2024-06-03", "third", None).unwrap();
        journal.upsert_by_date("2024-06-02", "second", None).unwrap();

        let dates: Vec<String> = journal
            .get_all()
            .unwrap()
            .into_iter()
            .map(|e| e.date)
            .collect();
        assert_eq!(dates, ["2024-06-03", "2024-06-02", "2024-06-01"]);
    }

    #[test]
    fn patch_can_clear_mood_explicitly() {
        let db = Database::open_in_memory().unwrap();
        let journal = db.journal_entries();
        let entry = journal
            .upsert_by_date("2024-06-01", "Great day", Some(Mood::Great))
            .unwrap();

        let cleared = journal
            .update(
                &entry.id,
                JournalEntryPatch {
                    mood: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(cleared.mood, None);
        assert_eq!(cleared.content, "Great day");
    }
}
