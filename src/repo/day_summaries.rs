use rusqlite::OptionalExtension;

use crate::database::{Database, DatabaseError};
use crate::models::{DaySummary, DaySummaryPatch, NewDaySummary};
use crate::utils::now_stamp;

/// Repository for per-day rollups, keyed directly by the `date` string —
/// there is no separate id column.
pub struct DaySummaries<'a> {
    db: &'a Database,
}

const COLUMNS: &str = "date, reflection, energy_level, score, created_at, updated_at";

impl<'a> DaySummaries<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn row_to_summary(row: &rusqlite::Row) -> Result<DaySummary, rusqlite::Error> {
        Ok(DaySummary {
            date: row.get(0)?,
            reflection: row.get(1)?,
            energy_level: row.get(2)?,
            score: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    pub fn get_all(&self) -> Result<Vec<DaySummary>, DatabaseError> {
        let mut stmt = self
            .db
            .conn()
            .prepare(&format!("SELECT {COLUMNS} FROM day_summaries"))?;
        let summaries = stmt
            .query_map([], Self::row_to_summary)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    /// Get the summary for a calendar day, if any (primary-key lookup)
    pub fn get_by_date(&self, date: &str) -> Result<Option<DaySummary>, DatabaseError> {
        self.db
            .conn()
            .query_row(
                &format!("SELECT {COLUMNS} FROM day_summaries WHERE date = ?1"),
                [date],
                Self::row_to_summary,
            )
            .optional()
            .map_err(DatabaseError::from)
    }

    pub fn create(&self, input: NewDaySummary) -> Result<DaySummary, DatabaseError> {
        let summary = DaySummary::new(input);
        self.db.conn().execute(
            "INSERT INTO day_summaries (date, reflection, energy_level, score, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                summary.date,
                summary.reflection,
                summary.energy_level,
                summary.score,
                summary.created_at,
                summary.updated_at
            ],
        )?;
        Ok(summary)
    }

    /// Merge a partial update onto the summary for a day.
    /// Fails with NotFound if no summary exists for the date.
    pub fn update(&self, date: &str, patch: DaySummaryPatch) -> Result<DaySummary, DatabaseError> {
        let mut summary = self
            .get_by_date(date)?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "DaySummary",
                id: date.to_string(),
            })?;

        if let Some(reflection) = patch.reflection {
            summary.reflection = reflection;
        }
        if let Some(energy_level) = patch.energy_level {
            summary.energy_level = energy_level;
        }
        if let Some(score) = patch.score {
            summary.score = score;
        }
        summary.updated_at = now_stamp();

        self.db.conn().execute(
            "UPDATE day_summaries SET reflection = ?1, energy_level = ?2, score = ?3,
             updated_at = ?4 WHERE date = ?5",
            rusqlite::params![
                summary.reflection,
                summary.energy_level,
                summary.score,
                summary.updated_at,
                summary.date
            ],
        )?;
        Ok(summary)
    }

    /// Delete the summary for a day. Idempotent.
    pub fn delete(&self, date: &str) -> Result<(), DatabaseError> {
        self.db
            .conn()
            .execute("DELETE FROM day_summaries WHERE date = ?1", [date])?;
        Ok(())
    }

    /// Create-if-absent / update-if-present, keyed by calendar day.
    /// The invariant-preserving write path for day summaries.
    pub fn upsert_by_date(
        &self,
        date: &str,
        patch: DaySummaryPatch,
    ) -> Result<DaySummary, DatabaseError> {
        if self.get_by_date(date)?.is_some() {
            self.update(date, patch)
        } else {
            self.create(NewDaySummary {
                date: date.to_string(),
                reflection: patch.reflection.flatten(),
                energy_level: patch.energy_level.flatten(),
                score: patch.score.flatten(),
            })
        }
    }
}
