//! Repository layer: one repository per collection, obtained from
//! [`Database`](crate::Database) accessors. Repositories return plain entity
//! values and know nothing about presentation.
//!
//! Update semantics are read-merge-write: fetch the record (NotFound if the
//! id is absent), overlay the patch, stamp `updated_at`, write all columns.
//! Repositories trust their callers for field validation; referential
//! integrity (tasks/goals pointing at live life areas) is a caller
//! convention, not enforced here.

mod day_summaries;
mod goals;
mod journal;
mod life_areas;
mod projects;
mod tasks;

pub use day_summaries::DaySummaries;
pub use goals::Goals;
pub use journal::JournalEntries;
pub use life_areas::LifeAreas;
pub use projects::Projects;
pub use tasks::Tasks;

use crate::database::DatabaseError;

/// Encode a list-valued column (tags, dependencies) as JSON text
pub(crate) fn encode_list(
    column: &'static str,
    values: &[String],
) -> Result<String, DatabaseError> {
    serde_json::to_string(values).map_err(|e| DatabaseError::Encode(column, e))
}

/// Decode a JSON-encoded list column back into a Vec
pub(crate) fn decode_list(idx: usize, raw: &str) -> Result<Vec<String>, rusqlite::Error> {
    serde_json::from_str(raw).map_err(|e| bad_column(idx, e.to_string()))
}

/// Build a rusqlite conversion error for a column holding an unexpected value
pub(crate) fn bad_column(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, msg.into())
}
