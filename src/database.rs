use rusqlite::Connection;
use std::path::PathBuf;
use thiserror::Error;

use crate::repo::{DaySummaries, Goals, JournalEntries, LifeAreas, Projects, Tasks};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    Directory(String),
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("Failed to encode {0} column: {1}")]
    Encode(&'static str, #[source] serde_json::Error),
}

/// Storage engine: one SQLite database holding the six planner collections.
/// The schema (tables and secondary indexes) is declared once at open time
/// and is static for the lifetime of the application.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::Directory(e.to_string()))?;
            }
        }

        // Open or create the database
        let conn = Connection::open(&db_path)?;

        let db = Database { conn };
        db.initialize_schema()?;
        tracing::debug!(path, "database opened");

        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize the database schema (tables and indexes)
    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS life_areas (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                color           TEXT NOT NULL,
                \"order\"       INTEGER NOT NULL,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS goals (
                id              TEXT PRIMARY KEY,
                life_area_id    TEXT NOT NULL,
                title           TEXT NOT NULL,
                description     TEXT,
                target_date     TEXT,
                status          TEXT NOT NULL DEFAULT 'active',
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS projects (
                id              TEXT PRIMARY KEY,
                goal_id         TEXT NOT NULL,
                title           TEXT NOT NULL,
                status          TEXT NOT NULL DEFAULT 'active',
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id                  TEXT PRIMARY KEY,
                life_area_id        TEXT NOT NULL,
                goal_id             TEXT,
                project_id          TEXT,
                title               TEXT NOT NULL,
                notes               TEXT,
                priority            TEXT NOT NULL DEFAULT 'medium',
                estimated_minutes   INTEGER,
                scheduled_date      TEXT,
                due_date            TEXT,
                completed_at        TEXT,
                dependencies        TEXT NOT NULL DEFAULT '[]',
                tags                TEXT NOT NULL DEFAULT '[]',
                is_goal_task        INTEGER NOT NULL DEFAULT 0,
                created_at          TEXT NOT NULL,
                updated_at          TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS journal_entries (
                id              TEXT PRIMARY KEY,
                date            TEXT NOT NULL,
                content         TEXT NOT NULL,
                mood            TEXT,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;

        // Keyed directly by calendar day, no separate id
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS day_summaries (
                date            TEXT PRIMARY KEY,
                reflection      TEXT,
                energy_level    INTEGER,
                score           INTEGER,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;

        // Secondary indexes on sort, foreign-key and date fields
        for stmt in [
            "CREATE INDEX IF NOT EXISTS idx_life_areas_order ON life_areas(\"order\")",
            "CREATE INDEX IF NOT EXISTS idx_life_areas_name ON life_areas(name)",
            "CREATE INDEX IF NOT EXISTS idx_goals_life_area_id ON goals(life_area_id)",
            "CREATE INDEX IF NOT EXISTS idx_goals_status ON goals(status)",
            "CREATE INDEX IF NOT EXISTS idx_goals_target_date ON goals(target_date)",
            "CREATE INDEX IF NOT EXISTS idx_projects_goal_id ON projects(goal_id)",
            "CREATE INDEX IF NOT EXISTS idx_projects_status ON projects(status)",
            "CREATE INDEX IF NOT EXISTS idx_tasks_life_area_id ON tasks(life_area_id)",
            "CREATE INDEX IF NOT EXISTS idx_tasks_goal_id ON tasks(goal_id)",
            "CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id)",
            "CREATE INDEX IF NOT EXISTS idx_tasks_scheduled_date ON tasks(scheduled_date)",
            "CREATE INDEX IF NOT EXISTS idx_tasks_completed_at ON tasks(completed_at)",
            "CREATE INDEX IF NOT EXISTS idx_tasks_priority ON tasks(priority)",
            "CREATE INDEX IF NOT EXISTS idx_journal_entries_date ON journal_entries(date)",
        ] {
            self.conn.execute(stmt, [])?;
        }

        Ok(())
    }

    /// Get a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // Repository accessors: one repository per collection, borrowing this
    // handle. No ambient global; the caller owns the Database and passes it
    // (or a repository) wherever storage access is needed.

    pub fn life_areas(&self) -> LifeAreas<'_> {
        LifeAreas::new(self)
    }

    pub fn goals(&self) -> Goals<'_> {
        Goals::new(self)
    }

    pub fn projects(&self) -> Projects<'_> {
        Projects::new(self)
    }

    pub fn tasks(&self) -> Tasks<'_> {
        Tasks::new(self)
    }

    pub fn journal_entries(&self) -> JournalEntries<'_> {
        JournalEntries::new(self)
    }

    pub fn day_summaries(&self) -> DaySummaries<'_> {
        DaySummaries::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_initialization_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        // Re-running the DDL against the same connection must be a no-op
        db.initialize_schema().unwrap();

        let tables: Vec<String> = {
            let mut stmt = db
                .conn()
                .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .unwrap();
            stmt.query_map([], |row| row.get(0))
                .unwrap()
                .collect::<Result<_, _>>()
                .unwrap()
        };
        for table in [
            "day_summaries",
            "goals",
            "journal_entries",
            "life_areas",
            "projects",
            "tasks",
        ] {
            assert!(tables.iter().any(|t| t == table), "missing table {table}");
        }
    }

    #[test]
    fn reopening_a_file_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.db");
        let path_str = path.to_str().unwrap();

        let area = {
            let db = Database::new(path_str).unwrap();
            db.life_areas()
                .create(crate::models::NewLifeArea {
                    name: "Health".to_string(),
                    color: "#10B981".to_string(),
                    order: 1,
                })
                .unwrap()
        };

        let db = Database::new(path_str).unwrap();
        let found = db.life_areas().get_by_id(&area.id).unwrap();
        assert_eq!(found, Some(area));
    }
}
