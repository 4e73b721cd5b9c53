use rusqlite::OptionalExtension;

use super::bad_column;
use crate::database::{Database, DatabaseError};
use crate::models::{Goal, GoalPatch, GoalStatus, NewGoal};
use crate::utils::now_stamp;

/// Repository for goals. Every goal belongs to exactly one life area;
/// the reference is by id only and never checked here.
pub struct Goals<'a> {
    db: &'a Database,
}

const COLUMNS: &str = "id, life_area_id, title, description, target_date, status, created_at, updated_at";

impl<'a> Goals<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn row_to_goal(row: &rusqlite::Row) -> Result<Goal, rusqlite::Error> {
        let status: String = row.get(5)?;
        Ok(Goal {
            id: row.get(0)?,
            life_area_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            target_date: row.get(4)?,
            status: GoalStatus::from_str(&status)
                .ok_or_else(|| bad_column(5, format!("unknown goal status: {status}")))?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    pub fn get_all(&self) -> Result<Vec<Goal>, DatabaseError> {
        let mut stmt = self
            .db
            .conn()
            .prepare(&format!("SELECT {COLUMNS} FROM goals"))?;
        let goals = stmt
            .query_map([], Self::row_to_goal)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Goal>, DatabaseError> {
        self.db
            .conn()
            .query_row(
                &format!("SELECT {COLUMNS} FROM goals WHERE id = ?1"),
                [id],
                Self::row_to_goal,
            )
            .optional()
            .map_err(DatabaseError::from)
    }

    /// Get all goals belonging to a life area
    pub fn get_by_life_area(&self, life_area_id: &str) -> Result<Vec<Goal>, DatabaseError> {
        let mut stmt = self
            .db
            .conn()
            .prepare(&format!("SELECT {COLUMNS} FROM goals WHERE life_area_id = ?1"))?;
        let goals = stmt
            .query_map([life_area_id], Self::row_to_goal)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    pub fn create(&self, input: NewGoal) -> Result<Goal, DatabaseError> {
        let goal = Goal::new(input);
        self.db.conn().execute(
            "INSERT INTO goals (id, life_area_id, title, description, target_date, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                goal.id,
                goal.life_area_id,
                goal.title,
                goal.description,
                goal.target_date,
                goal.status.as_str(),
                goal.created_at,
                goal.updated_at
            ],
        )?;
        Ok(goal)
    }

    /// Merge a partial update onto an existing goal.
    /// Fails with NotFound if the id is absent.
    pub fn update(&self, id: &str, patch: GoalPatch) -> Result<Goal, DatabaseError> {
        let mut goal = self.get_by_id(id)?.ok_or_else(|| DatabaseError::NotFound {
            entity: "Goal",
            id: id.to_string(),
        })?;

        if let Some(life_area_id) = patch.life_area_id {
            goal.life_area_id = life_area_id;
        }
        if let Some(title) = patch.title {
            goal.title = title;
        }
        if let Some(description) = patch.description {
            goal.description = description;
        }
        if let Some(target_date) = patch.target_date {
            goal.target_date = target_date;
        }
        if let Some(status) = patch.status {
            goal.status = status;
        }
        goal.updated_at = now_stamp();

        self.db.conn().execute(
            "UPDATE goals SET life_area_id = ?1, title = ?2, description = ?3,
             target_date = ?4, status = ?5, updated_at = ?6 WHERE id = ?7",
            rusqlite::params![
                goal.life_area_id,
                goal.title,
                goal.description,
                goal.target_date,
                goal.status.as_str(),
                goal.updated_at,
                goal.id
            ],
        )?;
        Ok(goal)
    }

    /// Delete a goal by id. Idempotent.
    pub fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        self.db
            .conn()
            .execute("DELETE FROM goals WHERE id = ?1", [id])?;
        Ok(())
    }
}
