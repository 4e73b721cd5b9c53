use rusqlite::OptionalExtension;

use super::bad_column;
use crate::database::{Database, DatabaseError};
use crate::models::{NewProject, Project, ProjectPatch, ProjectStatus};
use crate::utils::now_stamp;

/// Repository for projects. The entity is part of the schema for
/// compatibility; no command flow exercises it.
pub struct Projects<'a> {
    db: &'a Database,
}

const COLUMNS: &str = "id, goal_id, title, status, created_at, updated_at";

impl<'a> Projects<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn row_to_project(row: &rusqlite::Row) -> Result<Project, rusqlite::Error> {
        let status: String = row.get(3)?;
        Ok(Project {
            id: row.get(0)?,
            goal_id: row.get(1)?,
            title: row.get(2)?,
            status: ProjectStatus::from_str(&status)
                .ok_or_else(|| bad_column(3, format!("unknown project status: {status}")))?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    pub fn get_all(&self) -> Result<Vec<Project>, DatabaseError> {
        let mut stmt = self
            .db
            .conn()
            .prepare(&format!("SELECT {COLUMNS} FROM projects"))?;
        let projects = stmt
            .query_map([], Self::row_to_project)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Project>, DatabaseError> {
        self.db
            .conn()
            .query_row(
                &format!("SELECT {COLUMNS} FROM projects WHERE id = ?1"),
                [id],
                Self::row_to_project,
            )
            .optional()
            .map_err(DatabaseError::from)
    }

    /// Get all projects belonging to a goal
    pub fn get_by_goal(&self, goal_id: &str) -> Result<Vec<Project>, DatabaseError> {
        let mut stmt = self
            .db
            .conn()
            .prepare(&format!("SELECT {COLUMNS} FROM projects WHERE goal_id = ?1"))?;
        let projects = stmt
            .query_map([goal_id], Self::row_to_project)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    pub fn create(&self, input: NewProject) -> Result<Project, DatabaseError> {
        let project = Project::new(input);
        self.db.conn().execute(
            "INSERT INTO projects (id, goal_id, title, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                project.id,
                project.goal_id,
                project.title,
                project.status.as_str(),
                project.created_at,
                project.updated_at
            ],
        )?;
        Ok(project)
    }

    /// Merge a partial update onto an existing project.
    /// Fails with NotFound if the id is absent.
    pub fn update(&self, id: &str, patch: ProjectPatch) -> Result<Project, DatabaseError> {
        let mut project = self.get_by_id(id)?.ok_or_else(|| DatabaseError::NotFound {
            entity: "Project",
            id: id.to_string(),
        })?;

        if let Some(goal_id) = patch.goal_id {
            project.goal_id = goal_id;
        }
        if let Some(title) = patch.title {
            project.title = title;
        }
        if let Some(status) = patch.status {
            project.status = status;
        }
        project.updated_at = now_stamp();

        self.db.conn().execute(
            "UPDATE projects SET goal_id = ?1, title = ?2, status = ?3, updated_at = ?4
             WHERE id = ?5",
            rusqlite::params![
                project.goal_id,
                project.title,
                project.status.as_str(),
                project.updated_at,
                project.id
            ],
        )?;
        Ok(project)
    }

    /// Delete a project by id. Idempotent.
    pub fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        self.db
            .conn()
            .execute("DELETE FROM projects WHERE id = ?1", [id])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_get_by_goal() {
        let db = Database::open_in_memory().unwrap();
        let project = db
            .projects()
            .create(NewProject {
                goal_id: "goal-1".to_string(),
                title: "Couch to 5K plan".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(db.projects().get_by_id(&project.id).unwrap(), Some(project.clone()));
        let for_goal = db.projects().get_by_goal("goal-1").unwrap();
        assert_eq!(for_goal, vec![project]);
        assert!(db.projects().get_by_goal("goal-2").unwrap().is_empty());
    }

    #[test]
    fn update_changes_status() {
        let db = Database::open_in_memory().unwrap();
        let project = db
            .projects()
            .create(NewProject {
                goal_id: "goal-1".to_string(),
                title: "Couch to 5K plan".to_string(),
                ..Default::default()
            })
            .unwrap();

        let updated = db
            .projects()
            .update(
                &project.id,
                ProjectPatch {
                    status: Some(ProjectStatus::Completed),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, ProjectStatus::Completed);
        assert_eq!(updated.title, project.title);
    }
}
