use rusqlite::OptionalExtension;

use super::{bad_column, decode_list, encode_list};
use crate::database::{Database, DatabaseError};
use crate::models::{NewTask, Priority, Task, TaskPatch};
use crate::utils::{normalize_day, now_stamp};

/// Repository for tasks, the schedulable unit of work. A task always points
/// at a life area and may point at a goal and/or project; `completed_at`
/// presence is the sole completion marker.
pub struct Tasks<'a> {
    db: &'a Database,
}

const COLUMNS: &str = "id, life_area_id, goal_id, project_id, title, notes, priority, \
     estimated_minutes, scheduled_date, due_date, completed_at, dependencies, tags, \
     is_goal_task, created_at, updated_at";

impl<'a> Tasks<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
        let priority: String = row.get(6)?;
        let dependencies: String = row.get(11)?;
        let tags: String = row.get(12)?;
        Ok(Task {
            id: row.get(0)?,
            life_area_id: row.get(1)?,
            goal_id: row.get(2)?,
            project_id: row.get(3)?,
            title: row.get(4)?,
            notes: row.get(5)?,
            priority: Priority::from_str(&priority)
                .ok_or_else(|| bad_column(6, format!("unknown priority: {priority}")))?,
            estimated_minutes: row.get(7)?,
            scheduled_date: row.get(8)?,
            due_date: row.get(9)?,
            completed_at: row.get(10)?,
            dependencies: decode_list(11, &dependencies)?,
            tags: decode_list(12, &tags)?,
            is_goal_task: row.get::<_, i64>(13)? != 0,
            created_at: row.get(14)?,
            updated_at: row.get(15)?,
        })
    }

    pub fn get_all(&self) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self
            .db
            .conn()
            .prepare(&format!("SELECT {COLUMNS} FROM tasks"))?;
        let tasks = stmt
            .query_map([], Self::row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Task>, DatabaseError> {
        self.db
            .conn()
            .query_row(
                &format!("SELECT {COLUMNS} FROM tasks WHERE id = ?1"),
                [id],
                Self::row_to_task,
            )
            .optional()
            .map_err(DatabaseError::from)
    }

    pub fn get_by_life_area(&self, life_area_id: &str) -> Result<Vec<Task>, DatabaseError> {
        self.get_by_fk("life_area_id", life_area_id)
    }

    pub fn get_by_goal(&self, goal_id: &str) -> Result<Vec<Task>, DatabaseError> {
        self.get_by_fk("goal_id", goal_id)
    }

    pub fn get_by_project(&self, project_id: &str) -> Result<Vec<Task>, DatabaseError> {
        self.get_by_fk("project_id", project_id)
    }

    fn get_by_fk(&self, column: &str, value: &str) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self
            .db
            .conn()
            .prepare(&format!("SELECT {COLUMNS} FROM tasks WHERE {column} = ?1"))?;
        let tasks = stmt
            .query_map([value], Self::row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Get all tasks scheduled on a calendar day. The probe is normalized to
    /// day granularity first, so a full timestamp and its day compare equal;
    /// an unparseable probe matches nothing.
    pub fn get_by_date(&self, date: &str) -> Result<Vec<Task>, DatabaseError> {
        let day = normalize_day(date).unwrap_or_else(|_| date.to_string());
        let mut stmt = self
            .db
            .conn()
            .prepare(&format!("SELECT {COLUMNS} FROM tasks WHERE scheduled_date = ?1"))?;
        let tasks = stmt
            .query_map([day], Self::row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Get all completed tasks
    pub fn get_completed(&self) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.db.conn().prepare(&format!(
            "SELECT {COLUMNS} FROM tasks WHERE completed_at IS NOT NULL"
        ))?;
        let tasks = stmt
            .query_map([], Self::row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn create(&self, input: NewTask) -> Result<Task, DatabaseError> {
        let task = Task::new(input);
        self.db.conn().execute(
            "INSERT INTO tasks (id, life_area_id, goal_id, project_id, title, notes, priority,
             estimated_minutes, scheduled_date, due_date, completed_at, dependencies, tags,
             is_goal_task, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            rusqlite::params![
                task.id,
                task.life_area_id,
                task.goal_id,
                task.project_id,
                task.title,
                task.notes,
                task.priority.as_str(),
                task.estimated_minutes,
                task.scheduled_date,
                task.due_date,
                task.completed_at,
                encode_list("dependencies", &task.dependencies)?,
                encode_list("tags", &task.tags)?,
                task.is_goal_task as i64,
                task.created_at,
                task.updated_at
            ],
        )?;
        Ok(task)
    }

    /// Merge a partial update onto an existing task.
    /// Fails with NotFound if the id is absent.
    pub fn update(&self, id: &str, patch: TaskPatch) -> Result<Task, DatabaseError> {
        let mut task = self.get_by_id(id)?.ok_or_else(|| DatabaseError::NotFound {
            entity: "Task",
            id: id.to_string(),
        })?;

        if let Some(life_area_id) = patch.life_area_id {
            task.life_area_id = life_area_id;
        }
        if let Some(goal_id) = patch.goal_id {
            task.goal_id = goal_id;
        }
        if let Some(project_id) = patch.project_id {
            task.project_id = project_id;
        }
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(notes) = patch.notes {
            task.notes = notes;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(estimated_minutes) = patch.estimated_minutes {
            task.estimated_minutes = estimated_minutes;
        }
        if let Some(scheduled_date) = patch.scheduled_date {
            task.scheduled_date = scheduled_date;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(completed_at) = patch.completed_at {
            task.completed_at = completed_at;
        }
        if let Some(dependencies) = patch.dependencies {
            task.dependencies = dependencies;
        }
        if let Some(tags) = patch.tags {
            task.tags = tags;
        }
        if let Some(is_goal_task) = patch.is_goal_task {
            task.is_goal_task = is_goal_task;
        }
        task.updated_at = now_stamp();

        self.db.conn().execute(
            "UPDATE tasks SET life_area_id = ?1, goal_id = ?2, project_id = ?3, title = ?4,
             notes = ?5, priority = ?6, estimated_minutes = ?7, scheduled_date = ?8,
             due_date = ?9, completed_at = ?10, dependencies = ?11, tags = ?12,
             is_goal_task = ?13, updated_at = ?14 WHERE id = ?15",
            rusqlite::params![
                task.life_area_id,
                task.goal_id,
                task.project_id,
                task.title,
                task.notes,
                task.priority.as_str(),
                task.estimated_minutes,
                task.scheduled_date,
                task.due_date,
                task.completed_at,
                encode_list("dependencies", &task.dependencies)?,
                encode_list("tags", &task.tags)?,
                task.is_goal_task as i64,
                task.updated_at,
                task.id
            ],
        )?;
        Ok(task)
    }

    /// Delete a task by id. Idempotent.
    pub fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        self.db
            .conn()
            .execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        Ok(())
    }

    /// Mark a task completed by stamping completed_at with the current instant
    pub fn complete(&self, id: &str) -> Result<Task, DatabaseError> {
        self.update(
            id,
            TaskPatch {
                completed_at: Some(Some(now_stamp())),
                ..Default::default()
            },
        )
    }

    /// Clear a task's completed_at, returning it to pending
    pub fn uncomplete(&self, id: &str) -> Result<Task, DatabaseError> {
        self.update(
            id,
            TaskPatch {
                completed_at: Some(None),
                ..Default::default()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewGoal, NewLifeArea};

    fn sample_task(db: &Database, title: &str) -> Task {
        db.tasks()
            .create(NewTask {
                life_area_id: "area-1".to_string(),
                title: title.to_string(),
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn create_then_get_by_id_round_trips_lists() {
        let db = Database::open_in_memory().unwrap();
        let task = db
            .tasks()
            .create(NewTask {
                life_area_id: "area-1".to_string(),
                title: "Buy shoes".to_string(),
                notes: Some("running shoes, size 44".to_string()),
                tags: vec!["errand".to_string(), "with, comma".to_string()],
                dependencies: vec!["task-0".to_string()],
                estimated_minutes: Some(45),
                ..Default::default()
            })
            .unwrap();

        let found = db.tasks().get_by_id(&task.id).unwrap();
        assert_eq!(found, Some(task));
    }

    #[test]
    fn scenario_area_goal_task_lifecycle() {
        let db = Database::open_in_memory().unwrap();
        let health = db
            .life_areas()
            .create(NewLifeArea {
                name: "Health".to_string(),
                color: "#10B981".to_string(),
                order: 1,
            })
            .unwrap();
        let goal = db
            .goals()
            .create(NewGoal {
                life_area_id: health.id.clone(),
                title: "Run a 5K".to_string(),
                ..Default::default()
            })
            .unwrap();
        let task = db
            .tasks()
            .create(NewTask {
                life_area_id: health.id.clone(),
                goal_id: Some(goal.id.clone()),
                title: "Buy shoes".to_string(),
                scheduled_date: Some("2024-06-01".to_string()),
                priority: Priority::Medium,
                ..Default::default()
            })
            .unwrap();

        let by_goal = db.tasks().get_by_goal(&goal.id).unwrap();
        assert_eq!(by_goal, vec![task.clone()]);

        let by_date = db.tasks().get_by_date("2024-06-01").unwrap();
        assert_eq!(by_date, vec![task.clone()]);

        db.tasks().complete(&task.id).unwrap();
        let by_goal = db.tasks().get_by_goal(&goal.id).unwrap();
        assert!(by_goal[0].completed_at.is_some());
    }

    #[test]
    fn get_by_date_normalizes_timestamp_probes() {
        let db = Database::open_in_memory().unwrap();
        let task = db
            .tasks()
            .create(NewTask {
                life_area_id: "area-1".to_string(),
                title: "Buy shoes".to_string(),
                scheduled_date: Some("2024-06-01".to_string()),
                ..Default::default()
            })
            .unwrap();

        let by_stamp = db.tasks().get_by_date("2024-06-01 09:30:00").unwrap();
        assert_eq!(by_stamp, vec![task]);
        assert!(db.tasks().get_by_date("2024-06-02").unwrap().is_empty());
        assert!(db.tasks().get_by_date("garbage").unwrap().is_empty());
    }

    #[test]
    fn complete_then_uncomplete_restores_pending_state() {
        let db = Database::open_in_memory().unwrap();
        let task = sample_task(&db, "Buy shoes");

        let completed = db.tasks().complete(&task.id).unwrap();
        assert!(completed.completed_at.is_some());

        let restored = db.tasks().uncomplete(&task.id).unwrap();
        assert_eq!(restored.completed_at, None);
        // Everything except the timestamps matches the original record
        assert_eq!(restored.id, task.id);
        assert_eq!(restored.title, task.title);
        assert_eq!(restored.life_area_id, task.life_area_id);
        assert_eq!(restored.priority, task.priority);
        assert_eq!(restored.tags, task.tags);
        assert_eq!(restored.created_at, task.created_at);
    }

    #[test]
    fn get_completed_returns_only_completed_tasks() {
        let db = Database::open_in_memory().unwrap();
        let done = sample_task(&db, "done");
        sample_task(&db, "pending");
        db.tasks().complete(&done.id).unwrap();

        let completed = db.tasks().get_completed().unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, done.id);
    }

    #[test]
    fn patch_distinguishes_clear_from_omit() {
        let db = Database::open_in_memory().unwrap();
        let task = db
            .tasks()
            .create(NewTask {
                life_area_id: "area-1".to_string(),
                title: "Buy shoes".to_string(),
                scheduled_date: Some("2024-06-01".to_string()),
                due_date: Some("2024-06-03".to_string()),
                ..Default::default()
            })
            .unwrap();

        // Omitting both date fields leaves them in place
        let untouched = db
            .tasks()
            .update(
                &task.id,
                TaskPatch {
                    title: Some("Buy trail shoes".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(untouched.scheduled_date.as_deref(), Some("2024-06-01"));
        assert_eq!(untouched.due_date.as_deref(), Some("2024-06-03"));

        // Explicit clear of one field does not touch the other
        let cleared = db
            .tasks()
            .update(
                &task.id,
                TaskPatch {
                    scheduled_date: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(cleared.scheduled_date, None);
        assert_eq!(cleared.due_date.as_deref(), Some("2024-06-03"));
    }

    #[test]
    fn update_advances_updated_at_and_keeps_created_at() {
        let db = Database::open_in_memory().unwrap();
        let task = sample_task(&db, "Buy shoes");

        let updated = db
            .tasks()
            .update(
                &task.id,
                TaskPatch {
                    priority: Some(Priority::High),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.created_at, task.created_at);
        assert_eq!(updated.id, task.id);
        assert!(updated.updated_at >= task.updated_at);
    }

    #[test]
    fn dependencies_are_stored_verbatim_without_cycle_checks() {
        let db = Database::open_in_memory().unwrap();
        let a = sample_task(&db, "a");
        // A task may even depend on itself; the layer stores what it is given
        let b = db
            .tasks()
            .create(NewTask {
                life_area_id: "area-1".to_string(),
                title: "b".to_string(),
                dependencies: vec![a.id.clone()],
                ..Default::default()
            })
            .unwrap();
        db.tasks()
            .update(
                &a.id,
                TaskPatch {
                    dependencies: Some(vec![b.id.clone()]),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(db.tasks().get_by_id(&a.id).unwrap().unwrap().dependencies, vec![b.id]);
    }
}
