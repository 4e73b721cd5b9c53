use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::now_stamp;

/// Top-level category (e.g. Health, Finance) used to group goals and tasks.
/// `order` determines display order and need not be contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeArea {
    pub id: String,
    pub name: String,
    pub color: String, // display hint, not validated
    pub order: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub life_area_id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<String>, // YYYY-MM-DD
    pub status: GoalStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Defined in the schema but not exercised by any command flow.
/// Retained for compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub goal_id: String,
    pub title: String,
    pub status: ProjectStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub life_area_id: String,
    pub goal_id: Option<String>,
    pub project_id: Option<String>,
    pub title: String,
    pub notes: Option<String>,
    pub priority: Priority,
    pub estimated_minutes: Option<i64>,
    pub scheduled_date: Option<String>, // YYYY-MM-DD, day granularity
    pub due_date: Option<String>,       // YYYY-MM-DD
    pub completed_at: Option<String>,   // presence is the sole completion marker
    pub dependencies: Vec<String>,      // task ids, no cycle checking performed
    pub tags: Vec<String>,
    pub is_goal_task: bool, // set on tasks generated via goal breakdown
    pub created_at: String,
    pub updated_at: String,
}

/// Free-text daily reflection, one per calendar day (enforced by upsert).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub date: String, // YYYY-MM-DD
    pub content: String,
    pub mood: Option<Mood>,
    pub created_at: String,
    pub updated_at: String,
}

/// Per-day rollup distinct from the journal entry, keyed directly by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: String, // YYYY-MM-DD, primary key
    pub reflection: Option<String>,
    pub energy_level: Option<i64>, // 1..=5
    pub score: Option<i64>,        // 0..=10
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "paused" => Some(Self::Paused),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Paused,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "paused" => Some(Self::Paused),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Bad,
    Terrible,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Great => "great",
            Self::Good => "good",
            Self::Okay => "okay",
            Self::Bad => "bad",
            Self::Terrible => "terrible",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "great" => Some(Self::Great),
            "good" => Some(Self::Good),
            "okay" => Some(Self::Okay),
            "bad" => Some(Self::Bad),
            "terrible" => Some(Self::Terrible),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Creation inputs: everything except id/created_at/updated_at, which the
// repository stamps.

#[derive(Debug, Clone, Default)]
pub struct NewLifeArea {
    pub name: String,
    pub color: String,
    pub order: i64,
}

#[derive(Debug, Clone, Default)]
pub struct NewGoal {
    pub life_area_id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<String>,
    pub status: GoalStatus,
}

#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub goal_id: String,
    pub title: String,
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub life_area_id: String,
    pub goal_id: Option<String>,
    pub project_id: Option<String>,
    pub title: String,
    pub notes: Option<String>,
    pub priority: Priority,
    pub estimated_minutes: Option<i64>,
    pub scheduled_date: Option<String>,
    pub due_date: Option<String>,
    pub completed_at: Option<String>,
    pub dependencies: Vec<String>,
    pub tags: Vec<String>,
    pub is_goal_task: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NewJournalEntry {
    pub date: String,
    pub content: String,
    pub mood: Option<Mood>,
}

#[derive(Debug, Clone, Default)]
pub struct NewDaySummary {
    pub date: String,
    pub reflection: Option<String>,
    pub energy_level: Option<i64>,
    pub score: Option<i64>,
}

impl LifeArea {
    pub fn new(input: NewLifeArea) -> Self {
        let now = now_stamp();
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            color: input.color,
            order: input.order,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl Goal {
    pub fn new(input: NewGoal) -> Self {
        let now = now_stamp();
        Self {
            id: Uuid::new_v4().to_string(),
            life_area_id: input.life_area_id,
            title: input.title,
            description: input.description,
            target_date: input.target_date,
            status: input.status,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl Project {
    pub fn new(input: NewProject) -> Self {
        let now = now_stamp();
        Self {
            id: Uuid::new_v4().to_string(),
            goal_id: input.goal_id,
            title: input.title,
            status: input.status,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl Task {
    pub fn new(input: NewTask) -> Self {
        let now = now_stamp();
        Self {
            id: Uuid::new_v4().to_string(),
            life_area_id: input.life_area_id,
            goal_id: input.goal_id,
            project_id: input.project_id,
            title: input.title,
            notes: input.notes,
            priority: input.priority,
            estimated_minutes: input.estimated_minutes,
            scheduled_date: input.scheduled_date,
            due_date: input.due_date,
            completed_at: input.completed_at,
            dependencies: input.dependencies,
            tags: input.tags,
            is_goal_task: input.is_goal_task,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl JournalEntry {
    pub fn new(input: NewJournalEntry) -> Self {
        let now = now_stamp();
        Self {
            id: Uuid::new_v4().to_string(),
            date: input.date,
            content: input.content,
            mood: input.mood,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl DaySummary {
    pub fn new(input: NewDaySummary) -> Self {
        let now = now_stamp();
        Self {
            date: input.date,
            reflection: input.reflection,
            energy_level: input.energy_level,
            score: input.score,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Partial updates. Outer `None` leaves the field unchanged; for clearable
// optional fields, `Some(None)` explicitly clears the stored value. The two
// must stay distinguishable (e.g. un-setting completed_at vs not touching it).

#[derive(Debug, Clone, Default)]
pub struct LifeAreaPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct GoalPatch {
    pub life_area_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub target_date: Option<Option<String>>,
    pub status: Option<GoalStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub goal_id: Option<String>,
    pub title: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub life_area_id: Option<String>,
    pub goal_id: Option<Option<String>>,
    pub project_id: Option<Option<String>>,
    pub title: Option<String>,
    pub notes: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub estimated_minutes: Option<Option<i64>>,
    pub scheduled_date: Option<Option<String>>,
    pub due_date: Option<Option<String>>,
    pub completed_at: Option<Option<String>>,
    pub dependencies: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub is_goal_task: Option<bool>,
}

/// The natural key (`date`) is not patchable.
#[derive(Debug, Clone, Default)]
pub struct JournalEntryPatch {
    pub content: Option<String>,
    pub mood: Option<Option<Mood>>,
}

/// The natural key (`date`) is not patchable.
#[derive(Debug, Clone, Default)]
pub struct DaySummaryPatch {
    pub reflection: Option<Option<String>>,
    pub energy_level: Option<Option<i64>>,
    pub score: Option<Option<i64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_stamps_id_and_timestamps() {
        let task = Task::new(NewTask {
            life_area_id: "area-1".to_string(),
            title: "Buy shoes".to_string(),
            ..Default::default()
        });
        assert!(!task.id.is_empty());
        assert_eq!(task.created_at, task.updated_at);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = LifeArea::new(NewLifeArea::default());
        let b = LifeArea::new(NewLifeArea::default());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn enum_string_round_trips() {
        for status in [GoalStatus::Active, GoalStatus::Completed, GoalStatus::Paused] {
            assert_eq!(GoalStatus::from_str(status.as_str()), Some(status));
        }
        for mood in [Mood::Great, Mood::Good, Mood::Okay, Mood::Bad, Mood::Terrible] {
            assert_eq!(Mood::from_str(mood.as_str()), Some(mood));
        }
        assert_eq!(Priority::from_str("urgent"), None);
    }
}
