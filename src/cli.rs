use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::database::{Database, DatabaseError};
use crate::models::{
    GoalPatch, GoalStatus, Mood, NewGoal, NewLifeArea, NewTask, Priority,
};
use crate::stats::{self, Timeframe};
use crate::utils::{get_current_date_string, parse_date};

#[derive(Parser)]
#[command(name = "lifeplan")]
#[command(about = "Life areas, goals, tasks and a daily journal - local-first planning")]
#[command(version)]
pub struct Cli {
    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to a life area, optionally scheduled on a day
    AddTask {
        /// Task title
        title: String,
        /// Life area id the task belongs to
        #[arg(long)]
        area: String,
        /// Goal id the task contributes to
        #[arg(long)]
        goal: Option<String>,
        /// Scheduled day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Due day (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// low, medium or high (default medium)
        #[arg(long)]
        priority: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Mark a task completed
    Complete {
        /// Task id
        id: String,
    },
    /// Return a completed task to pending
    Uncomplete {
        /// Task id
        id: String,
    },
    /// Write (or rewrite) the journal entry for a day
    Journal {
        /// Entry content
        content: String,
        /// Day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// great, good, okay, bad or terrible; omit to keep the current mood
        #[arg(long)]
        mood: Option<String>,
    },
    /// Show a day: scheduled tasks plus the journal entry
    Day {
        /// Day (YYYY-MM-DD), defaults to today
        date: Option<String>,
    },
    /// List life areas in display order
    Areas,
    /// Add a life area
    AddArea {
        /// Area name
        name: String,
        /// Display color hint
        #[arg(long, default_value = "#6B7280")]
        color: String,
        /// Position in the display order (defaults to after the last area)
        #[arg(long)]
        order: Option<i64>,
    },
    /// Delete a life area that has no goals or tasks left
    RmArea {
        /// Life area id
        id: String,
    },
    /// Move a life area up or down in the display order
    MoveArea {
        /// Life area id
        id: String,
        /// up or down
        direction: String,
    },
    /// Add a goal to a life area
    AddGoal {
        /// Goal title
        title: String,
        /// Life area id the goal belongs to
        #[arg(long)]
        area: String,
        /// Longer description
        #[arg(long)]
        description: Option<String>,
        /// Target day (YYYY-MM-DD)
        #[arg(long)]
        target: Option<String>,
    },
    /// Update a goal's status
    GoalStatus {
        /// Goal id
        id: String,
        /// active, completed or paused
        status: String,
    },
    /// List goals with their task completion counts
    Goals {
        /// Only goals in this life area
        #[arg(long)]
        area: Option<String>,
    },
    /// Progress rollup for one life area over a timeframe
    Progress {
        /// Life area id
        area: String,
        /// week, month, 3months, halfyear or year
        #[arg(long, default_value = "month")]
        timeframe: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Failed to parse date: {0}")]
    DateParse(String),
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("Invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("No life area with id {0}")]
    UnknownArea(String),
    #[error("Life area still has {goals} goal(s) and {tasks} task(s); move or delete them first")]
    AreaInUse { goals: usize, tasks: usize },
}

/// Validate a YYYY-MM-DD argument, passing the string through
fn checked_date(date: String) -> Result<String, CliError> {
    parse_date(&date)
        .map_err(|e| CliError::DateParse(format!("Invalid date format '{}': {}", date, e)))?;
    Ok(date)
}

/// Split a comma-separated --tags argument into a tag list
fn parse_tags(tags: Option<String>) -> Vec<String> {
    tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Resolve a life area id, enforcing the exists-at-creation convention
fn require_area(db: &Database, id: &str) -> Result<(), CliError> {
    if db.life_areas().get_by_id(id)?.is_none() {
        return Err(CliError::UnknownArea(id.to_string()));
    }
    Ok(())
}

/// Handle the add-task command
pub fn handle_add_task(
    title: String,
    area: String,
    goal: Option<String>,
    date: Option<String>,
    due: Option<String>,
    priority: Option<String>,
    tags: Option<String>,
    db: &Database,
) -> Result<(), CliError> {
    if title.trim().is_empty() {
        return Err(CliError::EmptyField("title"));
    }
    require_area(db, &area)?;

    let priority = match priority {
        Some(p) => Priority::from_str(&p).ok_or(CliError::InvalidValue {
            field: "priority",
            value: p,
        })?,
        None => Priority::default(),
    };

    let task = db.tasks().create(NewTask {
        life_area_id: area,
        goal_id: goal,
        title,
        priority,
        scheduled_date: date.map(checked_date).transpose()?,
        due_date: due.map(checked_date).transpose()?,
        tags: parse_tags(tags),
        ..Default::default()
    })?;
    println!("Task created successfully (id: {})", task.id);

    Ok(())
}

/// Handle the complete command
pub fn handle_complete(id: String, db: &Database) -> Result<(), CliError> {
    let task = db.tasks().complete(&id)?;
    println!("Completed: {}", task.title);
    Ok(())
}

/// Handle the uncomplete command
pub fn handle_uncomplete(id: String, db: &Database) -> Result<(), CliError> {
    let task = db.tasks().uncomplete(&id)?;
    println!("Back to pending: {}", task.title);
    Ok(())
}

/// Handle the journal command. Routes through upsert-by-date, the
/// invariant-preserving write path; an omitted mood keeps the stored one.
pub fn handle_journal(
    content: String,
    date: Option<String>,
    mood: Option<String>,
    db: &Database,
) -> Result<(), CliError> {
    if content.trim().is_empty() {
        return Err(CliError::EmptyField("content"));
    }
    let date = match date {
        Some(d) => checked_date(d)?,
        None => get_current_date_string(),
    };
    let mood = match mood {
        Some(m) => Some(Mood::from_str(&m).ok_or(CliError::InvalidValue {
            field: "mood",
            value: m,
        })?),
        None => None,
    };

    let entry = db.journal_entries().upsert_by_date(&date, &content, mood)?;
    println!("Journal entry saved for {}", entry.date);
    Ok(())
}

/// Handle the day command
pub fn handle_day(date: Option<String>, db: &Database) -> Result<(), CliError> {
    let date = match date {
        Some(d) => checked_date(d)?,
        None => get_current_date_string(),
    };

    let tasks = db.tasks().get_by_date(&date)?;
    println!("{}", date);
    if tasks.is_empty() {
        println!("  no tasks scheduled");
    }
    for task in &tasks {
        let marker = if task.completed_at.is_some() { "x" } else { " " };
        println!("  [{}] {} ({}) {}", marker, task.title, task.priority.as_str(), task.id);
    }

    match db.journal_entries().get_by_date(&date)? {
        Some(entry) => {
            let mood = entry.mood.map(|m| format!(" [{}]", m.as_str())).unwrap_or_default();
            println!("journal{}: {}", mood, entry.content);
        }
        None => println!("journal: (none)"),
    }
    Ok(())
}

/// Handle the areas command
pub fn handle_areas(db: &Database) -> Result<(), CliError> {
    for area in db.life_areas().get_all()? {
        println!("{:>3}  {}  {}  {}", area.order, area.color, area.name, area.id);
    }
    Ok(())
}

/// Handle the add-area command
pub fn handle_add_area(
    name: String,
    color: String,
    order: Option<i64>,
    db: &Database,
) -> Result<(), CliError> {
    if name.trim().is_empty() {
        return Err(CliError::EmptyField("name"));
    }
    // Default to the end of the display order, like the life-areas form
    let order = match order {
        Some(o) => o,
        None => {
            db.life_areas()
                .get_all()?
                .iter()
                .map(|a| a.order)
                .max()
                .unwrap_or(0)
                + 1
        }
    };

    let area = db.life_areas().create(NewLifeArea { name, color, order })?;
    println!("Life area created successfully (id: {})", area.id);
    Ok(())
}

/// Handle the rm-area command. Deletion is blocked while any goal or task
/// still references the area; there is no cascade.
pub fn handle_rm_area(id: String, db: &Database) -> Result<(), CliError> {
    require_area(db, &id)?;

    let goals = db.goals().get_by_life_area(&id)?;
    let tasks = db.tasks().get_by_life_area(&id)?;
    if !goals.is_empty() || !tasks.is_empty() {
        tracing::warn!(area = %id, "blocked life area deletion with live dependents");
        return Err(CliError::AreaInUse {
            goals: goals.len(),
            tasks: tasks.len(),
        });
    }

    db.life_areas().delete(&id)?;
    println!("Life area deleted");
    Ok(())
}

/// Handle the move-area command: swap display order with the neighbor in the
/// given direction. Moving past either end is a no-op.
pub fn handle_move_area(id: String, direction: String, db: &Database) -> Result<(), CliError> {
    let areas = db.life_areas().get_all()?;
    let idx = areas
        .iter()
        .position(|a| a.id == id)
        .ok_or_else(|| CliError::UnknownArea(id.clone()))?;

    let neighbor = match direction.as_str() {
        "up" => idx.checked_sub(1),
        "down" => (idx + 1 < areas.len()).then_some(idx + 1),
        _ => {
            return Err(CliError::InvalidValue {
                field: "direction",
                value: direction,
            });
        }
    };

    match neighbor {
        Some(n) => {
            db.life_areas().swap_order(&areas[idx].id, &areas[n].id)?;
            println!("Moved {} {}", areas[idx].name, direction);
        }
        None => println!("{} is already at the {}", areas[idx].name, if direction == "up" { "top" } else { "bottom" }),
    }
    Ok(())
}

/// Handle the add-goal command
pub fn handle_add_goal(
    title: String,
    area: String,
    description: Option<String>,
    target: Option<String>,
    db: &Database,
) -> Result<(), CliError> {
    if title.trim().is_empty() {
        return Err(CliError::EmptyField("title"));
    }
    require_area(db, &area)?;

    let goal = db.goals().create(NewGoal {
        life_area_id: area,
        title,
        description,
        target_date: target.map(checked_date).transpose()?,
        status: GoalStatus::Active,
    })?;
    println!("Goal created successfully (id: {})", goal.id);
    Ok(())
}

/// Handle the goal-status command
pub fn handle_goal_status(id: String, status: String, db: &Database) -> Result<(), CliError> {
    let status = GoalStatus::from_str(&status).ok_or(CliError::InvalidValue {
        field: "status",
        value: status,
    })?;

    let goal = db.goals().update(
        &id,
        GoalPatch {
            status: Some(status),
            ..Default::default()
        },
    )?;
    println!("{} is now {}", goal.title, goal.status.as_str());
    Ok(())
}

/// Handle the goals command
pub fn handle_goals(area: Option<String>, db: &Database) -> Result<(), CliError> {
    let goals = match area {
        Some(id) => db.goals().get_by_life_area(&id)?,
        None => db.goals().get_all()?,
    };

    for goal in goals {
        let tasks = db.tasks().get_by_goal(&goal.id)?;
        let done = tasks.iter().filter(|t| t.completed_at.is_some()).count();
        let target = goal
            .target_date
            .map(|d| format!(", target {}", d))
            .unwrap_or_default();
        println!(
            "[{}] {} ({}/{} tasks{})  {}",
            goal.status.as_str(),
            goal.title,
            done,
            tasks.len(),
            target,
            goal.id
        );
    }
    Ok(())
}

/// Handle the progress command
pub fn handle_progress(area: String, timeframe: String, db: &Database) -> Result<(), CliError> {
    require_area(db, &area)?;
    let timeframe = Timeframe::from_str(&timeframe).ok_or(CliError::InvalidValue {
        field: "timeframe",
        value: timeframe,
    })?;

    let tasks = db.tasks().get_all()?;
    let goals = db.goals().get_all()?;
    let today = chrono::Utc::now().date_naive();
    let report = stats::progress_for_area(&area, timeframe, today, &tasks, &goals);

    println!("{}", timeframe.label());
    println!(
        "  tasks: {}/{} completed ({:.0}%)",
        report.completed_tasks,
        report.total_tasks,
        report.completion_rate * 100.0
    );
    println!(
        "  active days: {}/{} ({:.0}%)",
        report.active_days,
        report.total_days,
        report.consistency_rate * 100.0
    );
    println!("  goals: {}", report.goals.len());
    for day in &report.breakdown {
        println!("  {}  {}/{} done", day.date, day.completed, day.total);
    }
    Ok(())
}

/// Dispatch a parsed command against an opened, seeded database
pub fn run(command: Commands, db: &Database) -> Result<(), CliError> {
    match command {
        Commands::AddTask {
            title,
            area,
            goal,
            date,
            due,
            priority,
            tags,
        } => handle_add_task(title, area, goal, date, due, priority, tags, db),
        Commands::Complete { id } => handle_complete(id, db),
        Commands::Uncomplete { id } => handle_uncomplete(id, db),
        Commands::Journal {
            content,
            date,
            mood,
        } => handle_journal(content, date, mood, db),
        Commands::Day { date } => handle_day(date, db),
        Commands::Areas => handle_areas(db),
        Commands::AddArea { name, color, order } => handle_add_area(name, color, order, db),
        Commands::RmArea { id } => handle_rm_area(id, db),
        Commands::MoveArea { id, direction } => handle_move_area(id, direction, db),
        Commands::AddGoal {
            title,
            area,
            description,
            target,
        } => handle_add_goal(title, area, description, target, db),
        Commands::GoalStatus { id, status } => handle_goal_status(id, status, db),
        Commands::Goals { area } => handle_goals(area, db),
        Commands::Progress { area, timeframe } => handle_progress(area, timeframe, db),
    }
}
