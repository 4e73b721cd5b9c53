//! Derived, read-only computations over already-fetched entity lists.
//! Nothing here touches storage; callers fetch tasks/goals through the
//! repositories and hand them in.

use chrono::{Datelike, Months, NaiveDate, Weekday};
use std::collections::HashSet;

use crate::models::{Goal, Task};
use crate::utils::parse_date;

/// Fraction of tasks in the set that are completed, in 0..=1.
/// An empty set rates 0, never NaN.
pub fn completion_rate(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let completed = tasks.iter().filter(|t| t.completed_at.is_some()).count();
    completed as f64 / tasks.len() as f64
}

/// Fraction of days in a range that had at least one task, in 0..=1.
/// Guards the empty range the same way.
pub fn consistency_rate(active_days: usize, total_days: i64) -> f64 {
    if total_days <= 0 {
        return 0.0;
    }
    active_days as f64 / total_days as f64
}

/// Inclusive day count of [start, end]
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// One calendar day's slice of a task set
#[derive(Debug, Clone, PartialEq)]
pub struct DayBreakdown {
    pub date: String,
    pub tasks: Vec<Task>,
    pub completed: usize,
    pub total: usize,
}

/// Bucket tasks by scheduled day across [start, end] inclusive.
/// Days with no tasks are omitted from the result.
pub fn breakdown_by_day(start: NaiveDate, end: NaiveDate, tasks: &[Task]) -> Vec<DayBreakdown> {
    let mut breakdown = Vec::new();
    for day in start.iter_days().take_while(|d| *d <= end) {
        let date = day.format("%Y-%m-%d").to_string();
        let day_tasks: Vec<Task> = tasks
            .iter()
            .filter(|t| t.scheduled_date.as_deref() == Some(date.as_str()))
            .cloned()
            .collect();
        if !day_tasks.is_empty() {
            let completed = day_tasks.iter().filter(|t| t.completed_at.is_some()).count();
            let total = day_tasks.len();
            breakdown.push(DayBreakdown {
                date,
                tasks: day_tasks,
                completed,
                total,
            });
        }
    }
    breakdown
}

/// Reporting window for progress views. Week/month/year snap to calendar
/// boundaries (weeks start on Sunday); the other two are rolling windows
/// ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Week,
    Month,
    ThreeMonths,
    HalfYear,
    Year,
}

impl Timeframe {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "3months" => Some(Self::ThreeMonths),
            "halfyear" => Some(Self::HalfYear),
            "year" => Some(Self::Year),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Week => "This Week",
            Self::Month => "This Month",
            Self::ThreeMonths => "Last 3 Months",
            Self::HalfYear => "Last 6 Months",
            Self::Year => "This Year",
        }
    }

    /// Resolve to a concrete inclusive [start, end] day range relative to `today`
    pub fn range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Week => {
                let week = today.week(Weekday::Sun);
                (week.first_day(), week.last_day())
            }
            Self::Month => {
                let first = today.with_day(1).expect("day 1 is valid in every month");
                let last = (first + Months::new(1))
                    .pred_opt()
                    .expect("a month's end is never below the calendar minimum");
                (first, last)
            }
            Self::ThreeMonths => (today - Months::new(3), today),
            Self::HalfYear => (today - Months::new(6), today),
            Self::Year => {
                let year = today.year();
                (
                    NaiveDate::from_ymd_opt(year, 1, 1).expect("Jan 1 exists in every year"),
                    NaiveDate::from_ymd_opt(year, 12, 31).expect("Dec 31 exists in every year"),
                )
            }
        }
    }
}

/// Rollup the progress view renders for one life area and timeframe
#[derive(Debug, Clone)]
pub struct ProgressReport {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub active_days: usize,
    pub total_days: i64,
    pub completion_rate: f64,
    pub consistency_rate: f64,
    pub goals: Vec<Goal>,
    pub breakdown: Vec<DayBreakdown>,
}

/// Compute the progress rollup for a life area from full task/goal lists,
/// filtering in memory by area and by the timeframe's day range
pub fn progress_for_area(
    life_area_id: &str,
    timeframe: Timeframe,
    today: NaiveDate,
    all_tasks: &[Task],
    all_goals: &[Goal],
) -> ProgressReport {
    let (start, end) = timeframe.range(today);
    let total_days = days_in_range(start, end);

    let window_tasks: Vec<Task> = all_tasks
        .iter()
        .filter(|t| t.life_area_id == life_area_id)
        .filter(|t| {
            t.scheduled_date
                .as_deref()
                .and_then(|d| parse_date(d).ok())
                .is_some_and(|d| d >= start && d <= end)
        })
        .cloned()
        .collect();

    let completed_tasks = window_tasks
        .iter()
        .filter(|t| t.completed_at.is_some())
        .count();
    let active_days: HashSet<&str> = window_tasks
        .iter()
        .filter_map(|t| t.scheduled_date.as_deref())
        .collect();
    let goals: Vec<Goal> = all_goals
        .iter()
        .filter(|g| g.life_area_id == life_area_id)
        .cloned()
        .collect();

    ProgressReport {
        total_tasks: window_tasks.len(),
        completed_tasks,
        active_days: active_days.len(),
        total_days,
        completion_rate: completion_rate(&window_tasks),
        consistency_rate: consistency_rate(active_days.len(), total_days),
        goals,
        breakdown: breakdown_by_day(start, end, &window_tasks),
    }
}
