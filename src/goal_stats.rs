use crate::dates::{self, month_end};
use crate::models::{Goal, GoalStatistics, GoalStatus};
use chrono::NaiveDate;

/// Inclusive range of local calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self {
            start,
            end: month_end(start),
        })
    }

    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Whether a goal belongs to a statistics window.
///
/// Completed goals count where they were completed. Active goals count for
/// every window ending on or after their creation, however early they began.
fn in_window(goal: &Goal, range: &DateRange) -> bool {
    match goal.status {
        GoalStatus::Completed { completed_at } => range.contains(dates::local_date(completed_at)),
        GoalStatus::Active => dates::local_date(goal.created_at) <= range.end,
    }
}

pub fn aggregate(goals: &[Goal], range: Option<DateRange>) -> GoalStatistics {
    let filtered: Vec<&Goal> = match range {
        Some(range) => goals.iter().filter(|goal| in_window(goal, &range)).collect(),
        None => goals.iter().collect(),
    };

    let total = filtered.len();
    let completed = filtered.iter().filter(|goal| !goal.is_active()).count();
    let active = total - completed;
    let completion_rate = if total == 0 {
        0.0
    } else {
        round_to(completed as f64 / total as f64 * 100.0, 1)
    };

    GoalStatistics {
        total,
        completed,
        active,
        completion_rate,
    }
}

pub fn monthly_goal_statistics(goals: &[Goal], year: i32, month: u32) -> GoalStatistics {
    DateRange::month(year, month)
        .map(|range| aggregate(goals, Some(range)))
        .unwrap_or_default()
}

pub fn yearly_goal_statistics(goals: &[Goal], year: i32) -> GoalStatistics {
    DateRange::year(year)
        .map(|range| aggregate(goals, Some(range)))
        .unwrap_or_default()
}

pub fn lifetime_goal_statistics(goals: &[Goal]) -> GoalStatistics {
    aggregate(goals, None)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
