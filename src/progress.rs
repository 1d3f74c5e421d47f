use crate::dates::{self, month_label, month_start, next_month_start};
use crate::dream_signs::distinct_sign_count;
use crate::models::{Dream, Goal, GoalKind, GoalPeriod, GoalProgress};
use crate::streak::calculate_streak_at;
use chrono::NaiveDate;

pub fn evaluate_progress(goal: &Goal, dreams: &[Dream]) -> GoalProgress {
    evaluate_progress_at(dates::today(), goal, dreams)
}

pub fn evaluate_progress_at(today: NaiveDate, goal: &Goal, dreams: &[Dream]) -> GoalProgress {
    match &goal.kind {
        GoalKind::LucidCount => match goal.period {
            GoalPeriod::Monthly => monthly_lucid_count(goal, dreams),
            GoalPeriod::Streak | GoalPeriod::Total => GoalProgress {
                current: 0,
                message: "Lucid dream goals are only tracked monthly".to_string(),
            },
        },
        GoalKind::RecallStreak | GoalKind::JournalStreak => {
            let streak = calculate_streak_at(today, dreams);
            let message = if streak == 1 {
                "1 day streak".to_string()
            } else {
                format!("{streak} days streak")
            };
            GoalProgress {
                current: streak,
                message,
            }
        }
        GoalKind::DreamSignsCount => {
            let count = u32::try_from(distinct_sign_count(dreams)).unwrap_or(u32::MAX);
            GoalProgress {
                current: count,
                message: format!("{count} unique dream signs identified"),
            }
        }
        GoalKind::Custom { current_progress } => GoalProgress {
            current: *current_progress,
            message: format!("{current_progress} completed"),
        },
    }
}

// The window is the month the goal was created in, so a completed goal keeps
// the count it was completed with.
fn monthly_lucid_count(goal: &Goal, dreams: &[Dream]) -> GoalProgress {
    let created = dates::local_date(goal.created_at);
    let start = month_start(created);
    let end = next_month_start(created);

    let count = dreams
        .iter()
        .filter(|dream| dream.is_lucid)
        .map(Dream::local_date)
        .filter(|date| *date >= start && *date < end)
        .count();
    let count = u32::try_from(count).unwrap_or(u32::MAX);

    GoalProgress {
        current: count,
        message: format!("{count} lucid dreams in {}", month_label(start)),
    }
}

/// Share of the target reached, as a percentage capped at 100.
pub fn percent_complete(progress: &GoalProgress, target: u32) -> f64 {
    if target == 0 {
        return 0.0;
    }
    (f64::from(progress.current) / f64::from(target) * 100.0).min(100.0)
}
