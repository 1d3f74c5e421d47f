use crate::dates;
use crate::models::Dream;
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// Longest streak the backward scan will report.
pub const MAX_STREAK_DAYS: u32 = 365;

pub fn calculate_streak(dreams: &[Dream]) -> u32 {
    calculate_streak_at(dates::today(), dreams)
}

/// Counts consecutive days with at least one entry, walking back from `today`.
///
/// A missing entry for `today` itself does not break the streak: the day is
/// still open, so the scan moves on to yesterday. Any other gap ends it.
pub fn calculate_streak_at(today: NaiveDate, dreams: &[Dream]) -> u32 {
    let days: HashSet<NaiveDate> = dreams.iter().map(Dream::local_date).collect();
    if days.is_empty() {
        return 0;
    }

    let mut streak = 0;
    for offset in 0..MAX_STREAK_DAYS {
        let date = today - Duration::days(i64::from(offset));
        if days.contains(&date) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }
    streak
}
