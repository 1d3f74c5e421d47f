use crate::dates::{self, date_key, days_in_month, days_in_year, month_label};
use crate::goal_stats::{DateRange, aggregate, round_to};
use crate::models::{AppData, CalendarDay, Dream, GoalStatistics, PeriodStats, PieChart};
use crate::streak::calculate_streak_at;
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::{BTreeMap, HashSet};

const LUCID_COLOR: &str = "#8b5cf6";
const NON_LUCID_COLOR: &str = "#334155";

pub fn build_monthly_stats(data: &AppData, year: i32, month: u32) -> Option<PeriodStats> {
    let range = DateRange::month(year, month)?;
    let total_days = days_in_month(range.start);
    let mut stats = build_period(month_label(range.start), data, range, total_days);
    stats.calendar = Some(build_calendar(&data.dreams, range));
    Some(stats)
}

/// Yearly dashboard. The running year is measured against the days elapsed
/// so far; a year that has not started yet has no days at all.
pub fn build_yearly_stats_at(today: NaiveDate, data: &AppData, year: i32) -> Option<PeriodStats> {
    let range = DateRange::year(year)?;
    let total_days = if year < today.year() {
        days_in_year(year)
    } else if year == today.year() {
        (today - range.start).num_days() + 1
    } else {
        0
    };
    Some(build_period(year.to_string(), data, range, total_days))
}

pub fn build_yearly_stats(data: &AppData, year: i32) -> Option<PeriodStats> {
    build_yearly_stats_at(dates::today(), data, year)
}

pub fn build_lifetime_stats(data: &AppData) -> PeriodStats {
    build_lifetime_stats_at(dates::today(), data)
}

/// Lifetime dashboard, counted from the first journal entry through today.
/// Entries dated after today are left out; goals are counted regardless of date.
pub fn build_lifetime_stats_at(today: NaiveDate, data: &AppData) -> PeriodStats {
    let dreams: Vec<&Dream> = data
        .dreams
        .iter()
        .filter(|dream| dream.local_date() <= today)
        .collect();
    let first = dreams.iter().map(|dream| dream.local_date()).min();
    let total_days = first.map_or(0, |first| (today - first).num_days() + 1);

    let mut stats = period_stats(
        "Lifetime".to_string(),
        &dreams,
        aggregate(data.goals.as_slice(), None),
        total_days,
    );
    stats.start_date = first.map(date_key);
    stats.end_date = first.map(|_| date_key(today));
    stats.current_streak = Some(calculate_streak_at(today, &data.dreams));
    stats
}

fn build_period(label: String, data: &AppData, range: DateRange, total_days: i64) -> PeriodStats {
    let dreams: Vec<&Dream> = data
        .dreams
        .iter()
        .filter(|dream| range.contains(dream.local_date()))
        .collect();

    let mut stats = period_stats(
        label,
        &dreams,
        aggregate(data.goals.as_slice(), Some(range)),
        total_days,
    );
    stats.start_date = Some(date_key(range.start));
    stats.end_date = Some(date_key(range.end));
    stats
}

fn period_stats(
    label: String,
    dreams: &[&Dream],
    goals: GoalStatistics,
    total_days: i64,
) -> PeriodStats {
    let total_dreams = dreams.len();
    let lucid_dreams = dreams.iter().filter(|dream| dream.is_lucid).count();
    let days_with_entries = dreams
        .iter()
        .map(|dream| date_key(dream.local_date()))
        .collect::<HashSet<_>>()
        .len();

    let (recall_rate, average_dreams_per_day) = if total_days > 0 {
        let days = total_days as f64;
        (
            round_to(days_with_entries as f64 / days * 100.0, 1),
            round_to(total_dreams as f64 / days, 2),
        )
    } else {
        (0.0, 0.0)
    };

    PeriodStats {
        label,
        start_date: None,
        end_date: None,
        total_dreams,
        lucid_dreams,
        days_with_entries,
        total_days,
        recall_rate,
        average_dreams_per_day,
        pie_chart: pie_chart(lucid_dreams, total_dreams),
        goals,
        calendar: None,
        current_streak: None,
    }
}

/// Lucid share of a period as a two-slice conic gradient.
pub fn pie_chart(lucid: usize, total: usize) -> PieChart {
    let lucid = lucid.min(total);
    let lucid_degrees = if total == 0 {
        0.0
    } else {
        round_to(lucid as f64 / total as f64 * 360.0, 1)
    };
    PieChart {
        lucid,
        non_lucid: total - lucid,
        lucid_degrees,
        gradient: format!(
            "conic-gradient({LUCID_COLOR} 0deg {lucid_degrees}deg, {NON_LUCID_COLOR} {lucid_degrees}deg 360deg)"
        ),
    }
}

/// One entry per day of the range, including days without dreams.
pub fn build_calendar(dreams: &[Dream], range: DateRange) -> Vec<CalendarDay> {
    let mut counts: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for dream in dreams {
        let date = dream.local_date();
        if range.contains(date) {
            let entry = counts.entry(date).or_default();
            entry.0 += 1;
            if dream.is_lucid {
                entry.1 += 1;
            }
        }
    }

    let days = (range.end - range.start).num_days() + 1;
    (0..days)
        .map(|offset| {
            let date = range.start + Duration::days(offset);
            let (dreams, lucid) = counts.get(&date).copied().unwrap_or_default();
            CalendarDay {
                date: date_key(date),
                dreams,
                lucid,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::GoalStore;
    use crate::models::{GoalKind, GoalPeriod};
    use crate::test_support::{completed, date, dream_on, goal};

    fn journal() -> AppData {
        let dreams = vec![
            dream_on(date(2025, 12, 30), false, ""),
            dream_on(date(2026, 3, 1), true, "flying"),
            dream_on(date(2026, 3, 1), false, ""),
            dream_on(date(2026, 3, 4), true, ""),
            dream_on(date(2026, 4, 2), false, ""),
        ];
        let goals = vec![
            completed(
                goal("a", GoalKind::LucidCount, GoalPeriod::Monthly, 2, date(2026, 3, 1)),
                date(2026, 3, 4),
            ),
            goal("b", GoalKind::RecallStreak, GoalPeriod::Streak, 7, date(2026, 2, 1)),
        ];
        AppData {
            dreams,
            goals: GoalStore::new(goals),
        }
    }

    #[test]
    fn monthly_stats_cover_the_full_month() {
        let stats = build_monthly_stats(&journal(), 2026, 3).unwrap();
        assert_eq!(stats.label, "March 2026");
        assert_eq!(stats.total_dreams, 3);
        assert_eq!(stats.lucid_dreams, 2);
        assert_eq!(stats.days_with_entries, 2);
        assert_eq!(stats.total_days, 31);
        assert_eq!(stats.recall_rate, 6.5);
        assert_eq!(stats.average_dreams_per_day, 0.1);
        assert_eq!(stats.goals.total, 2);
        assert_eq!(stats.goals.completion_rate, 50.0);

        let calendar = stats.calendar.unwrap();
        assert_eq!(calendar.len(), 31);
        assert_eq!(calendar[0].date, "2026-03-01");
        assert_eq!((calendar[0].dreams, calendar[0].lucid), (2, 1));
        assert_eq!(calendar[1].dreams, 0);
    }

    #[test]
    fn invalid_month_has_no_stats() {
        assert!(build_monthly_stats(&journal(), 2026, 0).is_none());
    }

    #[test]
    fn current_year_uses_elapsed_days() {
        let today = date(2026, 1, 10);
        let stats = build_yearly_stats_at(today, &journal(), 2026).unwrap();
        assert_eq!(stats.total_days, 10);
        assert_eq!(stats.total_dreams, 4);
    }

    #[test]
    fn past_and_future_years() {
        let today = date(2026, 4, 10);
        let past = build_yearly_stats_at(today, &journal(), 2024).unwrap();
        assert_eq!(past.total_days, 366);
        assert_eq!(past.recall_rate, 0.0);

        let last_year = build_yearly_stats_at(today, &journal(), 2025).unwrap();
        assert_eq!(last_year.total_days, 365);
        assert_eq!(last_year.days_with_entries, 1);
        assert_eq!(last_year.recall_rate, 0.3);

        let future = build_yearly_stats_at(today, &journal(), 2027).unwrap();
        assert_eq!(future.total_days, 0);
        assert_eq!(future.average_dreams_per_day, 0.0);
    }

    #[test]
    fn lifetime_starts_at_first_entry() {
        let today = date(2026, 4, 2);
        let stats = build_lifetime_stats_at(today, &journal());
        assert_eq!(stats.start_date.as_deref(), Some("2025-12-30"));
        assert_eq!(stats.total_days, 94);
        assert_eq!(stats.total_dreams, 5);
        assert_eq!(stats.days_with_entries, 4);
        assert_eq!(stats.current_streak, Some(1));
        assert_eq!(stats.goals.total, 2);
    }

    #[test]
    fn lifetime_leaves_out_future_entries() {
        let today = date(2026, 3, 4);
        let mut data = journal();
        data.dreams.push(dream_on(date(2026, 3, 10), false, ""));
        data.dreams.push(dream_on(date(2026, 3, 11), true, ""));

        let stats = build_lifetime_stats_at(today, &data);
        assert_eq!(stats.total_days, 65);
        assert_eq!(stats.total_dreams, 4);
        assert_eq!(stats.days_with_entries, 3);
        assert!(stats.recall_rate <= 100.0);
        assert_eq!(stats.goals.total, 2);

        let only_future = AppData {
            dreams: vec![dream_on(date(2026, 5, 1), true, "")],
            goals: GoalStore::default(),
        };
        let stats = build_lifetime_stats_at(today, &only_future);
        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.days_with_entries, 0);
        assert_eq!(stats.recall_rate, 0.0);
        assert!(stats.start_date.is_none());
    }

    #[test]
    fn empty_journal_is_zeroed() {
        let stats = build_lifetime_stats_at(date(2026, 4, 2), &AppData::default());
        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.recall_rate, 0.0);
        assert_eq!(stats.pie_chart.lucid_degrees, 0.0);
        assert_eq!(stats.goals.completion_rate, 0.0);
        assert!(stats.start_date.is_none());
    }

    #[test]
    fn pie_chart_splits_circle() {
        let pie = pie_chart(1, 4);
        assert_eq!(pie.lucid_degrees, 90.0);
        assert_eq!(pie.non_lucid, 3);
        assert_eq!(
            pie.gradient,
            "conic-gradient(#8b5cf6 0deg 90deg, #334155 90deg 360deg)"
        );
    }
}
