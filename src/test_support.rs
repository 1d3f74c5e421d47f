//! Fixtures shared by the unit test modules.

use crate::models::{Dream, DreamSigns, Goal, GoalKind, GoalPeriod, GoalStatus};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Local noon on `date`, so the entry never drifts across a day boundary.
pub fn noon(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_hms_opt(12, 0, 0).expect("valid time");
    Local
        .from_local_datetime(&naive)
        .earliest()
        .expect("local noon exists")
        .with_timezone(&Utc)
}

pub fn dream_on(date: NaiveDate, lucid: bool, signs: &str) -> Dream {
    Dream {
        timestamp: noon(date),
        is_lucid: lucid,
        dream_signs: DreamSigns::Text(signs.to_string()),
    }
}

pub fn goal(id: &str, kind: GoalKind, period: GoalPeriod, target: u32, created: NaiveDate) -> Goal {
    Goal {
        id: id.to_string(),
        title: format!("Goal {id}"),
        description: String::new(),
        icon: String::new(),
        kind,
        period,
        target,
        status: GoalStatus::Active,
        created_at: noon(created),
        updated_at: None,
        last_updated: None,
        reactivated_at: None,
    }
}

pub fn completed(mut goal: Goal, on: NaiveDate) -> Goal {
    goal.status = GoalStatus::Completed {
        completed_at: noon(on),
    };
    goal
}
