use crate::dates::local_date;
use crate::goals::GoalStore;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Reads an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Dream signs as entered: either one comma separated string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DreamSigns {
    Text(String),
    List(Vec<String>),
}

impl Default for DreamSigns {
    fn default() -> Self {
        DreamSigns::Text(String::new())
    }
}

impl DreamSigns {
    /// Trimmed, non-empty entries in their original casing.
    pub fn entries(&self) -> Vec<&str> {
        match self {
            DreamSigns::Text(text) => text
                .split(',')
                .map(str::trim)
                .filter(|sign| !sign.is_empty())
                .collect(),
            DreamSigns::List(items) => items
                .iter()
                .map(|sign| sign.trim())
                .filter(|sign| !sign.is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dream {
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_lucid: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dream_signs: DreamSigns,
}

impl Dream {
    pub fn local_date(&self) -> NaiveDate {
        local_date(self.timestamp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    LucidCount,
    RecallStreak,
    JournalStreak,
    DreamSignsCount,
    Custom,
}

impl GoalType {
    pub fn as_str(self) -> &'static str {
        match self {
            GoalType::LucidCount => "lucid_count",
            GoalType::RecallStreak => "recall_streak",
            GoalType::JournalStreak => "journal_streak",
            GoalType::DreamSignsCount => "dream_signs_count",
            GoalType::Custom => "custom",
        }
    }
}

/// Progress rule of a goal. Only manually tracked goals carry a counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GoalKind {
    LucidCount,
    RecallStreak,
    JournalStreak,
    DreamSignsCount,
    Custom {
        #[serde(
            rename = "currentProgress",
            default,
            deserialize_with = "null_as_default"
        )]
        current_progress: u32,
    },
}

impl GoalKind {
    pub fn new(goal_type: GoalType) -> Self {
        match goal_type {
            GoalType::LucidCount => GoalKind::LucidCount,
            GoalType::RecallStreak => GoalKind::RecallStreak,
            GoalType::JournalStreak => GoalKind::JournalStreak,
            GoalType::DreamSignsCount => GoalKind::DreamSignsCount,
            GoalType::Custom => GoalKind::Custom { current_progress: 0 },
        }
    }

    pub fn goal_type(&self) -> GoalType {
        match self {
            GoalKind::LucidCount => GoalType::LucidCount,
            GoalKind::RecallStreak => GoalType::RecallStreak,
            GoalKind::JournalStreak => GoalType::JournalStreak,
            GoalKind::DreamSignsCount => GoalType::DreamSignsCount,
            GoalKind::Custom { .. } => GoalType::Custom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPeriod {
    Monthly,
    Streak,
    Total,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed {
        #[serde(rename = "completedAt")]
        completed_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(flatten)]
    pub kind: GoalKind,
    pub period: GoalPeriod,
    pub target: u32,
    #[serde(flatten)]
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactivated_at: Option<DateTime<Utc>>,
}

impl Goal {
    pub fn is_active(&self) -> bool {
        matches!(self.status, GoalStatus::Active)
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            GoalStatus::Completed { completed_at } => Some(completed_at),
            GoalStatus::Active => None,
        }
    }
}

/// Persisted journal document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub dreams: Vec<Dream>,
    #[serde(default)]
    pub goals: GoalStore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub current: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamSignStat {
    pub sign: String,
    pub total: u32,
    pub lucid: u32,
    pub lucidity_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoalStatistics {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub completion_rate: f64,
}

/// Create/update form for a goal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub period: GoalPeriod,
    pub target: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDream {
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_lucid: bool,
    #[serde(default)]
    pub dream_signs: DreamSigns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
    Celebration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn celebration(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Celebration,
            text: text.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GoalView {
    pub goal: Goal,
    pub progress: GoalProgress,
    pub percent: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPage {
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub goals: Vec<GoalView>,
}

#[derive(Debug, Serialize)]
pub struct GoalsResponse {
    pub active: GoalPage,
    pub completed: GoalPage,
    pub statistics: GoalStatistics,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub active_page: Option<usize>,
    pub completed_page: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub goal_id: String,
    pub state: crate::delete_confirm::DeleteState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieChart {
    pub lucid: usize,
    pub non_lucid: usize,
    pub lucid_degrees: f64,
    pub gradient: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: String,
    pub dreams: usize,
    pub lucid: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub label: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total_dreams: usize,
    pub lucid_dreams: usize,
    pub days_with_entries: usize,
    pub total_days: i64,
    pub recall_rate: f64,
    pub average_dreams_per_day: f64,
    pub pie_chart: PieChart,
    pub goals: GoalStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<Vec<CalendarDay>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_streak: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCloudEntry {
    pub sign: String,
    pub total: u32,
    pub tier: usize,
    pub font_size: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DreamSignReport {
    pub signs: Vec<DreamSignStat>,
    pub word_cloud: Vec<WordCloudEntry>,
    pub effectiveness: Vec<DreamSignStat>,
}

#[derive(Debug, Deserialize, Default)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct YearQuery {
    pub year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dream_signs_accept_text_or_list() {
        let text: Dream = serde_json::from_str(
            r#"{"timestamp":"2026-03-02T08:00:00Z","isLucid":true,"dreamSigns":"Flying, teeth ,"}"#,
        )
        .unwrap();
        assert_eq!(text.dream_signs.entries(), vec!["Flying", "teeth"]);

        let list: Dream = serde_json::from_str(
            r#"{"timestamp":"2026-03-02T08:00:00Z","dreamSigns":[" Water", ""]}"#,
        )
        .unwrap();
        assert!(!list.is_lucid);
        assert_eq!(list.dream_signs.entries(), vec!["Water"]);
    }

    #[test]
    fn goal_json_keeps_flat_type_and_status_fields() {
        let raw = r#"{
            "id": "goal_1",
            "title": "Ten tallies",
            "type": "custom",
            "currentProgress": 4,
            "period": "total",
            "target": 10,
            "status": "completed",
            "completedAt": "2026-03-05T10:00:00Z",
            "createdAt": "2026-03-01T10:00:00Z"
        }"#;
        let goal: Goal = serde_json::from_str(raw).unwrap();
        assert_eq!(goal.kind, GoalKind::Custom { current_progress: 4 });
        assert!(goal.completed_at().is_some());

        let value = serde_json::to_value(&goal).unwrap();
        assert_eq!(value["type"], "custom");
        assert_eq!(value["currentProgress"], 4);
        assert_eq!(value["status"], "completed");
        assert!(value.get("reactivatedAt").is_none());
    }

    #[test]
    fn active_goal_without_counter() {
        let raw = r#"{
            "id": "goal_2",
            "title": "Recall",
            "type": "recall_streak",
            "period": "streak",
            "target": 7,
            "status": "active",
            "createdAt": "2026-03-01T10:00:00Z"
        }"#;
        let goal: Goal = serde_json::from_str(raw).unwrap();
        assert_eq!(goal.kind, GoalKind::RecallStreak);
        assert!(goal.is_active());

        let value = serde_json::to_value(&goal).unwrap();
        assert!(value.get("currentProgress").is_none());
        assert!(value.get("completedAt").is_none());
    }

    #[test]
    fn null_fields_read_as_defaults() {
        let raw = r#"{
            "dreams": [
                {"timestamp": "2026-03-02T08:00:00Z", "isLucid": null, "dreamSigns": null}
            ],
            "goals": [{
                "id": "goal_3",
                "title": "Tallies",
                "type": "custom",
                "currentProgress": null,
                "period": "total",
                "target": 5,
                "status": "active",
                "createdAt": "2026-03-01T10:00:00Z"
            }]
        }"#;
        let data: AppData = serde_json::from_str(raw).unwrap();
        assert!(!data.dreams[0].is_lucid);
        assert!(data.dreams[0].dream_signs.entries().is_empty());
        assert_eq!(
            data.goals.as_slice()[0].kind,
            GoalKind::Custom { current_progress: 0 }
        );
    }
}
