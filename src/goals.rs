//! Goal lifecycle: creation, edits, completion, reactivation, manual progress
//! and deletion, applied to an explicit [`GoalStore`].
//!
//! Operations on an unknown id return `None` and leave the store untouched.
//! Validation runs before any mutation, so a rejected draft never leaves a
//! partially edited goal behind.

use crate::models::{Goal, GoalDraft, GoalKind, GoalPeriod, GoalStatus, GoalType};
use crate::pagination::{PageCursors, page_slice};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_ICON_LEN: usize = 2;
pub const MAX_TARGET: i64 = 1000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GoalError {
    #[error("{}", .0.first().map(String::as_str).unwrap_or("Invalid goal"))]
    Validation(Vec<String>),
    #[error("Only custom goals track progress manually")]
    NotManual,
}

/// Collects every form rule the draft breaks, in display order.
pub fn validate(draft: &GoalDraft) -> Result<(), GoalError> {
    let mut errors = Vec::new();

    let title = draft.title.trim();
    if title.is_empty() {
        errors.push("Title is required".to_string());
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.push(format!("Title cannot exceed {MAX_TITLE_LEN} characters"));
    }
    if draft.description.trim().chars().count() > MAX_DESCRIPTION_LEN {
        errors.push(format!("Description cannot exceed {MAX_DESCRIPTION_LEN} characters"));
    }
    if draft.icon.trim().chars().count() > MAX_ICON_LEN {
        errors.push(format!("Icon cannot exceed {MAX_ICON_LEN} characters"));
    }
    if draft.target < 1 {
        errors.push("Target must be at least 1".to_string());
    } else if draft.target > MAX_TARGET {
        errors.push(format!("Target cannot exceed {MAX_TARGET}"));
    }
    if draft.goal_type == GoalType::LucidCount && draft.period != GoalPeriod::Monthly {
        errors.push("Lucid dream goals must use a monthly period".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(GoalError::Validation(errors))
    }
}

pub fn generate_unique_id(title: &str, created_at: DateTime<Utc>, goal_type: GoalType) -> String {
    let mut hasher = DefaultHasher::new();
    title.hash(&mut hasher);
    goal_type.hash(&mut hasher);
    created_at.timestamp_subsec_nanos().hash(&mut hasher);
    format!(
        "goal_{}_{:08x}",
        created_at.timestamp_millis(),
        hasher.finish() as u32
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalList {
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Up,
    Down,
}

/// The goal list plus the page cursors used to browse it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalStore {
    goals: Vec<Goal>,
    #[serde(skip)]
    cursors: PageCursors,
}

impl GoalStore {
    pub fn new(goals: Vec<Goal>) -> Self {
        Self {
            goals,
            cursors: PageCursors::default(),
        }
    }

    pub fn as_slice(&self) -> &[Goal] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    pub fn active(&self) -> Vec<&Goal> {
        self.goals.iter().filter(|goal| goal.is_active()).collect()
    }

    pub fn completed(&self) -> Vec<&Goal> {
        self.goals.iter().filter(|goal| !goal.is_active()).collect()
    }

    pub fn cursors(&self) -> PageCursors {
        self.cursors
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.cursors.page_size = page_size.max(1);
        self.clamp_cursors();
    }

    /// Carries cursors over to a freshly loaded copy of the same store.
    pub fn restore_cursors(&mut self, cursors: PageCursors) {
        self.cursors = cursors;
        self.clamp_cursors();
    }

    pub fn set_page(&mut self, list: GoalList, page: usize) {
        match list {
            GoalList::Active => self.cursors.active = page,
            GoalList::Completed => self.cursors.completed = page,
        }
        self.clamp_cursors();
    }

    /// Goals on the current page of `list`.
    pub fn page(&self, list: GoalList) -> Vec<&Goal> {
        let (goals, page) = match list {
            GoalList::Active => (self.active(), self.cursors.active),
            GoalList::Completed => (self.completed(), self.cursors.completed),
        };
        page_slice(&goals, page, self.cursors.page_size).to_vec()
    }

    fn clamp_cursors(&mut self) {
        let active = self.goals.iter().filter(|goal| goal.is_active()).count();
        let completed = self.goals.len() - active;
        self.cursors.clamp(active, completed);
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.goals.iter().position(|goal| goal.id == id)
    }

    pub fn create(&mut self, draft: &GoalDraft, now: DateTime<Utc>) -> Result<&Goal, GoalError> {
        validate(draft)?;

        let title = draft.title.trim().to_string();
        let base = generate_unique_id(&title, now, draft.goal_type);
        let mut id = base.clone();
        let mut suffix = 1;
        while self.position(&id).is_some() {
            suffix += 1;
            id = format!("{base}-{suffix}");
        }

        self.goals.push(Goal {
            id,
            title,
            description: draft.description.trim().to_string(),
            icon: draft.icon.trim().to_string(),
            kind: GoalKind::new(draft.goal_type),
            period: draft.period,
            target: draft_target(draft),
            status: GoalStatus::Active,
            created_at: now,
            updated_at: None,
            last_updated: None,
            reactivated_at: None,
        });
        self.clamp_cursors();

        let index = self.goals.len() - 1;
        Ok(&self.goals[index])
    }

    pub fn update(
        &mut self,
        id: &str,
        draft: &GoalDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<&Goal>, GoalError> {
        validate(draft)?;
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let target = draft_target(draft);
        let goal = &mut self.goals[index];
        goal.title = draft.title.trim().to_string();
        goal.description = draft.description.trim().to_string();
        goal.icon = draft.icon.trim().to_string();
        goal.period = draft.period;
        goal.target = target;
        goal.kind = match (&goal.kind, draft.goal_type) {
            (GoalKind::Custom { current_progress }, GoalType::Custom) => GoalKind::Custom {
                current_progress: (*current_progress).min(target),
            },
            (_, goal_type) => GoalKind::new(goal_type),
        };
        goal.updated_at = Some(now);

        Ok(Some(&self.goals[index]))
    }

    pub fn delete(&mut self, id: &str) -> Option<Goal> {
        let index = self.position(id)?;
        let removed = self.goals.remove(index);
        self.clamp_cursors();
        Some(removed)
    }

    pub fn complete(&mut self, id: &str, now: DateTime<Utc>) -> Option<&Goal> {
        let index = self.position(id)?;
        if self.goals[index].is_active() {
            self.goals[index].status = GoalStatus::Completed { completed_at: now };
            self.clamp_cursors();
        }
        Some(&self.goals[index])
    }

    pub fn reactivate(&mut self, id: &str, now: DateTime<Utc>) -> Option<&Goal> {
        let index = self.position(id)?;
        if !self.goals[index].is_active() {
            let goal = &mut self.goals[index];
            goal.status = GoalStatus::Active;
            goal.reactivated_at = Some(now);
            self.clamp_cursors();
        }
        Some(&self.goals[index])
    }

    pub fn increment_progress(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<&Goal>, GoalError> {
        self.step_progress(id, Step::Up, now)
    }

    pub fn decrement_progress(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<&Goal>, GoalError> {
        self.step_progress(id, Step::Down, now)
    }

    fn step_progress(
        &mut self,
        id: &str,
        step: Step,
        now: DateTime<Utc>,
    ) -> Result<Option<&Goal>, GoalError> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        let goal = &mut self.goals[index];
        let target = goal.target;
        let GoalKind::Custom { current_progress } = &mut goal.kind else {
            return Err(GoalError::NotManual);
        };

        *current_progress = match step {
            Step::Up => current_progress.saturating_add(1).min(target),
            Step::Down => current_progress.saturating_sub(1),
        };
        goal.last_updated = Some(now);

        Ok(Some(&self.goals[index]))
    }
}

fn draft_target(draft: &GoalDraft) -> u32 {
    u32::try_from(draft.target.clamp(1, MAX_TARGET)).unwrap_or(1)
}
