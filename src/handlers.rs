use crate::dates;
use crate::delete_confirm::DeleteState;
use crate::dream_signs::{analyze, effectiveness, word_cloud};
use crate::errors::AppError;
use crate::goal_stats::lifetime_goal_statistics;
use crate::goals::{GoalError, GoalList};
use crate::models::{
    AppData, DeleteResponse, Dream, DreamSignReport, GoalDraft, GoalKind, GoalPage, GoalView,
    GoalsResponse, MonthQuery, NewDream, Notice, PageQuery, PeriodStats, YearQuery,
};
use crate::pagination::total_pages;
use crate::progress::{evaluate_progress_at, percent_complete};
use crate::state::AppState;
use crate::stats::{build_lifetime_stats, build_monthly_stats, build_yearly_stats};
use crate::storage::{persist_data, reload_data};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Datelike, Utc};
use tracing::info;

pub async fn list_dreams(State(state): State<AppState>) -> Json<Vec<Dream>> {
    let data = state.data.lock().await;
    Json(data.dreams.clone())
}

pub async fn add_dream(
    State(state): State<AppState>,
    Json(payload): Json<NewDream>,
) -> Result<Json<Dream>, AppError> {
    let dream = Dream {
        timestamp: payload.timestamp.unwrap_or_else(Utc::now),
        is_lucid: payload.is_lucid,
        dream_signs: payload.dream_signs,
    };

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    next.dreams.push(dream.clone());
    persist_data(&state.data_path, &next).await?;
    *data = next;

    Ok(Json(dream))
}

pub async fn list_goals(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<GoalsResponse> {
    let mut data = state.data.lock().await;
    if let Some(page) = query.active_page {
        data.goals.set_page(GoalList::Active, page);
    }
    if let Some(page) = query.completed_page {
        data.goals.set_page(GoalList::Completed, page);
    }
    Json(goals_response(&data, Vec::new()))
}

pub async fn create_goal(
    State(state): State<AppState>,
    Json(draft): Json<GoalDraft>,
) -> Result<Json<GoalsResponse>, AppError> {
    let response = commit_goals(&state, |data, now| {
        let goal = data.goals.create(&draft, now)?;
        info!(goal_id = %goal.id, goal_type = goal.kind.goal_type().as_str(), "created goal");
        Ok(Some(vec![Notice::success(format!("Goal \"{}\" created", goal.title))]))
    })
    .await?;
    Ok(Json(response))
}

pub async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<GoalDraft>,
) -> Result<Json<GoalsResponse>, AppError> {
    let response = commit_goals(&state, |data, now| {
        Ok(data
            .goals
            .update(&id, &draft, now)?
            .map(|goal| vec![Notice::success(format!("Goal \"{}\" updated", goal.title))]))
    })
    .await?;
    Ok(Json(response))
}

pub async fn complete_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GoalsResponse>, AppError> {
    let response = commit_goals(&state, |data, now| {
        if !data.goals.get(&id).is_some_and(|goal| goal.is_active()) {
            return Ok(None);
        }
        Ok(data.goals.complete(&id, now).map(|goal| {
            vec![Notice::celebration(format!("Goal \"{}\" completed!", goal.title))]
        }))
    })
    .await?;
    Ok(Json(response))
}

pub async fn reactivate_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GoalsResponse>, AppError> {
    let response = commit_goals(&state, |data, now| {
        if data.goals.get(&id).is_none_or(|goal| goal.is_active()) {
            return Ok(None);
        }
        Ok(data
            .goals
            .reactivate(&id, now)
            .map(|goal| vec![Notice::success(format!("Goal \"{}\" reactivated", goal.title))]))
    })
    .await?;
    Ok(Json(response))
}

pub async fn increment_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GoalsResponse>, AppError> {
    let response = commit_goals(&state, |data, now| {
        Ok(data.goals.increment_progress(&id, now)?.map(|goal| {
            match goal.kind {
                GoalKind::Custom { current_progress } if current_progress >= goal.target => {
                    vec![Notice::celebration(format!(
                        "Target reached for \"{}\"!",
                        goal.title
                    ))]
                }
                _ => Vec::new(),
            }
        }))
    })
    .await?;
    Ok(Json(response))
}

pub async fn decrement_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GoalsResponse>, AppError> {
    let response = commit_goals(&state, |data, now| {
        Ok(data.goals.decrement_progress(&id, now)?.map(|_| Vec::new()))
    })
    .await?;
    Ok(Json(response))
}

pub async fn request_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<DeleteResponse> {
    let exists = state.data.lock().await.goals.get(&id).is_some();
    let delete_state = if exists {
        state.deletes.request(&id).await
    } else {
        DeleteState::Idle
    };
    Json(DeleteResponse {
        goal_id: id,
        state: delete_state,
    })
}

pub async fn cancel_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<DeleteResponse> {
    let delete_state = state.deletes.cancel(&id).await;
    Json(DeleteResponse {
        goal_id: id,
        state: delete_state,
    })
}

pub async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GoalsResponse>, AppError> {
    let _serialized = state.delete_lock.lock().await;

    if state.deletes.confirm(&id).await != DeleteState::Confirmed {
        return Err(AppError::conflict(
            "Delete was not requested or has expired",
        ));
    }

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let Some(removed) = next.goals.delete(&id) else {
        state.deletes.forget(&id).await;
        return Ok(Json(goals_response(&data, Vec::new())));
    };

    let saved = persist_data(&state.data_path, &next).await;
    state.deletes.forget(&id).await;
    saved?;
    *data = reload_data(&state.data_path, &next).await;
    info!(goal_id = %removed.id, "deleted goal");

    let notices = vec![Notice::success(format!("Goal \"{}\" deleted", removed.title))];
    Ok(Json(goals_response(&data, notices)))
}

pub async fn monthly_stats(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<PeriodStats>, AppError> {
    let today = dates::today();
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());
    let data = state.data.lock().await;
    build_monthly_stats(&data, year, month)
        .map(Json)
        .ok_or_else(|| AppError::bad_request("month must be between 1 and 12"))
}

pub async fn yearly_stats(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<Json<PeriodStats>, AppError> {
    let year = query.year.unwrap_or(dates::today().year());
    let data = state.data.lock().await;
    build_yearly_stats(&data, year)
        .map(Json)
        .ok_or_else(|| AppError::bad_request("year is out of range"))
}

pub async fn lifetime_stats(State(state): State<AppState>) -> Json<PeriodStats> {
    let data = state.data.lock().await;
    Json(build_lifetime_stats(&data))
}

pub async fn dream_signs(State(state): State<AppState>) -> Json<DreamSignReport> {
    let data = state.data.lock().await;
    let signs = analyze(&data.dreams);
    Json(DreamSignReport {
        word_cloud: word_cloud(&signs),
        effectiveness: effectiveness(&signs),
        signs,
    })
}

/// Applies a goal mutation to a working copy and swaps it in once saved.
///
/// `apply` returns `None` when there was nothing to change, in which case
/// nothing is written and the current view is returned as is.
async fn commit_goals<F>(state: &AppState, apply: F) -> Result<GoalsResponse, AppError>
where
    F: FnOnce(&mut AppData, DateTime<Utc>) -> Result<Option<Vec<Notice>>, GoalError>,
{
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let Some(notices) = apply(&mut next, Utc::now())? else {
        return Ok(goals_response(&data, Vec::new()));
    };

    persist_data(&state.data_path, &next).await?;
    *data = next;
    Ok(goals_response(&data, notices))
}

fn goals_response(data: &AppData, notices: Vec<Notice>) -> GoalsResponse {
    let today = dates::today();
    let cursors = data.goals.cursors();

    let build_page = |list: GoalList, page: usize, total: usize| GoalPage {
        page,
        total_pages: total_pages(total, cursors.page_size),
        total,
        goals: data
            .goals
            .page(list)
            .into_iter()
            .map(|goal| {
                let progress = evaluate_progress_at(today, goal, &data.dreams);
                GoalView {
                    percent: percent_complete(&progress, goal.target),
                    goal: goal.clone(),
                    progress,
                }
            })
            .collect(),
    };

    GoalsResponse {
        active: build_page(GoalList::Active, cursors.active, data.goals.active().len()),
        completed: build_page(
            GoalList::Completed,
            cursors.completed,
            data.goals.completed().len(),
        ),
        statistics: lifetime_goal_statistics(data.goals.as_slice()),
        notices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::GoalStore;
    use crate::models::{GoalKind, GoalPeriod};
    use crate::test_support::{date, goal};
    use axum::http::StatusCode;
    use std::{path::PathBuf, time::Duration};

    fn state_at(dir: &std::path::Path) -> AppState {
        let data = AppData {
            dreams: Vec::new(),
            goals: GoalStore::new(vec![goal(
                "g",
                GoalKind::RecallStreak,
                GoalPeriod::Streak,
                7,
                date(2026, 3, 1),
            )]),
        };
        AppState::new(dir.join("journal.json"), data, Duration::from_secs(30))
    }

    fn temp_dir(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("dream_goals_{}_{name}", std::process::id()));
        dir
    }

    #[tokio::test]
    async fn failed_save_leaves_goal_and_needs_a_new_request() {
        let dir = temp_dir("unsaved_delete");
        let _ = tokio::fs::remove_dir_all(&dir).await;
        let state = state_at(&dir);

        request_delete(State(state.clone()), Path("g".to_string())).await;
        let err = confirm_delete(State(state.clone()), Path("g".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(state.deletes.state("g").await, DeleteState::Idle);
        assert!(state.data.lock().await.goals.get("g").is_some());

        tokio::fs::create_dir_all(&dir).await.unwrap();
        let err = confirm_delete(State(state.clone()), Path("g".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert!(state.data.lock().await.goals.get("g").is_some());

        request_delete(State(state.clone()), Path("g".to_string())).await;
        let Json(response) = confirm_delete(State(state.clone()), Path("g".to_string()))
            .await
            .unwrap();
        assert_eq!(response.active.total, 0);
        assert!(state.data.lock().await.goals.get("g").is_none());
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn confirm_is_single_use() {
        let dir = temp_dir("single_use_delete");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let state = state_at(&dir);

        request_delete(State(state.clone()), Path("g".to_string())).await;
        assert!(confirm_delete(State(state.clone()), Path("g".to_string())).await.is_ok());
        let err = confirm_delete(State(state.clone()), Path("g".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(state.deletes.state("g").await, DeleteState::Idle);
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
