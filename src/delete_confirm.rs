use serde::Serialize;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::info;

pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a goal stands in the two-step delete flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteState {
    Idle,
    PendingDelete,
    Confirmed,
    Reverted,
}

#[derive(Debug)]
enum Slot {
    Pending(JoinHandle<()>),
    Settled(DeleteState),
}

impl Slot {
    fn state(&self) -> DeleteState {
        match self {
            Slot::Pending(_) => DeleteState::PendingDelete,
            Slot::Settled(state) => *state,
        }
    }
}

/// Per-goal delete confirmations. An unconfirmed request reverts on its own
/// once the timeout elapses.
#[derive(Clone)]
pub struct DeleteConfirmations {
    timeout: Duration,
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl DeleteConfirmations {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn state(&self, goal_id: &str) -> DeleteState {
        let slots = self.slots.lock().await;
        slots.get(goal_id).map_or(DeleteState::Idle, Slot::state)
    }

    /// Starts a pending delete. A request for an already pending goal keeps
    /// the original deadline. Settled outcomes of earlier requests are dropped.
    pub async fn request(&self, goal_id: &str) -> DeleteState {
        let mut slots = self.slots.lock().await;
        slots.retain(|_, slot| matches!(slot, Slot::Pending(_)));
        if slots.contains_key(goal_id) {
            return DeleteState::PendingDelete;
        }

        let handle = tokio::spawn(revert_after(
            Arc::clone(&self.slots),
            goal_id.to_string(),
            self.timeout,
        ));
        slots.insert(goal_id.to_string(), Slot::Pending(handle));
        DeleteState::PendingDelete
    }

    /// Confirms a pending delete. Only a goal that is pending right now comes
    /// back `Confirmed`; an expired request reports `Reverted` once.
    pub async fn confirm(&self, goal_id: &str) -> DeleteState {
        self.settle(goal_id, DeleteState::Confirmed).await
    }

    pub async fn cancel(&self, goal_id: &str) -> DeleteState {
        self.settle(goal_id, DeleteState::Reverted).await
    }

    pub async fn forget(&self, goal_id: &str) {
        let mut slots = self.slots.lock().await;
        if let Some(Slot::Pending(handle)) = slots.remove(goal_id) {
            handle.abort();
        }
    }

    async fn settle(&self, goal_id: &str, outcome: DeleteState) -> DeleteState {
        let mut slots = self.slots.lock().await;
        match slots.remove(goal_id) {
            Some(Slot::Pending(handle)) => {
                handle.abort();
                slots.insert(goal_id.to_string(), Slot::Settled(outcome));
                outcome
            }
            Some(Slot::Settled(DeleteState::Reverted)) => DeleteState::Reverted,
            Some(Slot::Settled(_)) | None => DeleteState::Idle,
        }
    }
}

async fn revert_after(slots: Arc<Mutex<HashMap<String, Slot>>>, goal_id: String, timeout: Duration) {
    tokio::time::sleep(timeout).await;
    let mut slots = slots.lock().await;
    if matches!(slots.get(&goal_id), Some(Slot::Pending(_))) {
        info!(goal_id = %goal_id, "delete not confirmed in time, reverting");
        slots.insert(goal_id, Slot::Settled(DeleteState::Reverted));
    }
}
