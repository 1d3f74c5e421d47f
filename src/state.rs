use crate::delete_confirm::DeleteConfirmations;
use crate::models::AppData;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub deletes: DeleteConfirmations,
    /// Held across a confirmed delete's save-then-reload.
    pub delete_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData, delete_timeout: Duration) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            deletes: DeleteConfirmations::new(delete_timeout),
            delete_lock: Arc::new(Mutex::new(())),
        }
    }
}
