use crate::errors::AppError;
use crate::models::AppData;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, warn};

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/journal.json"))
}

/// Reads the journal. A missing file is an empty journal; an unreadable or
/// malformed one is logged and replaced by an empty journal.
pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

/// Re-reads the journal after a write, keeping the in-memory page cursors.
pub async fn reload_data(path: &Path, previous: &AppData) -> AppData {
    let mut data = load_data(path).await;
    if data.goals.len() != previous.goals.len() || data.dreams.len() != previous.dreams.len() {
        warn!(
            goals = data.goals.len(),
            dreams = data.dreams.len(),
            "reloaded journal differs from the saved copy"
        );
    }
    data.goals.restore_cursors(previous.goals.cursors());
    data
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
