use crate::delete_confirm::DEFAULT_CONFIRM_TIMEOUT;
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::storage::resolve_data_path;
use std::{env, path::PathBuf, time::Duration};

/// Settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub delete_timeout: Duration,
    pub page_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, std::io::Error> {
        let port = env_number("PORT").unwrap_or(8080);
        let delete_timeout = env_number("DELETE_CONFIRM_SECS")
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CONFIRM_TIMEOUT);
        let page_size = env_number("GOALS_PAGE_SIZE")
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Ok(Self {
            port,
            data_path: resolve_data_path()?,
            delete_timeout,
            page_size,
        })
    }
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse::<T>().ok())
}
