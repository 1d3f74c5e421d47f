pub mod app;
pub mod config;
pub mod dates;
pub mod delete_confirm;
pub mod dream_signs;
pub mod errors;
pub mod goal_stats;
pub mod goals;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod progress;
pub mod state;
pub mod stats;
pub mod storage;
pub mod streak;

#[cfg(test)]
mod test_support;

pub use app::router;
pub use config::Config;
pub use goals::GoalStore;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
