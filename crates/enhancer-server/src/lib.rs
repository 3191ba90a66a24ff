pub mod error;
pub mod handlers;
pub mod history;
pub mod logging;
pub mod server;
pub mod state;

pub use error::AppError;
pub use history::{HistoryEntry, HistoryStore};
pub use server::{app_config, run_server};
pub use state::AppState;
