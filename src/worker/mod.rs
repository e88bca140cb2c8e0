pub mod history_worker;
pub mod quote_worker;

pub use history_worker::run as run_history_worker;
pub use history_worker::{RefreshState, SharedRefreshState};
pub use quote_worker::run as run_quote_worker;
