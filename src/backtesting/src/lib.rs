pub mod core;
pub mod error;
pub mod models;
pub mod report;

pub use core::simulate_long_flat;
pub use error::BacktestError;
pub use models::{BacktestSummary, Position, TradeLog};
pub use report::{generate_json_report, write_text_report};
