//! Shared data model and models for the daily market pipeline.
//!
//! - `core::io` - price bars, price sources, chronological splits, labels
//! - `models` - the direction classifier seam and its random forest

pub mod core;
pub mod models;
