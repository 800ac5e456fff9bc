pub mod backtest;
pub mod config;
pub mod features;
pub mod outlook;
pub mod pipeline;
pub mod report;
pub mod training;

pub use backtest::{run_backtest, write_backtest_results};
pub use config::{Args, Config};
pub use features::{FEATURE_COLUMNS, FeatureRow, FeatureTable, build_features};
pub use outlook::{MarketOutlook, MarketTrend, VolatilityGauge, analyze_outlook};
pub use pipeline::{PipelineOutcome, run_pipeline};
pub use report::{ReportData, render_report, write_report, write_report_json};
pub use training::{TrainingMetrics, TrainingResult, train_direction_model};
