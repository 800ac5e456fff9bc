use anyhow::{Context, Result};
use backtesting::generate_json_report;
use market_pulse::core::io::PriceSource;
use market_pulse::models::Classifier;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::backtest::{run_backtest, write_backtest_results};
use crate::config::Config;
use crate::features::build_features;
use crate::outlook::{VolatilityGauge, analyze_outlook};
use crate::report::{ReportData, render_report, write_report, write_report_json};
use crate::training::train_direction_model;

pub const REPORT_FILE: &str = "report.txt";
pub const REPORT_JSON_FILE: &str = "report.json";
pub const BACKTEST_FILE: &str = "backtest_results.txt";
pub const BACKTEST_JSON_FILE: &str = "backtest.json";

/// What one run produced and where it was written
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub report: ReportData,
    /// Rendered report text
    pub text: String,
    pub report_path: PathBuf,
    pub report_json_path: PathBuf,
    /// Set when a backtest ran
    pub backtest_path: Option<PathBuf>,
}

/// Fetch, build features, train, backtest, analyze and write the report.
///
/// Missing or short data skips the affected steps with a warning; the report
/// is still written with N/A in their place. Only failures to write outputs
/// are errors.
pub fn run_pipeline<S: PriceSource + ?Sized>(config: &Config, source: &S) -> Result<PipelineOutcome> {
    let market = &config.market;
    let symbol = market.symbol.as_str();

    let bars = source.fetch_daily(symbol, market.training_lookback_days);
    if bars.is_empty() {
        warn!("No data for {symbol}; skipping model and backtest");
    }
    let table = build_features(&bars);
    info!(symbol, bars = bars.len(), rows = table.len(), "feature table ready");

    let training = train_direction_model(&table, config.model.test_days, config.forest());

    let backtest = training.as_ref().and_then(|t| {
        run_backtest(
            &table,
            &t.model,
            config.model.test_days,
            config.backtest.initial_capital,
        )
    });

    let latest = table.latest_unlabeled().copied();
    let next_day_up = match (&training, &latest) {
        (Some(t), Some(row)) => t
            .model
            .predict(&row.features(), table.n_vars())
            .first()
            .map(|&label| label == 1),
        _ => None,
    };

    let outlook_bars = source.fetch_daily(symbol, market.outlook_lookback_days);
    let vol_bars = source.fetch_daily(&market.volatility_symbol, market.outlook_lookback_days);
    let gauge = VolatilityGauge::from_bars(&market.volatility_symbol, &vol_bars);
    let outlook = analyze_outlook(symbol, &outlook_bars, gauge);

    let report = ReportData {
        symbol: symbol.to_string(),
        outlook,
        latest,
        next_day_up,
        training: training.as_ref().map(|t| t.metrics),
        backtest,
    };
    let text = render_report(&report);

    let out_dir = &config.output.output_dir;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let report_path = out_dir.join(REPORT_FILE);
    write_report(&report_path, &text)?;
    let report_json_path = out_dir.join(REPORT_JSON_FILE);
    write_report_json(&report_json_path, &report)?;

    let backtest_path = match &report.backtest {
        Some(summary) => {
            let path = out_dir.join(BACKTEST_FILE);
            write_backtest_results(&path, summary)?;
            generate_json_report(summary, out_dir.join(BACKTEST_JSON_FILE))?;
            Some(path)
        }
        None => None,
    };

    info!("Report written to {}", report_path.display());

    Ok(PipelineOutcome {
        report,
        text,
        report_path,
        report_json_path,
        backtest_path,
    })
}
