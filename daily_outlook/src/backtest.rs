use anyhow::{Context, Result};
use backtesting::{BacktestSummary, simulate_long_flat, write_text_report};
use market_pulse::core::io::split_at_cutoff;
use market_pulse::models::Classifier;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{info, warn};

use crate::features::FeatureTable;

/// Replay the model's predictions over the trailing `test_days` rows.
///
/// Uses the same cutoff as training, so the window is exactly the rows the
/// model never saw. Returns `None` when the window is empty or the simulator
/// rejects its input.
///
/// # Arguments
/// * `table` - Feature table the model was trained on
/// * `model` - Fitted direction classifier
/// * `test_days` - Trailing rows to replay
/// * `initial_capital` - Starting capital
pub fn run_backtest<C: Classifier>(
    table: &FeatureTable,
    model: &C,
    test_days: usize,
    initial_capital: f64,
) -> Option<BacktestSummary> {
    let split = split_at_cutoff(table.len(), test_days);
    if split.test.is_empty() {
        warn!("No test data for backtest");
        return None;
    }

    let data = table.matrix(split.test.clone());
    let closes = table.closes(split.test.clone());
    let predictions = model.predict(&data, table.n_vars());

    match simulate_long_flat(&closes, &predictions, initial_capital) {
        Ok(summary) => {
            info!(
                days = closes.len(),
                final_capital = summary.final_capital,
                return_pct = summary.return_pct,
                "backtest finished"
            );
            Some(summary)
        }
        Err(e) => {
            warn!("Backtest skipped: {e}");
            None
        }
    }
}

/// Write backtest results to file
pub fn write_backtest_results<P: AsRef<Path>>(path: P, summary: &BacktestSummary) -> Result<()> {
    let path = path.as_ref();
    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Failed to create backtest file: {}", path.display()))?;

    write_text_report(&mut file, summary)?;

    info!("Backtest results written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureRow;
    use chrono::{Days, NaiveDate};
    use market_pulse::models::ModelError;

    /// Predicts a fixed label for every case
    struct Constant(u8);

    impl Classifier for Constant {
        fn fit(&mut self, _: &[f64], _: &[u8], _: usize) -> Result<(), ModelError> {
            Ok(())
        }

        fn predict(&self, data: &[f64], n_vars: usize) -> Vec<u8> {
            vec![self.0; data.len() / n_vars]
        }
    }

    fn table(closes: &[f64]) -> FeatureTable {
        let start = NaiveDate::from_ymd_opt(2022, 6, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| FeatureRow {
                date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1e6,
                rsi_14: 50.0,
                macd: 0.0,
                macd_signal: 0.0,
                sma_50: close,
                sma_200: close,
                bb_upper: close + 2.0,
                bb_lower: close - 2.0,
                atr_14: 1.0,
                target: Some(0),
            })
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_backtest_uses_trailing_window() {
        // Only the last three closes are replayed: 100 shares from 10 to 13
        let t = table(&[50.0, 40.0, 10.0, 12.0, 13.0]);
        let summary = run_backtest(&t, &Constant(1), 3, 1_000.0).unwrap();

        assert!((summary.final_capital - 1_300.0).abs() < 1e-9);
        assert_eq!(summary.daily_pnl.len(), 3);
    }

    #[test]
    fn test_flat_model_keeps_capital() {
        let t = table(&[10.0, 11.0, 9.0, 14.0]);
        let summary = run_backtest(&t, &Constant(0), 4, 5_000.0).unwrap();
        assert_eq!(summary.final_capital, 5_000.0);
    }

    #[test]
    fn test_empty_window() {
        assert!(run_backtest(&FeatureTable::default(), &Constant(1), 10, 1_000.0).is_none());
    }

    #[test]
    fn test_write_backtest_results() {
        let t = table(&[10.0, 12.0, 11.0]);
        let summary = run_backtest(&t, &Constant(1), 3, 100.0).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("backtest_results.txt");
        write_backtest_results(&path, &summary).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Backtest Results"));
        assert!(content.contains("Final Capital: $110.00"));
    }
}
