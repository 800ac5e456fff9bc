use market_pulse::core::io::{DataSplit, split_at_cutoff};
use market_pulse::models::{Classifier, ForestConfig, RandomForest, accuracy};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::features::FeatureTable;

/// Minimum training rows, beyond the test window, before the fit is trusted
pub const MIN_TRAIN_ROWS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    pub train_size: usize,
    pub test_size: usize,
}

/// Result of model training
#[derive(Debug, Clone)]
pub struct TrainingResult {
    /// Fitted direction classifier
    pub model: RandomForest,
    pub metrics: TrainingMetrics,
    /// Split the metrics refer to; the backtest replays `split.test`
    pub split: DataSplit,
}

/// Fit a random forest on all but the trailing `test_days` rows and score it
/// on both partitions.
///
/// A table shorter than `test_days + 100` rows is still used, with a warning.
/// Returns `None` when nothing is left to train on.
pub fn train_direction_model(
    table: &FeatureTable,
    test_days: usize,
    forest: ForestConfig,
) -> Option<TrainingResult> {
    let wanted = test_days.saturating_add(MIN_TRAIN_ROWS);
    if table.len() < wanted {
        warn!(
            rows = table.len(),
            "Not enough data for reliable training (want at least {wanted})"
        );
    }

    let split = split_at_cutoff(table.len(), test_days);
    if split.train.is_empty() {
        warn!(rows = table.len(), test_days, "No training rows; skipping model");
        return None;
    }

    let n_vars = table.n_vars();
    let train_x = table.matrix(split.train.clone());
    let train_y = table.labels(split.train.clone());
    let test_x = table.matrix(split.test.clone());
    let test_y = table.labels(split.test.clone());

    let mut model = RandomForest::new(forest);
    if let Err(e) = model.fit(&train_x, &train_y, n_vars) {
        warn!("Model training failed: {e}");
        return None;
    }

    let metrics = TrainingMetrics {
        train_accuracy: accuracy(&model.predict(&train_x, n_vars), &train_y),
        test_accuracy: accuracy(&model.predict(&test_x, n_vars), &test_y),
        train_size: split.train_len(),
        test_size: split.test_len(),
    };

    info!(
        train_accuracy = metrics.train_accuracy,
        test_accuracy = metrics.test_accuracy,
        train_size = metrics.train_size,
        test_size = metrics.test_size,
        trees = model.config().n_trees,
        max_depth = model.config().max_depth,
        "direction model trained"
    );

    Some(TrainingResult {
        model,
        metrics,
        split,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureRow;
    use chrono::{Days, NaiveDate};

    fn table(n: usize) -> FeatureTable {
        let start = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let rows: Vec<FeatureRow> = (0..n)
            .map(|i| {
                let t = i as f64;
                let rsi = 50.0 + 30.0 * (t * 0.3).sin();
                FeatureRow {
                    date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                    open: 100.0,
                    high: 101.0,
                    low: 99.0,
                    close: 100.0 + t * 0.01,
                    volume: 1e6,
                    rsi_14: rsi,
                    macd: 0.1,
                    macd_signal: 0.05,
                    sma_50: 100.0,
                    sma_200: 99.0,
                    bb_upper: 102.0,
                    bb_lower: 98.0,
                    atr_14: 1.5,
                    target: Some(u8::from(rsi > 50.0)),
                }
            })
            .collect();
        FeatureTable::from(rows)
    }

    fn small_forest() -> ForestConfig {
        ForestConfig {
            n_trees: 20,
            max_depth: 4,
            seed: 42,
        }
    }

    #[test]
    fn test_split_sizes() {
        let result = train_direction_model(&table(300), 60, small_forest()).unwrap();
        assert_eq!(result.metrics.train_size, 240);
        assert_eq!(result.metrics.test_size, 60);
        assert_eq!(result.split.cutoff, 240);
    }

    #[test]
    fn test_learns_rsi_rule() {
        let result = train_direction_model(&table(300), 60, small_forest()).unwrap();
        assert!(result.metrics.train_accuracy > 0.9);
        assert!(result.metrics.test_accuracy > 0.8);
    }

    #[test]
    fn test_short_table_still_trains() {
        let result = train_direction_model(&table(50), 20, small_forest()).unwrap();
        assert_eq!(result.metrics.train_size, 30);
    }

    #[test]
    fn test_no_training_rows() {
        assert!(train_direction_model(&table(40), 60, small_forest()).is_none());
        assert!(train_direction_model(&FeatureTable::default(), 10, small_forest()).is_none());
    }

    #[test]
    fn test_huge_test_window_does_not_overflow() {
        assert!(train_direction_model(&table(40), usize::MAX, small_forest()).is_none());
    }

    #[test]
    fn test_model_keeps_forest_config() {
        let result = train_direction_model(&table(120), 20, small_forest()).unwrap();
        assert_eq!(*result.model.config(), small_forest());
        assert_eq!(result.model.n_trees(), 20);
    }
}
