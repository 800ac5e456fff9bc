use chrono::NaiveDate;
use indicators::{MacdConfig, average_true_range, bollinger_bands, macd, moving_average, rsi};
use market_pulse::core::io::{OhlcData, PriceBar, compute_direction_labels};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, warn};

pub const RSI_PERIOD: usize = 14;
pub const SMA_SHORT: usize = 50;
pub const SMA_LONG: usize = 200;
pub const BB_PERIOD: usize = 20;
pub const BB_STD_DEV: f64 = 2.0;
pub const ATR_PERIOD: usize = 14;

/// Model input columns, in matrix order
pub const FEATURE_COLUMNS: [&str; 13] = [
    "RSI_14",
    "MACD",
    "MACD_signal",
    "SMA_50",
    "SMA_200",
    "BB_upper",
    "BB_lower",
    "ATR_14",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
];

/// One trading day with its indicators and next-day direction label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub rsi_14: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub sma_50: f64,
    pub sma_200: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    pub atr_14: f64,
    /// 1 when the next close is above this close; `None` for the newest bar
    pub target: Option<u8>,
}

impl FeatureRow {
    /// Values in `FEATURE_COLUMNS` order
    pub fn features(&self) -> [f64; 13] {
        [
            self.rsi_14,
            self.macd,
            self.macd_signal,
            self.sma_50,
            self.sma_200,
            self.bb_upper,
            self.bb_lower,
            self.atr_14,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        ]
    }

    fn indicators_defined(&self) -> bool {
        self.features().iter().all(|v| v.is_finite())
    }
}

/// Chronologically ordered feature rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    /// Labeled rows, used for training and backtesting
    rows: Vec<FeatureRow>,
    /// Newest bar, whose next close is not known yet
    latest: Option<FeatureRow>,
}

impl FeatureTable {
    pub fn n_vars(&self) -> usize {
        FEATURE_COLUMNS.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// The newest bar with every indicator defined. It carries no label and is
    /// the row the next-session call is made from.
    pub fn latest_unlabeled(&self) -> Option<&FeatureRow> {
        self.latest.as_ref()
    }

    /// Row-major feature matrix for `range`: `n_vars` values per row
    pub fn matrix(&self, range: Range<usize>) -> Vec<f64> {
        self.rows[range]
            .iter()
            .flat_map(|row| row.features())
            .collect()
    }

    pub fn labels(&self, range: Range<usize>) -> Vec<u8> {
        self.rows[range]
            .iter()
            .map(|row| row.target.unwrap_or(0))
            .collect()
    }

    pub fn closes(&self, range: Range<usize>) -> Vec<f64> {
        self.rows[range].iter().map(|row| row.close).collect()
    }
}

impl From<Vec<FeatureRow>> for FeatureTable {
    fn from(rows: Vec<FeatureRow>) -> Self {
        Self { rows, latest: None }
    }
}

/// Derive indicator features and next-day labels from daily bars.
///
/// Indicators use fixed parameters: RSI 14, MACD 12/26/9, SMA 50 and 200,
/// Bollinger 20 with 2 standard deviations, ATR 14. The final bar has no next
/// close, so it is kept apart from the labeled rows as
/// [`FeatureTable::latest_unlabeled`]. Every row where any indicator is still
/// undefined is dropped. With fewer than about 200 bars the table is empty.
///
/// # Arguments
/// * `bars` - Daily bars, oldest first
///
/// # Returns
/// FeatureTable, possibly empty
pub fn build_features(bars: &[PriceBar]) -> FeatureTable {
    if bars.is_empty() {
        warn!("No price bars; feature table is empty");
        return FeatureTable::default();
    }

    let ohlc = OhlcData::from_bars(bars);
    let rsi_14 = rsi(&ohlc.close, RSI_PERIOD);
    let macd_out = macd(&ohlc.close, MacdConfig::default());
    let sma_50 = moving_average(&ohlc.close, SMA_SHORT);
    let sma_200 = moving_average(&ohlc.close, SMA_LONG);
    let bands = bollinger_bands(&ohlc.close, BB_PERIOD, BB_STD_DEV);
    let atr_14 = average_true_range(&ohlc.high, &ohlc.low, &ohlc.close, ATR_PERIOD);
    let labels = compute_direction_labels(&ohlc.close);

    let mut rows: Vec<FeatureRow> = bars
        .iter()
        .enumerate()
        .filter_map(|(i, bar)| {
            let row = FeatureRow {
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                rsi_14: rsi_14[i],
                macd: macd_out.macd_line[i],
                macd_signal: macd_out.signal_line[i],
                sma_50: sma_50[i],
                sma_200: sma_200[i],
                bb_upper: bands.upper_band[i],
                bb_lower: bands.lower_band[i],
                atr_14: atr_14[i],
                target: labels[i],
            };
            row.indicators_defined().then_some(row)
        })
        .collect();

    let latest = match rows.last() {
        Some(row) if row.target.is_none() => rows.pop(),
        _ => None,
    };

    if rows.is_empty() {
        warn!(
            bars = bars.len(),
            "No rows with every indicator defined; need more than {SMA_LONG} bars"
        );
    } else {
        debug!(bars = bars.len(), rows = rows.len(), "built feature table");
    }

    FeatureTable { rows, latest }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn synthetic_bars(n: usize) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                let t = i as f64;
                let close = 100.0 + 10.0 * (t * 0.07).sin() + 0.05 * t;
                PriceBar {
                    date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.5,
                    close,
                    volume: 1_000_000.0 + 1000.0 * t,
                }
            })
            .collect()
    }

    #[test]
    fn test_rows_fully_defined() {
        let bars = synthetic_bars(300);
        let table = build_features(&bars);

        // SMA_200 first defined at index 199, last bar unlabeled
        assert_eq!(table.len(), 300 - 199 - 1);
        assert!(table.rows().iter().all(|r| r.features().iter().all(|v| v.is_finite())));
        assert_eq!(table.rows()[0].date, bars[199].date);
    }

    #[test]
    fn test_latest_unlabeled_is_newest_bar() {
        let bars = synthetic_bars(260);
        let table = build_features(&bars);

        let latest = table.latest_unlabeled().unwrap();
        assert_eq!(latest.date, bars[259].date);
        assert_eq!(latest.target, None);
        assert!(latest.features().iter().all(|v| v.is_finite()));
        assert!(table.rows().iter().all(|r| r.target.is_some()));
        assert_eq!(table.rows().last().unwrap().date, bars[258].date);
    }

    #[test]
    fn test_labels_follow_next_close() {
        let bars = synthetic_bars(260);
        let table = build_features(&bars);

        let offset = 199;
        for (k, row) in table.rows().iter().enumerate() {
            let next = bars[offset + k + 1].close;
            assert_eq!(row.target, Some(u8::from(next > row.close)));
        }
    }

    #[test]
    fn test_matrix_layout() {
        let table = build_features(&synthetic_bars(220));
        let n = table.len();
        let matrix = table.matrix(0..n);

        assert_eq!(matrix.len(), n * table.n_vars());
        let first = table.rows()[0];
        assert_eq!(matrix[0], first.rsi_14);
        assert_eq!(matrix[11], first.close);
        assert_eq!(table.labels(0..n).len(), n);
        assert_eq!(table.closes(1..3), vec![table.rows()[1].close, table.rows()[2].close]);
    }

    #[test]
    fn test_short_history_is_empty() {
        let short = build_features(&synthetic_bars(150));
        assert!(short.is_empty());
        assert!(short.latest_unlabeled().is_none());
        assert!(build_features(&[]).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let bars = synthetic_bars(280);
        assert_eq!(build_features(&bars), build_features(&bars));
    }
}
