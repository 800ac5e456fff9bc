use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::DataError;

/// One daily OHLCV bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Column view of a bar sequence
#[derive(Debug, Clone, Default)]
pub struct OhlcData {
    pub date: Vec<NaiveDate>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

impl OhlcData {
    pub fn from_bars(bars: &[PriceBar]) -> Self {
        let mut data = OhlcData {
            date: Vec::with_capacity(bars.len()),
            open: Vec::with_capacity(bars.len()),
            high: Vec::with_capacity(bars.len()),
            low: Vec::with_capacity(bars.len()),
            close: Vec::with_capacity(bars.len()),
            volume: Vec::with_capacity(bars.len()),
        };
        for bar in bars {
            data.date.push(bar.date);
            data.open.push(bar.open);
            data.high.push(bar.high);
            data.low.push(bar.low);
            data.close.push(bar.close);
            data.volume.push(bar.volume);
        }
        data
    }

    /// Get the number of bars
    pub fn len(&self) -> usize {
        self.close.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

/// Supplier of daily bars for a symbol.
///
/// Implementations return an ordered, de-duplicated sequence covering roughly
/// `lookback_days` calendar days. Failures are reported as an empty sequence;
/// callers treat that as "nothing to do", not as an error.
pub trait PriceSource {
    fn fetch_daily(&self, symbol: &str, lookback_days: u32) -> Vec<PriceBar>;
}

/// Price source backed by one history file per symbol
/// (`<data_dir>/<symbol lowercased>.txt`).
#[derive(Debug, Clone)]
pub struct FilePriceSource {
    data_dir: PathBuf,
}

impl FilePriceSource {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{}.txt", symbol.to_lowercase()))
    }
}

impl PriceSource for FilePriceSource {
    fn fetch_daily(&self, symbol: &str, lookback_days: u32) -> Vec<PriceBar> {
        let path = self.path_for(symbol);
        match read_bar_file(&path) {
            Ok(bars) => {
                let bars = trim_to_lookback(normalize_bars(bars), lookback_days);
                debug!(symbol, bars = bars.len(), "loaded daily bars from {}", path.display());
                bars
            }
            Err(e) => {
                warn!("Failed to fetch data for {symbol}: {e}");
                Vec::new()
            }
        }
    }
}

/// Sort bars by date and collapse duplicate dates, keeping the last bar seen
/// for a given day.
pub fn normalize_bars(mut bars: Vec<PriceBar>) -> Vec<PriceBar> {
    bars.sort_by_key(|bar| bar.date);

    let mut out: Vec<PriceBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => out.push(bar),
        }
    }
    out
}

/// Keep bars dated within `lookback_days` of the newest bar. Expects sorted input.
pub fn trim_to_lookback(bars: Vec<PriceBar>, lookback_days: u32) -> Vec<PriceBar> {
    let Some(newest) = bars.last().map(|bar| bar.date) else {
        return bars;
    };
    let Some(start) = newest.checked_sub_days(Days::new(u64::from(lookback_days))) else {
        return bars;
    };
    bars.into_iter().filter(|bar| bar.date >= start).collect()
}

/// Read market data file with OHLCV format (YYYYMMDD Open High Low Close [Volume])
///
/// Fields may be separated by spaces, tabs or commas. A missing volume column
/// reads as zero volume.
pub fn read_bar_file<P: AsRef<Path>>(filename: P) -> Result<Vec<PriceBar>, DataError> {
    let file = File::open(filename.as_ref()).map_err(|source| DataError::Open {
        path: filename.as_ref().display().to_string(),
        source,
    })?;

    let reader = BufReader::new(file);
    let mut bars = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line_no = line_num + 1;
        let line = line_result.map_err(|source| DataError::Read {
            line: line_no,
            source,
        })?;

        if line.trim().is_empty() {
            continue;
        }

        let parse_err = |field| DataError::Parse {
            field,
            line: line_no,
        };

        // Parse the date (first 8 characters)
        let date_str = line.get(..8).ok_or(parse_err("date"))?;
        if !date_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(parse_err("date"));
        }
        let date =
            NaiveDate::parse_from_str(date_str, "%Y%m%d").map_err(|_| parse_err("date"))?;

        let parts: Vec<&str> = line[8..]
            .split([' ', '\t', ','])
            .filter(|s| !s.is_empty())
            .collect();

        if parts.len() < 4 {
            return Err(parse_err("price data"));
        }

        let field = |idx: usize, name: &'static str| -> Result<f64, DataError> {
            parts[idx].parse::<f64>().map_err(|_| parse_err(name))
        };
        let o = field(0, "open price")?;
        let h = field(1, "high price")?;
        let l = field(2, "low price")?;
        let c = field(3, "close price")?;
        let v = if parts.len() > 4 { field(4, "volume")? } else { 0.0 };

        if o <= 0.0 || h <= 0.0 || l <= 0.0 || c <= 0.0 {
            return Err(DataError::NonPositivePrice { line: line_no });
        }

        if l > o || l > c || h < o || h < c {
            return Err(DataError::InvalidOhlc { line: line_no });
        }

        bars.push(PriceBar {
            date,
            open: o,
            high: h,
            low: l,
            close: c,
            volume: v,
        });
    }

    if bars.is_empty() {
        return Err(DataError::Empty);
    }

    Ok(bars)
}
