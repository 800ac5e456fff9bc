use chrono::NaiveDate;
use finance_tools::{PivotLevels, pivot_points};
use indicators::{average_true_range, moving_average, rsi};
use market_pulse::core::io::{OhlcData, PriceBar};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Volatility-gauge close above which short-term volatility reads as elevated
pub const ELEVATED_VOLATILITY: f64 = 30.0;

/// Long-term trend from the 50/200 day moving averages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketTrend {
    Bullish,
    Bearish,
    Consolidation,
}

impl MarketTrend {
    /// BULLISH when the 50 day average is more than 1% above the 200 day,
    /// BEARISH when more than 1% below, otherwise CONSOLIDATION.
    pub fn classify(sma_50: f64, sma_200: f64) -> Self {
        if sma_50 > sma_200 * 1.01 {
            MarketTrend::Bullish
        } else if sma_50 < sma_200 * 0.99 {
            MarketTrend::Bearish
        } else {
            MarketTrend::Consolidation
        }
    }
}

impl fmt::Display for MarketTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MarketTrend::Bullish => "BULLISH",
            MarketTrend::Bearish => "BEARISH",
            MarketTrend::Consolidation => "CONSOLIDATION",
        };
        f.write_str(label)
    }
}

pub fn rsi_comment(rsi: f64) -> &'static str {
    if rsi < 30.0 {
        "Oversold"
    } else if rsi > 70.0 {
        "Overbought"
    } else {
        "Neutral range"
    }
}

/// Latest close of the volatility symbol and how to read it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityGauge {
    pub symbol: String,
    pub close: f64,
    pub comment: String,
}

impl VolatilityGauge {
    /// Read the gauge from the symbol's bars; no bars gives close 0.0 and "No data".
    pub fn from_bars(symbol: &str, bars: &[PriceBar]) -> Self {
        let (close, comment) = match bars.last() {
            Some(bar) if bar.close > ELEVATED_VOLATILITY => {
                (bar.close, "Elevated short-term volatility")
            }
            Some(bar) => (bar.close, "Moderate short-term volatility"),
            None => (0.0, "No data"),
        };
        Self {
            symbol: symbol.to_string(),
            close,
            comment: comment.to_string(),
        }
    }
}

/// Trend, momentum and key levels as of the latest fully defined bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOutlook {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: f64,
    pub trend: MarketTrend,
    pub sma_50: f64,
    pub sma_200: f64,
    pub rsi_14: f64,
    pub rsi_comment: String,
    pub atr_14: f64,
    pub pivots: PivotLevels,
    pub volatility: VolatilityGauge,
}

/// Classify the current market from daily bars of `symbol`.
///
/// Uses the latest bar where SMA 50, SMA 200, RSI 14 and ATR 14 are all
/// defined; pivot levels come from that bar's high, low and close.
/// Returns `None` when no bar qualifies.
pub fn analyze_outlook(
    symbol: &str,
    bars: &[PriceBar],
    volatility: VolatilityGauge,
) -> Option<MarketOutlook> {
    if bars.is_empty() {
        warn!("No data for {symbol}");
        return None;
    }

    let ohlc = OhlcData::from_bars(bars);
    let sma_50 = moving_average(&ohlc.close, 50);
    let sma_200 = moving_average(&ohlc.close, 200);
    let rsi_14 = rsi(&ohlc.close, 14);
    let atr_14 = average_true_range(&ohlc.high, &ohlc.low, &ohlc.close, 14);

    let Some(i) = (0..bars.len()).rev().find(|&i| {
        sma_50[i].is_finite() && sma_200[i].is_finite() && rsi_14[i].is_finite() && atr_14[i].is_finite()
    }) else {
        warn!(bars = bars.len(), "Not enough {symbol} data after computing indicators");
        return None;
    };

    let bar = &bars[i];
    let Some(pivots) = pivot_points(bar.high, bar.low, bar.close) else {
        warn!("Invalid {symbol} bar on {} for pivot levels", bar.date);
        return None;
    };

    Some(MarketOutlook {
        symbol: symbol.to_string(),
        date: bar.date,
        close: bar.close,
        trend: MarketTrend::classify(sma_50[i], sma_200[i]),
        sma_50: sma_50[i],
        sma_200: sma_200[i],
        rsi_14: rsi_14[i],
        rsi_comment: rsi_comment(rsi_14[i]).to_string(),
        atr_14: atr_14[i],
        pivots,
        volatility,
    })
}
