use anyhow::{Context, Result};
use backtesting::BacktestSummary;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::features::FeatureRow;
use crate::outlook::{MarketOutlook, rsi_comment};
use crate::training::TrainingMetrics;

/// Everything the report describes. Missing pieces render as N/A.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub symbol: String,
    pub outlook: Option<MarketOutlook>,
    /// Newest bar's features; its next close is not known yet
    pub latest: Option<FeatureRow>,
    /// Model's call for the session after `latest`
    pub next_day_up: Option<bool>,
    pub training: Option<TrainingMetrics>,
    pub backtest: Option<BacktestSummary>,
}

const NA: &str = "N/A";

fn momentum(row: &FeatureRow) -> String {
    let (tone, side) = if row.macd > row.macd_signal {
        ("Positive", "above")
    } else {
        ("Negative", "below")
    };
    format!(
        "{tone} (MACD {:.2} {side} signal {:.2})",
        row.macd, row.macd_signal
    )
}

/// "S1 100.00, S2 95.00, S3 90.00"
fn levels(prefix: char, values: [f64; 3]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{prefix}{} {v:.2}", i + 1))
        .collect::<Vec<_>>()
        .join(", ")
}

fn trade_setup(data: &ReportData) -> String {
    let Some(up) = data.next_day_up else {
        return NA.to_string();
    };
    let mut setup = format!(
        "Model leans {} for the next session",
        if up { "LONG" } else { "FLAT" }
    );
    if let Some(m) = &data.training {
        setup.push_str(&format!(" (test accuracy {:.1}%)", m.test_accuracy * 100.0));
    }
    if let Some(b) = &data.backtest {
        setup.push_str(&format!(
            "; backtest return {:.2}% over {} days",
            b.return_pct,
            b.daily_pnl.len()
        ));
    }
    setup
}

/// Render the weekly/daily overview text
pub fn render_report(data: &ReportData) -> String {
    let symbol = &data.symbol;
    let mut lines = vec!["=== Weekly Overview ===".to_string()];

    match &data.outlook {
        Some(o) => {
            lines.push(format!(
                "{symbol} Trend: {} (50 SMA={:.2}, 200 SMA={:.2})",
                o.trend, o.sma_50, o.sma_200
            ));
            lines.push(format!("RSI: {:.2} ({})", o.rsi_14, o.rsi_comment));
            lines.push(format!("Pivot Point: {:.2}", o.pivots.pivot));
            lines.push(format!(
                "Key Levels: Support at {}; Resistance at {}",
                levels('S', o.pivots.supports()),
                levels('R', o.pivots.resistances())
            ));
        }
        None => {
            lines.push(format!("{symbol} Trend: {NA}"));
            lines.push(format!("RSI: {NA} ({NA})"));
            lines.push(format!("Pivot Point: {NA}"));
            lines.push(format!("Key Levels: Support at {NA}; Resistance at {NA}"));
        }
    }

    lines.push(String::new());
    lines.push("=== Daily Overview ===".to_string());
    match &data.latest {
        Some(row) => {
            lines.push(format!("{symbol} Momentum: {}", momentum(row)));
            lines.push(format!("RSI: {:.2} ({})", row.rsi_14, rsi_comment(row.rsi_14)));
        }
        None => {
            lines.push(format!("{symbol} Momentum: {NA}"));
            lines.push(format!("RSI: {NA} ({NA})"));
        }
    }

    let atr = data
        .outlook
        .as_ref()
        .map(|o| o.atr_14)
        .or(data.latest.map(|row| row.atr_14));
    let mut volatility = match atr {
        Some(atr) => format!("ATR={atr:.2}"),
        None => format!("ATR={NA}"),
    };
    if let Some(o) = &data.outlook {
        volatility.push_str(&format!(
            ", {}={:.2} ({})",
            o.volatility.symbol, o.volatility.close, o.volatility.comment
        ));
    }
    lines.push(format!("Volatility: {volatility}"));
    lines.push(format!("Trade Setup: {}", trade_setup(data)));

    lines.join("\n")
}

/// Write the rendered report text
pub fn write_report<P: AsRef<Path>>(path: P, text: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    std::fs::write(path, format!("{text}\n"))
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}

/// Write the report values as JSON
pub fn write_report_json<P: AsRef<Path>>(path: P, data: &ReportData) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    serde_json::to_writer_pretty(file, data).with_context(|| "Failed to serialize report to JSON")?;
    Ok(())
}
