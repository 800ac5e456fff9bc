use anyhow::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::models::BacktestSummary;

/// Write the summary and trade log as plain text to any writer.
pub fn write_text_report<W: Write>(out: &mut W, summary: &BacktestSummary) -> Result<()> {
    writeln!(out, "Backtest Results")?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out)?;

    writeln!(out, "Performance Metrics:")?;
    writeln!(out, "  Initial Capital: ${:.2}", summary.initial_capital)?;
    writeln!(out, "  Final Capital: ${:.2}", summary.final_capital)?;
    writeln!(out, "  Total Return: ${:.2}", summary.total_return)?;
    writeln!(out, "  Return: {:.2}%", summary.return_pct)?;
    writeln!(out, "  Total Trades: {}", summary.num_trades)?;
    writeln!(out)?;

    if !summary.trades.is_empty() {
        writeln!(out, "Trade Log:")?;
        writeln!(
            out,
            "  {:<10} {:<12} {:<10} {:<12} {:<8} {:<12}",
            "Entry Idx", "Entry $", "Exit Idx", "Exit $", "Shares", "P&L"
        )?;
        writeln!(out, "  {}", "-".repeat(70))?;

        for trade in &summary.trades {
            writeln!(
                out,
                "  {:<10} ${:<11.2} {:<10} ${:<11.2} {:<8} ${:<11.2}",
                trade.entry_index,
                trade.entry_price,
                trade.exit_index,
                trade.exit_price,
                trade.shares,
                trade.pnl
            )?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Generate a JSON report
pub fn generate_json_report<P: AsRef<Path>>(summary: &BacktestSummary, path: P) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}
