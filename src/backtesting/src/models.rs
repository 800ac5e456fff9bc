use serde::{Deserialize, Serialize};

/// The single long position a long/flat strategy can hold.
///
/// `shares_held == 0` means flat. `cash` is the uninvested remainder left over
/// when the position was opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub shares_held: u64,
    pub cash: f64,
}

impl Position {
    pub fn is_long(&self) -> bool {
        self.shares_held > 0
    }

    /// Buy as many whole shares as `capital` affords at `price`.
    ///
    /// Returns false, leaving the position flat, when not even one share is
    /// affordable.
    pub fn open(&mut self, capital: f64, price: f64) -> bool {
        if !(price > 0.0) || !(capital >= price) {
            return false;
        }
        let shares = (capital / price).floor() as u64;
        self.shares_held = shares;
        self.cash = capital - shares as f64 * price;
        shares > 0
    }

    /// Flatten the position and report how many shares were sold.
    pub fn close(&mut self) -> u64 {
        let shares = self.shares_held;
        *self = Position::default();
        shares
    }
}

/// Detailed information about a single round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeLog {
    /// Index where the trade was opened.
    pub entry_index: usize,
    /// Close at which the trade was opened.
    pub entry_price: f64,
    /// Index where the trade was closed.
    pub exit_index: usize,
    /// Close at which the trade was closed.
    pub exit_price: f64,
    /// Whole shares held for the life of the trade.
    pub shares: u64,
    /// Profit/Loss for this trade.
    pub pnl: f64,
}

/// Outcome of a long/flat replay over a test window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    /// Capital at the start of the window.
    pub initial_capital: f64,
    /// Capital after the final bar.
    pub final_capital: f64,
    /// final_capital - initial_capital
    pub total_return: f64,
    /// Total return as a percentage of initial capital.
    pub return_pct: f64,
    /// Number of positions opened.
    pub num_trades: usize,
    /// Round trips in the order they were closed.
    pub trades: Vec<TradeLog>,
    /// P&L realized on each bar from holding overnight into it; entry 0 is always 0.
    pub daily_pnl: Vec<f64>,
}
