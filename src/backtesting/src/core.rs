use tracing::{debug, info};

use crate::error::BacktestError;
use crate::models::{BacktestSummary, Position, TradeLog};

/// Replay next-day direction predictions as a long/flat strategy.
///
/// For every bar except the last, a prediction of 1 opens a position (if flat)
/// with as many whole shares as the current capital affords, and the position
/// earns `shares * (next_close - close)` overnight. A prediction of 0 closes
/// any position at that bar's close. Capital is updated only by realized
/// overnight P&L. A position still open after the last bar is closed at its
/// close, which realizes nothing further. The prediction for the last bar is
/// never acted on.
///
/// # Arguments
/// * `closes` - Closing prices of the test window, oldest first
/// * `predictions` - Predicted direction per bar (1 = up, 0 = not up)
/// * `initial_capital` - Starting capital
///
/// # Returns
/// BacktestSummary with final capital, returns, and the trade log
pub fn simulate_long_flat(
    closes: &[f64],
    predictions: &[u8],
    initial_capital: f64,
) -> Result<BacktestSummary, BacktestError> {
    if closes.is_empty() {
        return Err(BacktestError::EmptyWindow);
    }
    if predictions.len() != closes.len() {
        return Err(BacktestError::LengthMismatch {
            prices: closes.len(),
            predictions: predictions.len(),
        });
    }
    if !initial_capital.is_finite() || initial_capital < 0.0 {
        return Err(BacktestError::InvalidCapital(initial_capital));
    }

    let n = closes.len();
    let mut capital = initial_capital;
    let mut position = Position::default();
    let mut entry_idx = 0;
    let mut num_trades = 0;
    let mut trades = Vec::new();
    let mut daily_pnl = vec![0.0; n];

    for i in 0..n - 1 {
        let price = closes[i];

        match (position.is_long(), predictions[i]) {
            (false, 1) => {
                if position.open(capital, price) {
                    entry_idx = i;
                    num_trades += 1;
                    debug!(index = i, price, shares = position.shares_held, "open long");
                }
            }
            (true, 1) => {}
            (true, _) => {
                trades.push(close_trade(&mut position, closes, entry_idx, i));
                debug!(index = i, price, "close long");
            }
            (false, _) => {}
        }

        if position.is_long() {
            let pnl = position.shares_held as f64 * (closes[i + 1] - price);
            daily_pnl[i + 1] = pnl;
            capital += pnl;
        }
    }

    // Close any open position at the end
    if position.is_long() {
        trades.push(close_trade(&mut position, closes, entry_idx, n - 1));
    }

    let total_return = capital - initial_capital;
    let return_pct = if initial_capital > 0.0 {
        total_return / initial_capital * 100.0
    } else {
        0.0
    };

    info!(
        bars = n,
        trades = num_trades,
        final_capital = capital,
        return_pct,
        "backtest complete"
    );

    Ok(BacktestSummary {
        initial_capital,
        final_capital: capital,
        total_return,
        return_pct,
        num_trades,
        trades,
        daily_pnl,
    })
}

fn close_trade(position: &mut Position, closes: &[f64], entry_idx: usize, exit_idx: usize) -> TradeLog {
    let shares = position.close();
    let entry_price = closes[entry_idx];
    let exit_price = closes[exit_idx];
    TradeLog {
        entry_index: entry_idx,
        entry_price,
        exit_index: exit_idx,
        exit_price,
        shares,
        pnl: shares as f64 * (exit_price - entry_price),
    }
}
