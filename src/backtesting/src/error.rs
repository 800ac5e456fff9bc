use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BacktestError {
    #[error("No test data for backtest")]
    EmptyWindow,

    #[error("Got {predictions} predictions for {prices} prices")]
    LengthMismatch { prices: usize, predictions: usize },

    #[error("Initial capital must be a finite, non-negative amount, got {0}")]
    InvalidCapital(f64),
}
