//! Technical indicators over daily price series.
//!
//! Every function returns a vector aligned with its input. Positions where the
//! lookback window exceeds the available history are `f64::NAN`.

pub mod oscillators;
pub mod trend;
pub mod volatility;

pub use oscillators::macd::{MacdConfig, MacdOutput, macd};
pub use oscillators::rsi::rsi;
pub use trend::ma::{ema, moving_average};
pub use volatility::atr::{average_true_range, true_range};
pub use volatility::bollinger_bands::{BollingerBandsOutput, bollinger_bands};
