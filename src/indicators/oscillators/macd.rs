use crate::trend::ma::ema;

/// MACD (Moving Average Convergence Divergence) configuration
#[derive(Debug, Clone, Copy)]
pub struct MacdConfig {
    /// Fast EMA span (typically 12)
    pub fast_period: usize,
    /// Slow EMA span (typically 26)
    pub slow_period: usize,
    /// Signal line EMA span (typically 9)
    pub signal_period: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        MacdConfig {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD output values
#[derive(Debug, Clone)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd_line: Vec<f64>,
    /// Signal line (EMA of MACD line)
    pub signal_line: Vec<f64>,
    /// Histogram (MACD line - signal line)
    pub histogram: Vec<f64>,
}

/// Calculate MACD indicator
///
/// The EMAs start with the first price, so all three outputs are defined
/// from the first input onward.
///
/// # Arguments
/// * `data` - Price data (typically closing prices)
/// * `config` - MACD configuration (fast, slow, signal spans)
///
/// # Returns
/// MacdOutput containing MACD line, signal line, and histogram
pub fn macd(data: &[f64], config: MacdConfig) -> MacdOutput {
    let fast_ema = ema(data, config.fast_period);
    let slow_ema = ema(data, config.slow_period);

    let macd_line: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(&fast, &slow)| fast - slow)
        .collect();

    let signal_line = ema(&macd_line, config.signal_period);

    let histogram: Vec<f64> = macd_line
        .iter()
        .zip(signal_line.iter())
        .map(|(&line, &signal)| line - signal)
        .collect();

    MacdOutput {
        macd_line,
        signal_line,
        histogram,
    }
}
