/// Calculates the Relative Strength Index (RSI) for a given data slice and period.
///
/// Gains and losses are the positive and negative parts of the day-over-day
/// change, each averaged with a plain trailing mean over `period` changes.
/// When the average loss is zero the value is clamped to 100; a window with no
/// movement at all reads as a neutral 50.
/// A pandas rolling RSI is NaN on such a window, so a pipeline built on it drops the row.
///
/// # Arguments
///
/// * `data` - A slice of f64 values (prices).
/// * `period` - The lookback period for RSI (typically 14).
///
/// # Returns
///
/// A Vec<f64> containing the RSI values. The first `period` values are NaN.
pub fn rsi(data: &[f64], period: usize) -> Vec<f64> {
    let mut rsi_values = vec![f64::NAN; data.len()];
    if period == 0 || period >= data.len() {
        return rsi_values;
    }

    let mut gains = vec![0.0; data.len()];
    let mut losses = vec![0.0; data.len()];
    for i in 1..data.len() {
        let change = data[i] - data[i - 1];
        if change > 0.0 {
            gains[i] = change;
        } else {
            losses[i] = -change;
        }
    }

    // Rolling sums over changes[i - period + 1..=i]
    let mut gain_sum: f64 = gains[1..=period].iter().sum();
    let mut loss_sum: f64 = losses[1..=period].iter().sum();

    for i in period..data.len() {
        if i > period {
            gain_sum += gains[i] - gains[i - period];
            loss_sum += losses[i] - losses[i - period];
        }

        let avg_gain = gain_sum / period as f64;
        let avg_loss = loss_sum / period as f64;

        rsi_values[i] = if avg_gain < 1e-12 && avg_loss < 1e-12 {
            50.0
        } else if avg_loss < 1e-12 {
            100.0
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - (100.0 / (1.0 + rs))
        };
    }

    rsi_values
}
