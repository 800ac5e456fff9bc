/// Calculates the Simple Moving Average (SMA) for a given data slice and window.
///
/// # Arguments
///
/// * `data` - A slice of f64 values.
/// * `window` - Number of trailing values averaged at each position.
///
/// # Returns
///
/// A Vec<f64> containing the SMA values. The first `window - 1` values are NaN.
pub fn moving_average(data: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || window > data.len() {
        return vec![f64::NAN; data.len()];
    }

    let mut sma = Vec::with_capacity(data.len());

    // Pad with NaN for the initial period where we don't have enough data
    for _ in 0..window - 1 {
        sma.push(f64::NAN);
    }

    let mut sum: f64 = data.iter().take(window).sum();
    sma.push(sum / window as f64);

    for i in window..data.len() {
        sum = sum - data[i - window] + data[i];
        sma.push(sum / window as f64);
    }

    sma
}

/// Calculates the Exponential Moving Average (EMA) with smoothing factor
/// `2 / (span + 1)`.
///
/// The recursion is seeded with the first finite value and is defined from
/// that position onward; there is no warm-up gap. Leading NaN values (for
/// example the head of another indicator) stay NaN.
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    let mut ema_values = vec![f64::NAN; data.len()];
    if span == 0 {
        return ema_values;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let Some(first) = data.iter().position(|x| x.is_finite()) else {
        return ema_values;
    };

    let mut prev = data[first];
    ema_values[first] = prev;
    for i in first + 1..data.len() {
        prev = alpha * data[i] + (1.0 - alpha) * prev;
        ema_values[i] = prev;
    }

    ema_values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let sma = moving_average(&data, 3);

        assert_eq!(sma.len(), 5);
        assert!(sma[0].is_nan());
        assert!(sma[1].is_nan());
        assert!((sma[2] - 2.0).abs() < 1e-10); // (1+2+3)/3 = 2
        assert!((sma[3] - 3.0).abs() < 1e-10); // (2+3+4)/3 = 3
        assert!((sma[4] - 4.0).abs() < 1e-10); // (3+4+5)/3 = 4
    }

    #[test]
    fn test_moving_average_edge_cases() {
        let data = vec![1.0, 2.0];
        let sma = moving_average(&data, 3);
        assert_eq!(sma.len(), 2);
        assert!(sma[0].is_nan());
        assert!(sma[1].is_nan());

        let sma = moving_average(&data, 0);
        assert!(sma[0].is_nan());

        assert!(moving_average(&[], 5).is_empty());
    }

    #[test]
    fn test_window_one_is_identity() {
        let data = vec![101.5, 99.25, 100.0, 103.75, 98.5];
        assert_eq!(moving_average(&data, 1), data);
    }

    #[test]
    fn test_ema_seeded_by_first_value() {
        let data = vec![10.0, 11.0, 12.0, 13.0];
        let out = ema(&data, 3);

        // alpha = 0.5
        assert_eq!(out[0], 10.0);
        assert!((out[1] - 10.5).abs() < 1e-12);
        assert!((out[2] - 11.25).abs() < 1e-12);
        assert!((out[3] - 12.125).abs() < 1e-12);
    }

    #[test]
    fn test_ema_constant_series() {
        let data = vec![42.0; 30];
        assert!(ema(&data, 12).iter().all(|&v| (v - 42.0).abs() < 1e-12));
    }

    #[test]
    fn test_ema_skips_leading_nan() {
        let data = vec![f64::NAN, f64::NAN, 4.0, 6.0];
        let out = ema(&data, 1);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_eq!(out[2], 4.0);
        assert_eq!(out[3], 6.0);
    }
}
