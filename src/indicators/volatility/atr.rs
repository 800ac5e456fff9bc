use crate::trend::ma::moving_average;

/// True range of each bar: the largest of high-low, |high - prior close| and
/// |low - prior close|.
///
/// The first bar has no prior close and is NaN.
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let n = high.len().min(low.len()).min(close.len());
    let mut tr = vec![f64::NAN; n];

    for i in 1..n {
        let prev_close = close[i - 1];
        let mut term = high[i] - low[i];
        let gap_high = (high[i] - prev_close).abs();
        let gap_low = (low[i] - prev_close).abs();

        if gap_high > term {
            term = gap_high;
        }
        if gap_low > term {
            term = gap_low;
        }
        tr[i] = term;
    }

    tr
}

/// Average true range: trailing mean of [`true_range`] over `window` bars.
///
/// Defined once `window` true ranges exist, i.e. from index `window` onward.
pub fn average_true_range(high: &[f64], low: &[f64], close: &[f64], window: usize) -> Vec<f64> {
    let tr = true_range(high, low, close);
    if tr.len() < 2 {
        return tr;
    }

    let mut atr = vec![f64::NAN; tr.len()];
    let tail = moving_average(&tr[1..], window);
    atr[1..].copy_from_slice(&tail);
    atr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_true_range_uses_gaps() {
        let high = vec![11.0, 12.0, 15.0, 10.0];
        let low = vec![9.0, 10.0, 13.0, 8.0];
        let close = vec![10.0, 11.0, 14.0, 9.0];

        let tr = true_range(&high, &low, &close);
        assert!(tr[0].is_nan());
        assert_eq!(tr[1], 2.0); // plain range
        assert_eq!(tr[2], 4.0); // gap up: 15 - 11
        assert_eq!(tr[3], 6.0); // gap down: |8 - 14|
    }

    #[test]
    fn test_average_true_range() {
        let high = vec![11.0, 12.0, 15.0, 10.0, 11.0];
        let low = vec![9.0, 10.0, 13.0, 8.0, 9.0];
        let close = vec![10.0, 11.0, 14.0, 9.0, 10.0];

        let atr = average_true_range(&high, &low, &close, 2);
        assert!(atr[0].is_nan());
        assert!(atr[1].is_nan());
        assert!((atr[2] - 3.0).abs() < 1e-12); // (2 + 4) / 2
        assert!((atr[3] - 5.0).abs() < 1e-12); // (4 + 6) / 2
        assert!((atr[4] - 4.0).abs() < 1e-12); // (6 + 2) / 2
    }

    #[test]
    fn test_average_true_range_short_input() {
        let atr = average_true_range(&[1.0], &[0.5], &[0.8], 14);
        assert_eq!(atr.len(), 1);
        assert!(atr[0].is_nan());

        let atr = average_true_range(&[2.0, 3.0, 4.0], &[1.0, 2.0, 3.0], &[1.5, 2.5, 3.5], 14);
        assert!(atr.iter().all(|v| v.is_nan()));
    }
}
