use std::ops::Range;

/// Chronological train/test partition of a table with `n_rows` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSplit {
    /// Index of the first test row
    pub cutoff: usize,
    pub train: Range<usize>,
    pub test: Range<usize>,
}

impl DataSplit {
    pub fn train_len(&self) -> usize {
        self.train.len()
    }

    pub fn test_len(&self) -> usize {
        self.test.len()
    }
}

/// Split a chronologically ordered table so that the trailing `test_days`
/// rows form the test set.
///
/// The cutoff is `n_rows - test_days`, clamped at zero when the table is
/// shorter than the requested test window; in that case every row is a test
/// row and the training range is empty.
///
/// # Arguments
/// * `n_rows` - Number of rows in the table
/// * `test_days` - Number of trailing rows reserved for testing
pub fn split_at_cutoff(n_rows: usize, test_days: usize) -> DataSplit {
    let cutoff = n_rows.saturating_sub(test_days);
    DataSplit {
        cutoff,
        train: 0..cutoff,
        test: cutoff..n_rows,
    }
}

/// Next-day direction labels from closing prices
///
/// # Returns
/// `Some(1)` where the next close is strictly higher, `Some(0)` otherwise,
/// and `None` for the final close, which has no next day.
pub fn compute_direction_labels(closes: &[f64]) -> Vec<Option<u8>> {
    let mut labels: Vec<Option<u8>> = closes
        .windows(2)
        .map(|w| Some(u8::from(w[1] > w[0])))
        .collect();
    if !closes.is_empty() {
        labels.push(None);
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_at_cutoff() {
        let split = split_at_cutoff(300, 60);
        assert_eq!(split.cutoff, 240);
        assert_eq!(split.train_len(), 240);
        assert_eq!(split.test_len(), 60);
        assert_eq!(split.train.end, split.test.start);
    }

    #[test]
    fn test_split_window_larger_than_table() {
        let split = split_at_cutoff(40, 60);
        assert_eq!(split.cutoff, 0);
        assert_eq!(split.train_len(), 0);
        assert_eq!(split.test_len(), 40);
    }

    #[test]
    fn test_split_zero_test_days() {
        let split = split_at_cutoff(10, 0);
        assert_eq!(split.train_len(), 10);
        assert!(split.test.is_empty());
    }

    #[test]
    fn test_compute_direction_labels() {
        let closes = vec![100.0, 101.0, 101.0, 99.5, 100.0];
        let labels = compute_direction_labels(&closes);

        assert_eq!(labels, vec![Some(1), Some(0), Some(0), Some(1), None]);
        assert!(compute_direction_labels(&[]).is_empty());
        assert_eq!(compute_direction_labels(&[5.0]), vec![None]);
    }
}
