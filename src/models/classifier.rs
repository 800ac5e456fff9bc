use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Cannot fit a classifier on an empty training set")]
    EmptyTrainingSet,

    #[error("Shape mismatch: {n_values} values do not form {n_labels} rows of {n_vars} variables")]
    ShapeMismatch {
        n_values: usize,
        n_labels: usize,
        n_vars: usize,
    },
}

/// Binary classifier over a row-major feature matrix.
///
/// `data` holds `n_vars` values per case: `[case0_var0, case0_var1, ..., case1_var0, ...]`.
/// Labels are 0 or 1.
pub trait Classifier {
    fn fit(&mut self, data: &[f64], labels: &[u8], n_vars: usize) -> Result<(), ModelError>;

    /// Predicted label per case. An unfitted model predicts 0 everywhere.
    fn predict(&self, data: &[f64], n_vars: usize) -> Vec<u8>;
}

/// Check that `data` is `labels.len()` rows of `n_vars` values.
pub fn check_shape(data: &[f64], labels: &[u8], n_vars: usize) -> Result<(), ModelError> {
    if labels.is_empty() {
        return Err(ModelError::EmptyTrainingSet);
    }
    if n_vars == 0 || data.len() != labels.len() * n_vars {
        return Err(ModelError::ShapeMismatch {
            n_values: data.len(),
            n_labels: labels.len(),
            n_vars,
        });
    }
    Ok(())
}

/// Fraction of matching labels. An empty set scores 0.
pub fn accuracy(predicted: &[u8], actual: &[u8]) -> f64 {
    let n = predicted.len().min(actual.len());
    if n == 0 {
        return 0.0;
    }
    let hits = predicted
        .iter()
        .zip(actual.iter())
        .filter(|(p, a)| p == a)
        .count();
    hits as f64 / n as f64
}
