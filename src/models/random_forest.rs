use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::classifier::{Classifier, ModelError, check_shape};
use crate::models::decision_tree::DecisionTree;

/// Random forest hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Seed for bootstrap draws and feature sampling
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 5,
            seed: 42,
        }
    }
}

/// Bagged ensemble of Gini trees.
///
/// Each tree sees a bootstrap sample of the training cases and considers
/// `floor(sqrt(n_vars))` candidate variables per split. The forest predicts
/// class 1 when the mean leaf probability across trees exceeds 0.5.
#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    n_vars: usize,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            n_vars: 0,
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean class-1 probability per case.
    pub fn predict_proba(&self, data: &[f64], n_vars: usize) -> Vec<f64> {
        if n_vars == 0 {
            return Vec::new();
        }
        data.chunks_exact(n_vars)
            .map(|row| {
                if self.trees.is_empty() || n_vars != self.n_vars {
                    return 0.0;
                }
                let sum: f64 = self.trees.iter().map(|t| t.predict_proba_row(row)).sum();
                sum / self.trees.len() as f64
            })
            .collect()
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, data: &[f64], labels: &[u8], n_vars: usize) -> Result<(), ModelError> {
        check_shape(data, labels, n_vars)?;

        let n_cases = labels.len();
        let max_features = ((n_vars as f64).sqrt() as usize).max(1);
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        self.n_vars = n_vars;
        self.trees = (0..self.config.n_trees)
            .map(|_| {
                let samples: Vec<usize> = (0..n_cases).map(|_| rng.gen_range(0..n_cases)).collect();
                let mut tree = DecisionTree::new(self.config.max_depth, max_features);
                tree.fit(data, labels, n_vars, samples, &mut rng);
                tree
            })
            .collect();

        debug!(
            trees = self.trees.len(),
            cases = n_cases,
            vars = n_vars,
            "random forest fitted"
        );
        Ok(())
    }

    fn predict(&self, data: &[f64], n_vars: usize) -> Vec<u8> {
        self.predict_proba(data, n_vars)
            .into_iter()
            .map(|p| u8::from(p > 0.5))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classifier::accuracy;

    /// Two variables; label is 1 when the first exceeds the second.
    fn separable(n: usize) -> (Vec<f64>, Vec<u8>) {
        let mut data = Vec::with_capacity(2 * n);
        let mut labels = Vec::with_capacity(n);
        for i in 0..n {
            let a = ((i * 37) % 101) as f64;
            let b = ((i * 59) % 97) as f64;
            data.push(a);
            data.push(b);
            labels.push(u8::from(a > b));
        }
        (data, labels)
    }

    #[test]
    fn test_forest_is_reproducible() {
        let (data, labels) = separable(200);
        let config = ForestConfig {
            n_trees: 15,
            max_depth: 4,
            seed: 42,
        };

        let mut a = RandomForest::new(config);
        let mut b = RandomForest::new(config);
        a.fit(&data, &labels, 2).unwrap();
        b.fit(&data, &labels, 2).unwrap();

        assert_eq!(a.n_trees(), 15);
        assert_eq!(a.predict_proba(&data, 2), b.predict_proba(&data, 2));
    }

    #[test]
    fn test_forest_learns_separable_rule() {
        let (data, labels) = separable(300);
        let mut forest = RandomForest::new(ForestConfig::default());
        forest.fit(&data, &labels, 2).unwrap();

        let preds = forest.predict(&data, 2);
        assert_eq!(preds.len(), labels.len());
        assert!(accuracy(&preds, &labels) > 0.85);
    }

    #[test]
    fn test_forest_single_class() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        let labels = vec![0, 0, 0, 0];
        let mut forest = RandomForest::new(ForestConfig::default());
        forest.fit(&data, &labels, 1).unwrap();

        assert_eq!(forest.predict(&[10.0, -3.0], 1), vec![0, 0]);
    }

    #[test]
    fn test_forest_rejects_bad_shapes() {
        let mut forest = RandomForest::new(ForestConfig::default());
        assert!(forest.fit(&[], &[], 3).is_err());
        assert!(forest.fit(&[1.0, 2.0], &[1], 3).is_err());
    }

    #[test]
    fn test_unfitted_forest_predicts_zero() {
        let forest = RandomForest::new(ForestConfig::default());
        assert_eq!(forest.predict(&[1.0, 2.0, 3.0, 4.0], 2), vec![0, 0]);
    }
}
