pub mod classifier;
pub mod decision_tree;
pub mod random_forest;

pub use classifier::{Classifier, ModelError, accuracy};
pub use random_forest::{ForestConfig, RandomForest};
