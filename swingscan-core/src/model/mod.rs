//! Binary classifiers used by the per-ticker scan.
//!
//! The scan only needs two capabilities: fit on a feature matrix with 0/1
//! labels, and return the positive-class probability of one row. A fresh
//! classifier is built for every ticker and dropped afterwards.

pub mod gbm;
pub mod tree;

pub use gbm::{GbmParams, GradientBoostedClassifier};
pub use tree::RegressionTree;

use thiserror::Error;

/// Errors that can occur when fitting or scoring a model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("feature rows ({rows}) and labels ({labels}) differ in length")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("row {row} has {found} features, expected {expected}")]
    FeatureCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("non-finite feature value at row {row}, column {column}")]
    NonFiniteFeature { row: usize, column: usize },

    #[error("label at row {row} is {value}, expected 0 or 1")]
    InvalidLabel { row: usize, value: f64 },

    #[error("invalid model parameter: {0}")]
    InvalidParams(String),

    #[error("model not trained")]
    NotTrained,
}

/// A binary classifier producing positive-class probabilities.
pub trait Classifier: Send {
    /// Train on `x` (one row per sample) and 0/1 labels `y`.
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), ModelError>;

    /// Probability that `row` belongs to the positive class.
    fn predict_proba(&self, row: &[f64]) -> Result<f64, ModelError>;
}

/// Builds an untrained classifier; called once per ticker.
pub trait ModelFactory: Send + Sync {
    fn build(&self) -> Box<dyn Classifier>;
}

impl ModelFactory for GbmParams {
    fn build(&self) -> Box<dyn Classifier> {
        Box::new(GradientBoostedClassifier::new(self.clone()))
    }
}

/// Shared input checks for classifiers. Returns the feature count.
pub(crate) fn validate_training_set(x: &[Vec<f64>], y: &[f64]) -> Result<usize, ModelError> {
    if x.is_empty() {
        return Err(ModelError::EmptyTrainingSet);
    }
    if x.len() != y.len() {
        return Err(ModelError::LengthMismatch {
            rows: x.len(),
            labels: y.len(),
        });
    }
    let expected = x[0].len();
    for (row, values) in x.iter().enumerate() {
        if values.len() != expected {
            return Err(ModelError::FeatureCount {
                row,
                expected,
                found: values.len(),
            });
        }
        if let Some(column) = values.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteFeature { row, column });
        }
    }
    if let Some(row) = y.iter().position(|&v| v != 0.0 && v != 1.0) {
        return Err(ModelError::InvalidLabel { row, value: y[row] });
    }
    Ok(expected)
}
