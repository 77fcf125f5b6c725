//! Gradient-boosted decision trees for binary classification.
//!
//! Logistic loss, one regression tree per round fitted on the gradient
//! (p - y) and hessian p(1 - p) of the current margins. Leaf values are
//! shrunk by the learning rate before being added to the ensemble. Fitting is
//! fully deterministic: no row or column sampling.

use serde::{Deserialize, Serialize};

use super::tree::{RegressionTree, TreeParams};
use super::{validate_training_set, Classifier, ModelError};

/// Hessian floor so saturated rows cannot zero a node's denominator.
const MIN_HESSIAN: f64 = 1e-16;

/// GBM hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GbmParams {
    /// Number of boosting rounds (trees)
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Shrinkage applied to every tree
    pub learning_rate: f64,
    /// L2 regularisation on leaf values
    pub lambda: f64,
    /// Minimum hessian sum in each child of a split
    pub min_child_weight: f64,
    /// Initial probability before any tree is added
    pub base_score: f64,
}

impl Default for GbmParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 5,
            learning_rate: 0.05,
            lambda: 1.0,
            min_child_weight: 1.0,
            base_score: 0.5,
        }
    }
}

impl GbmParams {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_trees == 0 {
            return Err(ModelError::InvalidParams("n_trees must be >= 1".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ModelError::InvalidParams(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.lambda >= 0.0 && self.lambda.is_finite()) {
            return Err(ModelError::InvalidParams(format!(
                "lambda must be >= 0, got {}",
                self.lambda
            )));
        }
        if !(self.min_child_weight >= 0.0 && self.min_child_weight.is_finite()) {
            return Err(ModelError::InvalidParams(format!(
                "min_child_weight must be >= 0, got {}",
                self.min_child_weight
            )));
        }
        if !(self.base_score > 0.0 && self.base_score < 1.0) {
            return Err(ModelError::InvalidParams(format!(
                "base_score must lie in (0, 1), got {}",
                self.base_score
            )));
        }
        Ok(())
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            lambda: self.lambda,
            min_child_weight: self.min_child_weight,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedClassifier {
    params: GbmParams,
    base_margin: f64,
    n_features: Option<usize>,
    trees: Vec<RegressionTree>,
}

impl GradientBoostedClassifier {
    pub fn new(params: GbmParams) -> Self {
        Self {
            base_margin: logit(params.base_score),
            params,
            n_features: None,
            trees: Vec::new(),
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn is_trained(&self) -> bool {
        self.n_features.is_some()
    }

    fn margin(&self, row: &[f64]) -> f64 {
        self.base_margin + self.trees.iter().map(|t| t.predict(row)).sum::<f64>()
    }
}

impl Default for GradientBoostedClassifier {
    fn default() -> Self {
        Self::new(GbmParams::default())
    }
}

impl Classifier for GradientBoostedClassifier {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), ModelError> {
        self.params.validate()?;
        let n_features = validate_training_set(x, y)?;
        self.base_margin = logit(self.params.base_score);

        let tree_params = self.params.tree_params();
        let mut margins = vec![self.base_margin; x.len()];
        let mut grad = vec![0.0; x.len()];
        let mut hess = vec![0.0; x.len()];
        let mut trees = Vec::with_capacity(self.params.n_trees);

        for _ in 0..self.params.n_trees {
            for i in 0..x.len() {
                let p = sigmoid(margins[i]);
                grad[i] = p - y[i];
                hess[i] = (p * (1.0 - p)).max(MIN_HESSIAN);
            }

            let mut tree = RegressionTree::fit(x, &grad, &hess, &tree_params);
            tree.scale(self.params.learning_rate);
            for (margin, row) in margins.iter_mut().zip(x) {
                *margin += tree.predict(row);
            }
            trees.push(tree);
        }

        self.trees = trees;
        self.n_features = Some(n_features);
        Ok(())
    }

    fn predict_proba(&self, row: &[f64]) -> Result<f64, ModelError> {
        let expected = self.n_features.ok_or(ModelError::NotTrained)?;
        if row.len() != expected {
            return Err(ModelError::FeatureCount {
                row: 0,
                expected,
                found: row.len(),
            });
        }
        if let Some(column) = row.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteFeature { row: 0, column });
        }
        Ok(sigmoid(self.margin(row)))
    }
}

fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}

fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}
