//! Second-order regression tree used as the boosting base learner.
//!
//! Each node holds the gradient sum G and hessian sum H of its rows. A leaf
//! predicts -G / (H + lambda); a split is taken when
//! G_L²/(H_L+λ) + G_R²/(H_R+λ) - G²/(H+λ) is positive and both children
//! carry at least `min_child_weight` hessian. Candidate thresholds sit halfway
//! between consecutive distinct values; rows with `value < threshold` go left.

use serde::{Deserialize, Serialize};

/// Splits must improve the objective by more than this.
const MIN_SPLIT_GAIN: f64 = 1e-6;

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: usize,
    pub lambda: f64,
    pub min_child_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn predict(&self, row: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] < *threshold { left } else { right };
                }
            }
        }
    }

    fn scale(&mut self, factor: f64) {
        match self {
            TreeNode::Leaf { value } => *value *= factor,
            TreeNode::Split { left, right, .. } => {
                left.scale(factor);
                right.scale(factor);
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    root: TreeNode,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl RegressionTree {
    /// Grow a tree on per-row gradients and hessians.
    ///
    /// Callers guarantee `x`, `grad` and `hess` have equal, non-zero length
    /// and that every row has the same number of finite features.
    pub fn fit(x: &[Vec<f64>], grad: &[f64], hess: &[f64], params: &TreeParams) -> Self {
        let indices: Vec<usize> = (0..x.len()).collect();
        Self {
            root: build_node(x, grad, hess, indices, 0, params),
        }
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        self.root.predict(row)
    }

    /// Multiply every leaf value (shrinkage).
    pub fn scale(&mut self, factor: f64) {
        self.root.scale(factor);
    }

    /// Number of split levels; a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn n_leaves(&self) -> usize {
        self.root.n_leaves()
    }
}

fn build_node(
    x: &[Vec<f64>],
    grad: &[f64],
    hess: &[f64],
    indices: Vec<usize>,
    depth: usize,
    params: &TreeParams,
) -> TreeNode {
    let g: f64 = indices.iter().map(|&i| grad[i]).sum();
    let h: f64 = indices.iter().map(|&i| hess[i]).sum();
    let leaf = TreeNode::Leaf {
        value: -g / (h + params.lambda),
    };

    if depth >= params.max_depth || indices.len() < 2 {
        return leaf;
    }

    let Some(best) = find_best_split(x, grad, hess, &indices, g, h, params) else {
        return leaf;
    };

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| x[i][best.feature] < best.threshold);

    TreeNode::Split {
        feature: best.feature,
        threshold: best.threshold,
        left: Box::new(build_node(x, grad, hess, left, depth + 1, params)),
        right: Box::new(build_node(x, grad, hess, right, depth + 1, params)),
    }
}

fn find_best_split(
    x: &[Vec<f64>],
    grad: &[f64],
    hess: &[f64],
    indices: &[usize],
    g: f64,
    h: f64,
    params: &TreeParams,
) -> Option<BestSplit> {
    let n_features = x[indices[0]].len();
    let parent_score = g * g / (h + params.lambda);
    let mut best: Option<BestSplit> = None;
    let mut sorted = indices.to_vec();

    for feature in 0..n_features {
        sorted.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

        let mut g_left = 0.0;
        let mut h_left = 0.0;
        for pos in 0..sorted.len() - 1 {
            let i = sorted[pos];
            g_left += grad[i];
            h_left += hess[i];

            let here = x[i][feature];
            let next = x[sorted[pos + 1]][feature];
            if here == next {
                continue;
            }
            let h_right = h - h_left;
            if h_left < params.min_child_weight || h_right < params.min_child_weight {
                continue;
            }
            let g_right = g - g_left;
            let gain = g_left * g_left / (h_left + params.lambda)
                + g_right * g_right / (h_right + params.lambda)
                - parent_score;
            if gain <= MIN_SPLIT_GAIN {
                continue;
            }
            if best.as_ref().map_or(true, |b| gain > b.gain) {
                let mut threshold = here + (next - here) / 2.0;
                if threshold <= here {
                    threshold = next;
                }
                best = Some(BestSplit {
                    feature,
                    threshold,
                    gain,
                });
            }
        }
    }

    best
}
