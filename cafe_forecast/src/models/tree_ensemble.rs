//! Averaged regression trees (random-forest style)

use crate::error::{ForecastError, Result};
use crate::models::{validate_features, Feature, FeatureRow, SalesModel};
use serde::{Deserialize, Serialize};

/// A node of a regression tree; the root is node 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go to `left` when the feature value is `<= threshold`, else `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal prediction
    Leaf { value: f64 },
}

/// A single regression tree stored as a flat node list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Create a new tree; children must come after their parent
    pub fn new(nodes: Vec<TreeNode>, feature_count: usize) -> Result<Self> {
        let tree = Self { nodes };
        tree.validate(feature_count)?;
        Ok(tree)
    }

    /// Nodes, root first
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Check that every path ends in a leaf and every split names a known input
    pub fn validate(&self, feature_count: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Regression tree has no nodes".to_string(),
            ));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= feature_count {
                        return Err(ForecastError::InvalidParameter(format!(
                            "Node {} splits on feature {} but the model has {} features",
                            index, feature, feature_count
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ForecastError::InvalidParameter(format!(
                            "Node {} has a non-finite threshold",
                            index
                        )));
                    }
                    // Children strictly after the parent rules out cycles.
                    for child in [left, right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(ForecastError::InvalidParameter(format!(
                                "Node {} points to invalid child {}",
                                index, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(ForecastError::InvalidParameter(format!(
                            "Leaf {} has a non-finite value",
                            index
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Walk the tree for one projected input vector
    pub fn evaluate(&self, inputs: &[f64]) -> Result<f64> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = inputs.get(*feature).ok_or_else(|| {
                        ForecastError::ValidationError(format!(
                            "Input vector has no feature {}",
                            feature
                        ))
                    })?;
                    let next = if *value <= *threshold { *left } else { *right };
                    if next <= index {
                        return Err(ForecastError::ValidationError(format!(
                            "Node {} loops back to node {}",
                            index, next
                        )));
                    }
                    index = next;
                }
                None => {
                    return Err(ForecastError::ValidationError(format!(
                        "Tree has no node {}",
                        index
                    )))
                }
            }
        }
    }
}

/// Ensemble of regression trees whose predictions are averaged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    /// Features, in the column order the split indices refer to
    features: Vec<Feature>,
    trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    /// Create a new ensemble
    pub fn new(features: Vec<Feature>, trees: Vec<RegressionTree>) -> Result<Self> {
        let ensemble = Self { features, trees };
        ensemble.validate()?;
        Ok(ensemble)
    }

    /// Check the feature list and every tree
    pub fn validate(&self) -> Result<()> {
        validate_features(&self.features)?;

        if self.trees.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Tree ensemble has no trees".to_string(),
            ));
        }

        for tree in &self.trees {
            tree.validate(self.features.len())?;
        }

        Ok(())
    }

    /// Features, in column order
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Number of trees
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Check if the ensemble has no trees
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl SalesModel for TreeEnsemble {
    fn predict(&self, row: &FeatureRow) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(ForecastError::ValidationError(
                "Tree ensemble has no trees".to_string(),
            ));
        }

        let inputs = row.project(&self.features);
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.evaluate(&inputs)?;
        }

        Ok(sum / self.trees.len() as f64)
    }

    fn name(&self) -> &str {
        "tree ensemble"
    }
}
