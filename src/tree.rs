//! The top-level classifier: configuration, fitting, prediction, scoring.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;

use crate::dataset::DatasetView;
use crate::error::TreeError;
use crate::node::{NodeKind, TreeNode};

/// Binary decision tree classifier driven by entropy minimization.
///
/// `fit` induces the tree top-down: each node runs an exhaustive split
/// search over every column (threshold candidates for numerical columns,
/// subset-membership candidates for categorical ones) and splits only when
/// the weighted child entropy strictly improves on its own, with both
/// children holding at least `min_leaf_samples` rows. Prediction walks the
/// finished, immutable tree from root to leaf.
pub struct DecisionTreeClassifier {
    /// Stopping criterion: minimum rows either child of a split must hold.
    pub min_leaf_samples: usize,
    categorical_columns: BTreeSet<usize>,
    n_features: usize,
    root: Option<TreeNode>,
}

impl DecisionTreeClassifier {
    pub fn new(min_leaf_samples: usize) -> Self {
        DecisionTreeClassifier {
            min_leaf_samples,
            categorical_columns: BTreeSet::new(),
            n_features: 0,
            root: None,
        }
    }

    /// Induces the tree from `x` (rows = samples) and aligned labels `y`.
    ///
    /// Columns listed in `categorical_columns` split by subset membership;
    /// all others split by threshold. The configuration travels to every
    /// node, not just the root. Returns an error before any partial tree is
    /// exposed: a previously fitted tree survives a failed refit untouched.
    pub fn fit(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<u32>,
        categorical_columns: &[usize],
    ) -> Result<(), TreeError> {
        if self.min_leaf_samples == 0 {
            return Err(TreeError::InvalidConfiguration(
                "min_leaf_samples must be at least 1".to_string(),
            ));
        }
        let categorical: BTreeSet<usize> = categorical_columns.iter().copied().collect();
        let view = DatasetView::new(x, y, &categorical)?;

        let row_indices: Vec<usize> = (0..view.n_rows()).collect();
        let class_distribution = view.distribution_of(&row_indices);

        // Impurity ceiling of +inf forces at least one split attempt.
        let root = TreeNode::build(
            &view,
            0,
            row_indices,
            class_distribution,
            f64::INFINITY,
            self.min_leaf_samples,
        )?;

        tracing::debug!(
            rows = view.n_rows(),
            leaves = root.leaf_count(),
            max_depth = root.max_depth(),
            "decision tree fitted"
        );

        self.n_features = view.n_cols();
        self.categorical_columns = categorical;
        self.root = Some(root);
        Ok(())
    }

    /// Predicts the label for a single feature row by walking root to leaf.
    pub fn predict(&self, row: ArrayView1<'_, f64>) -> Result<u32, TreeError> {
        let root = self.fitted_root()?;
        if row.len() != self.n_features {
            return Err(TreeError::ShapeMismatch {
                context: "predict row width must equal fit-time column count",
                expected: self.n_features,
                got: row.len(),
            });
        }
        Ok(walk(root, row))
    }

    /// Predicts one label per row of `x`.
    pub fn predict_batch(&self, x: &Array2<f64>) -> Result<Array1<u32>, TreeError> {
        let root = self.fitted_root()?;
        self.check_width(x)?;
        let labels: Vec<u32> = x.rows().into_iter().map(|row| walk(root, row)).collect();
        Ok(Array1::from(labels))
    }

    /// Same as [`predict_batch`](Self::predict_batch), rows walked in
    /// parallel. Safe because the fitted tree is immutable and each walk is
    /// read-only.
    pub fn par_predict_batch(&self, x: &Array2<f64>) -> Result<Array1<u32>, TreeError> {
        let root = self.fitted_root()?;
        self.check_width(x)?;
        let labels: Vec<u32> = (0..x.nrows())
            .into_par_iter()
            .map(|i| walk(root, x.row(i)))
            .collect();
        Ok(Array1::from(labels))
    }

    /// Fraction of rows whose predicted label matches `y`.
    pub fn accuracy(&self, x: &Array2<f64>, y: &Array1<u32>) -> Result<f64, TreeError> {
        if x.nrows() != y.len() {
            return Err(TreeError::ShapeMismatch {
                context: "accuracy label count must equal row count",
                expected: x.nrows(),
                got: y.len(),
            });
        }
        let predictions = self.predict_batch(x)?;
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(p, t)| p == t)
            .count();
        Ok(correct as f64 / y.len() as f64)
    }

    /// Renders the fitted tree top-down for diagnostics: one block per
    /// node with its depth position, leaf status, and either the split
    /// question or the class distribution.
    pub fn dump(&self) -> Result<String, TreeError> {
        let root = self.fitted_root()?;
        let mut out = String::new();
        write_node(root, "Root", &mut out);
        Ok(out)
    }

    /// The fitted root node, for structural introspection.
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    fn fitted_root(&self) -> Result<&TreeNode, TreeError> {
        self.root.as_ref().ok_or_else(|| {
            TreeError::InvalidConfiguration("classifier has not been fitted".to_string())
        })
    }

    fn check_width(&self, x: &Array2<f64>) -> Result<(), TreeError> {
        if x.ncols() != self.n_features {
            return Err(TreeError::ShapeMismatch {
                context: "predict row width must equal fit-time column count",
                expected: self.n_features,
                got: x.ncols(),
            });
        }
        Ok(())
    }
}

impl Default for DecisionTreeClassifier {
    /// Matches the classic configuration: `min_leaf_samples = 15`.
    fn default() -> Self {
        DecisionTreeClassifier::new(15)
    }
}

fn walk(mut node: &TreeNode, row: ArrayView1<'_, f64>) -> u32 {
    loop {
        match &node.kind {
            NodeKind::Leaf { majority_label } => return *majority_label,
            NodeKind::Internal {
                question,
                left,
                right,
            } => {
                node = if question.goes_left(row) { left } else { right };
            }
        }
    }
}

fn write_node(node: &TreeNode, position: &str, out: &mut String) {
    let indent = "\t".repeat(node.depth);
    let _ = writeln!(out, "{}{}:", indent, position);
    let _ = writeln!(out, "{}Leaf: {}", indent, node.is_leaf());
    match &node.kind {
        NodeKind::Leaf { .. } => {
            let _ = writeln!(
                out,
                "{}Class distribution: {:?}",
                indent, node.class_distribution
            );
        }
        NodeKind::Internal {
            question,
            left,
            right,
        } => {
            let _ = writeln!(out, "{}Question: {}", indent, question);
            out.push('\n');
            write_node(left, "Left", out);
            write_node(right, "Right", out);
            return;
        }
    }
    out.push('\n');
}
