//! Immutable view over a labeled feature matrix.

use std::collections::{BTreeMap, BTreeSet};

use ndarray::{Array1, Array2};

use crate::error::TreeError;

/// Count of rows per class label within some row subset.
///
/// Built by counting, so it never contains zero-count entries. `BTreeMap`
/// keeps iteration in ascending label order, which makes majority
/// tie-breaking and tree dumps reproducible across runs.
pub type ClassDistribution = BTreeMap<u32, usize>;

/// Borrowed, immutable handle to the training data: a feature matrix, an
/// aligned label vector, and the set of column indices treated as
/// categorical. Every other component reads through this view; nothing
/// mutates it after construction.
#[derive(Debug, Clone, Copy)]
pub struct DatasetView<'a> {
    pub features: &'a Array2<f64>,
    pub labels: &'a Array1<u32>,
    pub categorical_columns: &'a BTreeSet<usize>,
}

impl<'a> DatasetView<'a> {
    /// Validates the shape invariants and wraps the borrowed data.
    ///
    /// Requires `labels.len() == features.nrows() > 0`, every categorical
    /// index in `[0, ncols)`, and a NaN-free feature matrix (categorical
    /// codes are compared bitwise, and NaN would silently route every row
    /// right at numerical splits).
    pub fn new(
        features: &'a Array2<f64>,
        labels: &'a Array1<u32>,
        categorical_columns: &'a BTreeSet<usize>,
    ) -> Result<Self, TreeError> {
        if labels.len() != features.nrows() {
            return Err(TreeError::ShapeMismatch {
                context: "label count must equal feature row count",
                expected: features.nrows(),
                got: labels.len(),
            });
        }
        if features.nrows() == 0 {
            return Err(TreeError::ShapeMismatch {
                context: "dataset must contain at least one row",
                expected: 1,
                got: 0,
            });
        }
        for &col in categorical_columns {
            if col >= features.ncols() {
                return Err(TreeError::InvalidConfiguration(format!(
                    "categorical column index {} out of range for {} columns",
                    col,
                    features.ncols()
                )));
            }
        }
        if features.iter().any(|v| v.is_nan()) {
            return Err(TreeError::InvalidConfiguration(
                "feature matrix contains NaN".to_string(),
            ));
        }
        Ok(DatasetView {
            features,
            labels,
            categorical_columns,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.features.ncols()
    }

    pub fn is_categorical(&self, column: usize) -> bool {
        self.categorical_columns.contains(&column)
    }

    /// Class distribution over the given row subset.
    pub fn distribution_of(&self, row_indices: &[usize]) -> ClassDistribution {
        let mut distribution = ClassDistribution::new();
        for &idx in row_indices {
            *distribution.entry(self.labels[idx]).or_insert(0) += 1;
        }
        distribution
    }
}
