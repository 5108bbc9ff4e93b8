//! Exhaustive search for the impurity-minimizing binary split of a node.

use std::fmt;

use ndarray::ArrayView1;

use crate::dataset::{ClassDistribution, DatasetView};
use crate::error::TreeError;
use crate::impurity::{entropy, weighted_entropy};

/// Hard ceiling on distinct category values within one node. Subset
/// enumeration is `2^k - 1` candidates, so past this point induction fails
/// with `ResourceExhaustion` instead of running effectively forever.
pub const MAX_CATEGORICAL_CARDINALITY: usize = 16;

/// The boolean test an internal node asks of a row to route it left or
/// right. Exactly one shape exists per column kind: ordered threshold
/// comparison for numerical columns, unordered membership for categorical
/// ones.
#[derive(Debug, Clone, PartialEq)]
pub enum Question {
    /// Row goes left iff `row[column] <= value`.
    Threshold { column: usize, value: f64 },
    /// Row goes left iff `row[column]` is one of `values`.
    /// `values` is non-empty and sorted ascending.
    Membership { column: usize, values: Vec<f64> },
}

impl Question {
    pub fn column(&self) -> usize {
        match self {
            Question::Threshold { column, .. } => *column,
            Question::Membership { column, .. } => *column,
        }
    }

    /// Evaluates the question against a full feature row.
    pub fn goes_left(&self, row: ArrayView1<'_, f64>) -> bool {
        match self {
            Question::Threshold { column, value } => row[*column] <= *value,
            Question::Membership { column, values } => values.contains(&row[*column]),
        }
    }

    /// Same test, reading the column value directly from the dataset.
    fn routes_left(&self, view: &DatasetView<'_>, row_idx: usize) -> bool {
        match self {
            Question::Threshold { column, value } => view.features[[row_idx, *column]] <= *value,
            Question::Membership { column, values } => {
                values.contains(&view.features[[row_idx, *column]])
            }
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Question::Threshold { column, value } => write!(f, "X[{}] <= {}", column, value),
            Question::Membership { column, values } => {
                write!(f, "X[{}] in {{", column)?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// The winning candidate returned by [`find_best_split`]: the question plus
/// everything the node needs to construct its children without recounting.
#[derive(Debug, Clone)]
pub struct BestSplit {
    pub question: Question,
    pub left_distribution: ClassDistribution,
    pub right_distribution: ClassDistribution,
    pub left_impurity: f64,
    pub right_impurity: f64,
    /// Weighted child entropy; strictly below the parent's impurity.
    pub impurity: f64,
}

/// Enumerates every candidate split of `row_indices` and returns the one
/// minimizing weighted child entropy, or `None` when no candidate strictly
/// improves on `node_impurity` while keeping both sides at or above
/// `min_leaf_samples`.
///
/// Numerical columns contribute the midpoints between adjacent distinct
/// values (the lone distinct value itself when there is only one, which the
/// size floor then rejects). Categorical columns contribute every non-empty
/// subset of the distinct values observed in this node's rows, enumerated
/// in ascending bitmask order so the search is deterministic.
pub fn find_best_split(
    view: &DatasetView<'_>,
    row_indices: &[usize],
    node_impurity: f64,
    min_leaf_samples: usize,
) -> Result<Option<BestSplit>, TreeError> {
    // A pure node can never be improved.
    if node_impurity == 0.0 {
        return Ok(None);
    }

    let n_total = row_indices.len();
    let mut best: Option<BestSplit> = None;
    let mut best_impurity = node_impurity;

    for column in 0..view.n_cols() {
        let distinct = distinct_column_values(view, row_indices, column);

        if view.is_categorical(column) {
            if distinct.len() > MAX_CATEGORICAL_CARDINALITY {
                tracing::warn!(
                    column,
                    cardinality = distinct.len(),
                    limit = MAX_CATEGORICAL_CARDINALITY,
                    "categorical cardinality exceeds subset-enumeration limit"
                );
                return Err(TreeError::ResourceExhaustion(format!(
                    "categorical column {} has {} distinct values in this node (limit {})",
                    column,
                    distinct.len(),
                    MAX_CATEGORICAL_CARDINALITY
                )));
            }
            for mask in 1u32..(1u32 << distinct.len()) {
                let values: Vec<f64> = distinct
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, &v)| v)
                    .collect();
                let question = Question::Membership { column, values };
                consider(
                    view,
                    row_indices,
                    question,
                    min_leaf_samples,
                    n_total,
                    &mut best_impurity,
                    &mut best,
                )?;
            }
        } else {
            let thresholds: Vec<f64> = if distinct.len() == 1 {
                distinct.clone()
            } else {
                distinct.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
            };
            for value in thresholds {
                let question = Question::Threshold { column, value };
                consider(
                    view,
                    row_indices,
                    question,
                    min_leaf_samples,
                    n_total,
                    &mut best_impurity,
                    &mut best,
                )?;
            }
        }
    }

    Ok(best)
}

/// Evaluates one candidate question and records it if it beats the best
/// impurity seen so far.
fn consider(
    view: &DatasetView<'_>,
    row_indices: &[usize],
    question: Question,
    min_leaf_samples: usize,
    n_total: usize,
    best_impurity: &mut f64,
    best: &mut Option<BestSplit>,
) -> Result<(), TreeError> {
    let mut left_distribution = ClassDistribution::new();
    let mut right_distribution = ClassDistribution::new();
    let mut n_left = 0usize;
    let mut n_right = 0usize;

    for &idx in row_indices {
        if question.routes_left(view, idx) {
            *left_distribution.entry(view.labels[idx]).or_insert(0) += 1;
            n_left += 1;
        } else {
            *right_distribution.entry(view.labels[idx]).or_insert(0) += 1;
            n_right += 1;
        }
    }

    // Stopping criterion: no degenerate leaves.
    if n_left < min_leaf_samples || n_right < min_leaf_samples {
        return Ok(());
    }

    let left_impurity = entropy(&left_distribution, n_left)?;
    let right_impurity = entropy(&right_distribution, n_right)?;
    let impurity = weighted_entropy(left_impurity, right_impurity, n_left, n_right, n_total);

    if impurity < *best_impurity {
        *best_impurity = impurity;
        *best = Some(BestSplit {
            question,
            left_distribution,
            right_distribution,
            left_impurity,
            right_impurity,
            impurity,
        });
    }

    Ok(())
}

/// Distinct values of one column over the node's rows, sorted ascending.
fn distinct_column_values(view: &DatasetView<'_>, row_indices: &[usize], column: usize) -> Vec<f64> {
    let mut values: Vec<f64> = row_indices
        .iter()
        .map(|&idx| view.features[[idx, column]])
        .collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    values.dedup();
    values
}
