//! Recursive tree nodes and their one-shot construction.

use crate::dataset::{ClassDistribution, DatasetView};
use crate::error::TreeError;
use crate::split::{find_best_split, Question};

/// Defensive recursion bound. The size floor already bounds depth by
/// `row_count / min_leaf_samples`, so hitting this means something is
/// deeply wrong with the inputs.
pub const MAX_DEPTH: usize = 512;

/// One node of a fitted tree. Fully constructed in a single synchronous
/// step (split decided, children built or majority recorded) and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Root is 0, children are `parent.depth + 1`.
    pub depth: usize,
    /// Indices into the original dataset owned by this node. Siblings are
    /// disjoint and together exactly reconstruct the parent's indices.
    pub row_indices: Vec<usize>,
    pub class_distribution: ClassDistribution,
    /// Entropy ceiling this node was created with: the root receives
    /// `+inf` (forcing at least one split attempt), children receive the
    /// child entropy computed by the parent's split search.
    pub impurity: f64,
    pub kind: NodeKind,
}

/// Leaf/internal duality as a tagged variant so a node can never be both
/// (or neither).
#[derive(Debug, Clone)]
pub enum NodeKind {
    Leaf { majority_label: u32 },
    Internal {
        question: Question,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Builds the node and, recursively, its whole subtree.
    ///
    /// Runs split search once; an improving split partitions `row_indices`
    /// into the two children, otherwise the node becomes a leaf holding the
    /// majority label of its distribution (ties resolve to the lowest
    /// label, since the distribution iterates in ascending label order and
    /// only a strictly greater count displaces the current winner).
    pub fn build(
        view: &DatasetView<'_>,
        depth: usize,
        row_indices: Vec<usize>,
        class_distribution: ClassDistribution,
        impurity: f64,
        min_leaf_samples: usize,
    ) -> Result<TreeNode, TreeError> {
        if depth > MAX_DEPTH {
            return Err(TreeError::ResourceExhaustion(format!(
                "tree depth exceeded {}",
                MAX_DEPTH
            )));
        }

        let best = find_best_split(view, &row_indices, impurity, min_leaf_samples)?;

        let kind = match best {
            Some(split) => {
                let mut left_indices = Vec::new();
                let mut right_indices = Vec::new();
                for &idx in &row_indices {
                    if split.question.goes_left(view.features.row(idx)) {
                        left_indices.push(idx);
                    } else {
                        right_indices.push(idx);
                    }
                }

                let left = TreeNode::build(
                    view,
                    depth + 1,
                    left_indices,
                    split.left_distribution,
                    split.left_impurity,
                    min_leaf_samples,
                )?;
                let right = TreeNode::build(
                    view,
                    depth + 1,
                    right_indices,
                    split.right_distribution,
                    split.right_impurity,
                    min_leaf_samples,
                )?;

                NodeKind::Internal {
                    question: split.question,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
            None => NodeKind::Leaf {
                majority_label: majority_label(&class_distribution),
            },
        };

        Ok(TreeNode {
            depth,
            row_indices,
            class_distribution,
            impurity,
            kind,
        })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub fn n_rows(&self) -> usize {
        self.row_indices.len()
    }

    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf { .. } => 1,
            NodeKind::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Deepest depth reached in this subtree.
    pub fn max_depth(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf { .. } => self.depth,
            NodeKind::Internal { left, right, .. } => left.max_depth().max(right.max_depth()),
        }
    }
}

/// Label with the highest count; linear scan where only a strictly greater
/// count updates the winner.
fn majority_label(distribution: &ClassDistribution) -> u32 {
    let mut max_count = 0;
    let mut majority = 0;
    for (&label, &count) in distribution {
        if count > max_count {
            max_count = count;
            majority = label;
        }
    }
    majority
}
