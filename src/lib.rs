//! Binary decision tree classification for tabular data.
//!
//! Trees are induced top-down by recursive, entropy-driven binary
//! splitting: numerical columns split on thresholds, categorical columns on
//! exhaustive subset membership, and a minimum-leaf-size floor stops the
//! recursion. Prediction walks the finished tree from root to leaf.

pub mod dataset;
pub mod error;
pub mod impurity;
pub mod node;
pub mod split;
pub mod tree;

// Re-export commonly used types at crate root
pub use dataset::{ClassDistribution, DatasetView};
pub use error::TreeError;
pub use node::{NodeKind, TreeNode};
pub use split::{BestSplit, Question};
pub use tree::DecisionTreeClassifier;
