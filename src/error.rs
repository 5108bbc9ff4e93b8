//! Error types for tree induction and prediction.

/// Errors surfaced by fitting, predicting, or scoring a decision tree.
///
/// None of these are recovered internally: induction and prediction are
/// deterministic functions of their inputs, so the caller must fix the
/// input rather than retry.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("shape mismatch: {context}: expected {expected}, got {got}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("entropy requested over an empty or zero-count distribution")]
    EmptyDistribution,

    #[error("resource limit exceeded: {0}")]
    ResourceExhaustion(String),
}
