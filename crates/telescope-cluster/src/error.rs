//! Error types for cluster access.

use thiserror::Error;

/// Result type alias for cluster operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors surfaced by cluster operations.
///
/// There is deliberately no retry or recovery here: failures are
/// returned to the web layer, which logs them and renders an error.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("problem {0:?} not found")]
    ProblemNotFound(String),

    #[error("problem environment {0:?} not found")]
    EnvironmentNotFound(String),

    #[error("worker {0:?} not found")]
    WorkerNotFound(String),

    #[error("cluster api error: {0}")]
    Api(#[from] kube::Error),
}

impl ClusterError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ClusterError::ProblemNotFound(_)
                | ClusterError::EnvironmentNotFound(_)
                | ClusterError::WorkerNotFound(_)
        )
    }
}
