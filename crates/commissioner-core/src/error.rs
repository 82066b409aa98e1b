//! Error types for the task framework.
//!
//! The taxonomy drives the retry loop:
//! - configuration errors are fatal and never retried;
//! - execution errors are retryable up to the task's declared limit.

/// Failures surfaced by node tasks.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// The task was constructed with invalid or missing parameters.
    #[error("configuration error: {0}")]
    Config(String),

    /// The node command executor reported a failed execution.
    #[error("command failed on node {node}: {detail}")]
    CommandFailed {
        /// Target node of the failed command.
        node: String,
        /// Aggregated sub-error detail.
        detail: String,
    },

    /// The node command executor could not be reached at all.
    #[error("executor unavailable: {0}")]
    ExecutorUnavailable(String),
}

impl TaskError {
    /// Check if the task tree may retry after this error.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CommandFailed { .. } | Self::ExecutorUnavailable(_))
    }
}
