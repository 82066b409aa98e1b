//! Node command executor interface.
//!
//! The executor is an external collaborator: it performs the actual
//! shell/API command against a node, resolving the execution environment by
//! combining task parameters with the node's provider metadata. This core
//! only depends on the call shape and on the deferred error check of the
//! returned outcome.

use crate::error::TaskError;
use crate::node_action::NodeActionParams;
use crate::types::NodeCommand;

/// Executes one administrative command against one node.
///
/// Calls block until the underlying execution returns; timeout enforcement
/// belongs to the executor or the task tree, not to this interface.
#[async_trait::async_trait]
pub trait NodeCommandExecutor: Send + Sync {
    /// Run `command` against the node named in `params`.
    ///
    /// # Errors
    /// Returns an error when the executor itself cannot perform the call.
    /// Failures of the command proper are carried inside the returned
    /// [`CommandOutcome`] and surface through
    /// [`CommandOutcome::check_for_errors`].
    async fn execute(
        &self,
        command: NodeCommand,
        params: &NodeActionParams,
    ) -> Result<CommandOutcome, TaskError>;
}

/// Result of one command execution.
///
/// A command may be multi-step; sub-errors are collected here and surfaced
/// as a single failure when checked.
#[derive(Debug, Clone, Default)]
pub struct CommandOutcome {
    node_name: String,
    sub_errors: Vec<String>,
}

impl CommandOutcome {
    /// Outcome of a fully successful execution.
    #[must_use]
    pub fn success(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            sub_errors: Vec::new(),
        }
    }

    /// Outcome carrying one or more sub-step failures.
    #[must_use]
    pub fn with_errors(node_name: impl Into<String>, sub_errors: Vec<String>) -> Self {
        Self {
            node_name: node_name.into(),
            sub_errors,
        }
    }

    /// Append a sub-step failure.
    pub fn push_error(&mut self, detail: impl Into<String>) {
        self.sub_errors.push(detail.into());
    }

    /// Collected sub-step failures.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.sub_errors
    }

    /// Surface collected sub-errors as one failure at this boundary.
    ///
    /// # Errors
    /// Returns [`TaskError::CommandFailed`] when any sub-step failed; no-op
    /// otherwise.
    pub fn check_for_errors(&self) -> Result<(), TaskError> {
        if self.sub_errors.is_empty() {
            return Ok(());
        }
        Err(TaskError::CommandFailed {
            node: self.node_name.clone(),
            detail: self.sub_errors.join("; "),
        })
    }
}
