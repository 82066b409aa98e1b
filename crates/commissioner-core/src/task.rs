//! The task seam between the framework and individual task types.
//!
//! Tasks implement [`NodeTask`]; the runner drives the retry loop and hands
//! terminal failures back through [`NodeTask::on_failure`] together with the
//! framework's [`FailureHandler`]. A task that wants the default cascade
//! simply forwards; a task may also swallow the escalation while the run
//! record still shows the failure.

use crate::error::TaskError;
use crate::types::TaskInfo;

/// One administrative step the task tree can schedule.
#[async_trait::async_trait]
pub trait NodeTask: Send + Sync {
    /// Task-type name for run records and logs.
    fn name(&self) -> &'static str;

    /// Node this task targets.
    fn target_node(&self) -> &str;

    /// Perform one attempt. Success is "did not raise".
    async fn run(&self) -> Result<(), TaskError>;

    /// Extra attempts the runner may make after the first failure.
    fn retry_limit(&self) -> u32 {
        0
    }

    /// Invoked exactly once after the final attempt has failed.
    ///
    /// The default forwards to the framework's escalation cascade.
    fn on_failure(&self, info: &TaskInfo, cause: &TaskError, handler: &dyn FailureHandler) {
        handler.escalate(info, cause);
    }
}

/// The default failure cascade owned by the task tree framework.
///
/// Implementations mark lifecycle state, raise alerts, trigger remediation.
pub trait FailureHandler: Send + Sync {
    /// Run the cascade for a terminally failed task.
    fn escalate(&self, info: &TaskInfo, cause: &TaskError);
}

/// Cascade implementation that records the failure through `tracing`.
///
/// Outer deployments install richer handlers (alerting, node lifecycle
/// transitions); the framework default keeps the failure diagnosable.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingFailureHandler;

impl FailureHandler for LoggingFailureHandler {
    fn escalate(&self, info: &TaskInfo, cause: &TaskError) {
        tracing::error!(
            task = %info.id,
            task_type = %info.task_type,
            node = %info.node_name,
            attempts = info.attempts,
            error = %cause,
            "task failed terminally, running failure cascade"
        );
    }
}
