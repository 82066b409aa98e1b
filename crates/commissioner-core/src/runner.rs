//! The task runner: retry orchestration and run-record bookkeeping.
//!
//! The runner is the sole owner of retries. Tasks report a retry limit and
//! never retry internally; the runner performs up to `retry_limit() + 1`
//! strictly sequential attempts, stops at the first success, and invokes
//! the task's failure hook exactly once after the final attempt fails.

use crate::error::TaskError;
use crate::task::{FailureHandler, LoggingFailureHandler, NodeTask};
use crate::types::{TaskId, TaskInfo, TaskState};
use dashmap::DashMap;
use std::sync::Arc;

/// Drives task attempts and records their outcomes.
pub struct TaskRunner {
    handler: Arc<dyn FailureHandler>,
    records: DashMap<TaskId, TaskInfo>,
}

impl TaskRunner {
    /// Runner with the default logging cascade.
    #[must_use]
    pub fn new() -> Self {
        Self::with_handler(Arc::new(LoggingFailureHandler))
    }

    /// Runner with a custom failure cascade.
    #[must_use]
    pub fn with_handler(handler: Arc<dyn FailureHandler>) -> Self {
        Self {
            handler,
            records: DashMap::new(),
        }
    }

    /// Run a task to its terminal state and return the run record.
    ///
    /// Attempts never overlap and carry nothing over from one another; a
    /// non-retryable error ends the loop immediately. Suppression by the
    /// task's failure hook does not erase the recorded failure.
    pub async fn submit(&self, task: &dyn NodeTask) -> TaskInfo {
        let mut info = TaskInfo::new(task.name(), task.target_node());
        info.state = TaskState::Running;

        let limit = task.retry_limit();
        let mut outcome = Ok(());
        for attempt in 0..=limit {
            info.attempts = attempt + 1;
            match task.run().await {
                Ok(()) => {
                    outcome = Ok(());
                    break;
                }
                Err(cause) => {
                    tracing::warn!(
                        task = %info.id,
                        task_type = %info.task_type,
                        node = %info.node_name,
                        attempt = attempt + 1,
                        max_attempts = limit + 1,
                        error = %cause,
                        "task attempt failed"
                    );
                    let retryable = cause.is_retryable();
                    outcome = Err(cause);
                    if !retryable {
                        break;
                    }
                }
            }
        }

        match outcome {
            Ok(()) => info.mark_success(),
            Err(cause) => {
                // bookkeeping first; the task only decides whether the
                // cascade runs on top of the recorded failure
                info.mark_failure(&cause);
                task.on_failure(&info, &cause, self.handler.as_ref());
            }
        }

        self.records.insert(info.id, info.clone());
        info
    }

    /// Look up the run record of a completed task.
    #[must_use]
    pub fn get_info(&self, id: TaskId) -> Option<TaskInfo> {
        self.records.get(&id).map(|entry| entry.clone())
    }

    /// Number of retained run records.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

impl Default for TaskRunner {
    fn default() -> Self {
        Self::new()
    }
}
