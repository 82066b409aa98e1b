//! Core types for the task framework:
//! - task identifiers and run records
//! - the closed enumeration of node command kinds
//! - the kind-to-failure-policy table

use crate::error::TaskError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique task run identifier (ULID for sortability).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub Ulid);

impl TaskId {
    /// Generate new task ID.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of one task run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Run record created, no attempt started.
    Created,
    /// An attempt is in flight.
    Running,
    /// All attempts exhausted or a fatal error occurred.
    Failure,
    /// An attempt succeeded.
    Success,
}

/// Run record for one submitted task.
///
/// Owned by the runner's bookkeeping; tasks only read it inside their
/// failure hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInfo {
    /// Run identifier.
    pub id: TaskId,
    /// Task-type name, for diagnostics.
    pub task_type: String,
    /// Target cluster node.
    pub node_name: String,
    /// Current lifecycle state.
    pub state: TaskState,
    /// Attempts performed so far.
    pub attempts: u32,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
    /// Terminal completion time, success or failure.
    pub completed_at: Option<DateTime<Utc>>,
    /// Terminal error message when the run failed.
    pub error: Option<String>,
}

impl TaskInfo {
    /// Create a fresh run record.
    #[must_use]
    pub fn new(task_type: impl Into<String>, node_name: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            task_type: task_type.into(),
            node_name: node_name.into(),
            state: TaskState::Created,
            attempts: 0,
            created_at: Utc::now(),
            completed_at: None,
            error: None,
        }
    }

    /// Mark the run as terminally successful.
    pub fn mark_success(&mut self) {
        self.state = TaskState::Success;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the run as terminally failed.
    pub fn mark_failure(&mut self, cause: &TaskError) {
        self.state = TaskState::Failure;
        self.completed_at = Some(Utc::now());
        self.error = Some(cause.to_string());
    }
}

/// Administrative command kinds executed against a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCommand {
    /// Provision the backing instance.
    Provision,
    /// Push configuration onto the node.
    Configure,
    /// Query instance details.
    List,
    /// Start/stop server processes.
    Control,
    /// Tear the instance down.
    Destroy,
    /// Add or remove instance tags.
    TagsUpdate,
    /// Resize attached disks.
    DiskUpdate,
    /// Validate the node before provisioning.
    Precheck,
}

/// What the task tree does when a task run terminally fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Run the default failure cascade (lifecycle marking, alerting).
    Escalate,
    /// Record the failure but skip the cascade.
    Suppress,
}

impl NodeCommand {
    /// The kind-to-policy table for terminal failures.
    ///
    /// Exhaustive on purpose: adding a command kind forces an explicit
    /// decision about its escalation policy. A failed disk resize must not
    /// trigger the cascade's node reboot, so `DiskUpdate` is the one
    /// suppressed kind.
    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        match self {
            NodeCommand::DiskUpdate => FailurePolicy::Suppress,
            NodeCommand::Provision
            | NodeCommand::Configure
            | NodeCommand::List
            | NodeCommand::Control
            | NodeCommand::Destroy
            | NodeCommand::TagsUpdate
            | NodeCommand::Precheck => FailurePolicy::Escalate,
        }
    }

    /// Stable name for logging.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeCommand::Provision => "provision",
            NodeCommand::Configure => "configure",
            NodeCommand::List => "list",
            NodeCommand::Control => "control",
            NodeCommand::Destroy => "destroy",
            NodeCommand::TagsUpdate => "tags_update",
            NodeCommand::DiskUpdate => "disk_update",
            NodeCommand::Precheck => "precheck",
        }
    }
}

impl std::fmt::Display for NodeCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
