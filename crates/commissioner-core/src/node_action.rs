//! The node action task: one administrative command against one node.

use crate::error::TaskError;
use crate::executor::NodeCommandExecutor;
use crate::task::{FailureHandler, NodeTask};
use crate::types::{FailurePolicy, NodeCommand, TaskInfo};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Extra attempts the task tree may make after a failed node action.
pub const NODE_ACTION_RETRY_LIMIT: u32 = 2;

/// Bound parameters of one node action.
///
/// Immutable once built; the owning task holds them for its whole lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeActionParams {
    /// Target cluster node. Never empty.
    pub node_name: String,
    /// Command kind to execute. Must be set before execution; absence is a
    /// configuration error, not a runtime failure.
    pub command: Option<NodeCommand>,
    /// CSV of tag keys to delete; semantically a set, empty means none.
    #[serde(default)]
    pub delete_tags: String,
    /// Tag key/value pairs for additive tag operations.
    #[serde(default)]
    pub tags: HashMap<String, String>,
    /// Bypass executor safety checks.
    #[serde(default)]
    pub force: bool,
}

impl NodeActionParams {
    /// Start building parameters for `node_name`.
    #[must_use]
    pub fn builder(node_name: impl Into<String>) -> NodeActionParamsBuilder {
        NodeActionParamsBuilder {
            node_name: node_name.into(),
            command: None,
            delete_tags: String::new(),
            tags: HashMap::new(),
            force: false,
        }
    }

    /// Tag keys to delete, parsed from the CSV field.
    #[must_use]
    pub fn delete_tag_keys(&self) -> BTreeSet<&str> {
        self.delete_tags
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .collect()
    }
}

/// Builder for [`NodeActionParams`].
#[derive(Debug, Clone)]
pub struct NodeActionParamsBuilder {
    node_name: String,
    command: Option<NodeCommand>,
    delete_tags: String,
    tags: HashMap<String, String>,
    force: bool,
}

impl NodeActionParamsBuilder {
    /// Set the command kind.
    #[must_use]
    pub fn command(mut self, command: NodeCommand) -> Self {
        self.command = Some(command);
        self
    }

    /// Set the CSV of tag keys to delete.
    #[must_use]
    pub fn delete_tags(mut self, csv: impl Into<String>) -> Self {
        self.delete_tags = csv.into();
        self
    }

    /// Add one tag.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Replace the tag mapping.
    #[must_use]
    pub fn tags(mut self, tags: HashMap<String, String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the force flag.
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Finish building.
    ///
    /// # Errors
    /// Returns [`TaskError::Config`] when the node name is empty. The
    /// command kind may stay unset here; it is checked before execution.
    pub fn build(self) -> Result<NodeActionParams, TaskError> {
        if self.node_name.trim().is_empty() {
            return Err(TaskError::Config("node action requires a node name".to_string()));
        }
        Ok(NodeActionParams {
            node_name: self.node_name,
            command: self.command,
            delete_tags: self.delete_tags,
            tags: self.tags,
            force: self.force,
        })
    }
}

/// Task that delegates one administrative command to the node command
/// executor and owns the failure-escalation decision for that step.
pub struct NodeAction {
    params: NodeActionParams,
    executor: Arc<dyn NodeCommandExecutor>,
}

impl NodeAction {
    /// Bind parameters to an executor.
    #[must_use]
    pub fn new(params: NodeActionParams, executor: Arc<dyn NodeCommandExecutor>) -> Self {
        Self { params, executor }
    }

    /// Bound parameters.
    #[inline]
    #[must_use]
    pub fn params(&self) -> &NodeActionParams {
        &self.params
    }

    fn command(&self) -> Result<NodeCommand, TaskError> {
        self.params.command.ok_or_else(|| {
            TaskError::Config(format!(
                "node action against {} has no command kind",
                self.params.node_name
            ))
        })
    }
}

#[async_trait::async_trait]
impl NodeTask for NodeAction {
    fn name(&self) -> &'static str {
        "NodeAction"
    }

    fn target_node(&self) -> &str {
        &self.params.node_name
    }

    async fn run(&self) -> Result<(), TaskError> {
        let command = self.command()?;
        tracing::info!(
            action = self.name(),
            command = %command,
            node = %self.params.node_name,
            "running node action"
        );

        let outcome = self.executor.execute(command, &self.params).await?;
        // deferred sub-errors surface here, before run() returns
        outcome.check_for_errors()
    }

    fn retry_limit(&self) -> u32 {
        NODE_ACTION_RETRY_LIMIT
    }

    fn on_failure(&self, info: &TaskInfo, cause: &TaskError, handler: &dyn FailureHandler) {
        // keyed on the command kind alone; force/tags must not matter
        let policy = self
            .params
            .command
            .map_or(FailurePolicy::Escalate, |command| command.failure_policy());
        match policy {
            FailurePolicy::Suppress => {
                // a failed disk resize must not trigger the cascade's reboot
                tracing::warn!(
                    task = %info.id,
                    node = %self.params.node_name,
                    error = %cause,
                    "failure cascade suppressed for this command kind"
                );
            }
            FailurePolicy::Escalate => handler.escalate(info, cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::CommandOutcome;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FixedOutcomeExecutor {
        calls: AtomicU32,
        fail: bool,
    }

    impl FixedOutcomeExecutor {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail,
            }
        }
    }

    #[async_trait::async_trait]
    impl NodeCommandExecutor for FixedOutcomeExecutor {
        async fn execute(
            &self,
            _command: NodeCommand,
            params: &NodeActionParams,
        ) -> Result<CommandOutcome, TaskError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Ok(CommandOutcome::with_errors(
                    params.node_name.clone(),
                    vec!["simulated failure".to_string()],
                ))
            } else {
                Ok(CommandOutcome::success(params.node_name.clone()))
            }
        }
    }

    struct CountingHandler {
        escalations: AtomicU32,
    }

    impl CountingHandler {
        fn new() -> Self {
            Self {
                escalations: AtomicU32::new(0),
            }
        }
    }

    impl FailureHandler for CountingHandler {
        fn escalate(&self, _info: &TaskInfo, _cause: &TaskError) {
            self.escalations.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn params(command: NodeCommand) -> NodeActionParams {
        NodeActionParams::builder("node-1").command(command).build().unwrap()
    }

    fn failed_info() -> TaskInfo {
        let mut info = TaskInfo::new("NodeAction", "node-1");
        info.mark_failure(&TaskError::CommandFailed {
            node: "node-1".to_string(),
            detail: "simulated".to_string(),
        });
        info
    }

    #[test]
    fn builder_rejects_empty_node_name() {
        let result = NodeActionParams::builder("  ").command(NodeCommand::List).build();
        assert!(matches!(result, Err(TaskError::Config(_))));
    }

    #[test]
    fn delete_tags_csv_parses_as_a_set() {
        let params = NodeActionParams::builder("node-1")
            .command(NodeCommand::TagsUpdate)
            .delete_tags("env, owner,env,")
            .build()
            .unwrap();
        let keys = params.delete_tag_keys();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("env"));
        assert!(keys.contains("owner"));

        let none = NodeActionParams::builder("node-1").build().unwrap();
        assert!(none.delete_tag_keys().is_empty());
    }

    #[test]
    fn retry_limit_is_constant_across_kinds_and_parameters() {
        let executor = Arc::new(FixedOutcomeExecutor::new(false));
        for command in [
            NodeCommand::Provision,
            NodeCommand::Configure,
            NodeCommand::List,
            NodeCommand::Control,
            NodeCommand::Destroy,
            NodeCommand::TagsUpdate,
            NodeCommand::DiskUpdate,
            NodeCommand::Precheck,
        ] {
            let params = NodeActionParams::builder("node-1")
                .command(command)
                .force(true)
                .tag("env", "prod")
                .build()
                .unwrap();
            let action = NodeAction::new(params, executor.clone());
            assert_eq!(action.retry_limit(), 2);
        }
    }

    #[tokio::test]
    async fn missing_command_is_a_config_error_before_any_execution() {
        let executor = Arc::new(FixedOutcomeExecutor::new(false));
        let params = NodeActionParams::builder("node-1").build().unwrap();
        let action = NodeAction::new(params, executor.clone());

        let err = action.run().await.unwrap_err();
        assert!(matches!(err, TaskError::Config(_)));
        assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn deferred_executor_errors_surface_from_run() {
        let executor = Arc::new(FixedOutcomeExecutor::new(true));
        let action = NodeAction::new(params(NodeCommand::TagsUpdate), executor);

        let err = action.run().await.unwrap_err();
        assert!(matches!(err, TaskError::CommandFailed { .. }));
    }

    #[tokio::test]
    async fn successful_run_raises_nothing() {
        let executor = Arc::new(FixedOutcomeExecutor::new(false));
        let action = NodeAction::new(params(NodeCommand::Control), executor.clone());

        action.run().await.unwrap();
        assert_eq!(executor.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failure_hook_escalates_for_non_disk_commands() {
        let executor = Arc::new(FixedOutcomeExecutor::new(true));
        let cause = TaskError::CommandFailed {
            node: "node-1".to_string(),
            detail: "simulated".to_string(),
        };

        for command in [
            NodeCommand::Provision,
            NodeCommand::Configure,
            NodeCommand::List,
            NodeCommand::Control,
            NodeCommand::Destroy,
            NodeCommand::TagsUpdate,
            NodeCommand::Precheck,
        ] {
            let action = NodeAction::new(params(command), executor.clone());
            let handler = CountingHandler::new();
            action.on_failure(&failed_info(), &cause, &handler);
            assert_eq!(handler.escalations.load(Ordering::SeqCst), 1, "kind {command}");
        }
    }

    #[test]
    fn failure_hook_suppresses_cascade_for_disk_update() {
        let executor = Arc::new(FixedOutcomeExecutor::new(true));
        let cause = TaskError::CommandFailed {
            node: "node-1".to_string(),
            detail: "simulated".to_string(),
        };

        // force/tags/delete_tags must not influence the decision
        let params = NodeActionParams::builder("node-1")
            .command(NodeCommand::DiskUpdate)
            .force(true)
            .tag("env", "prod")
            .delete_tags("owner")
            .build()
            .unwrap();
        let action = NodeAction::new(params, executor);
        let handler = CountingHandler::new();
        action.on_failure(&failed_info(), &cause, &handler);
        assert_eq!(handler.escalations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failure_hook_reads_but_never_mutates_the_record() {
        let executor = Arc::new(FixedOutcomeExecutor::new(true));
        let action = NodeAction::new(params(NodeCommand::TagsUpdate), executor);
        let info = failed_info();
        let before = info.clone();
        let cause = TaskError::CommandFailed {
            node: "node-1".to_string(),
            detail: "simulated".to_string(),
        };

        action.on_failure(&info, &cause, &CountingHandler::new());
        assert_eq!(info.state, before.state);
        assert_eq!(info.attempts, before.attempts);
    }
}
