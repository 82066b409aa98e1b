//! Testing utilities for the commissioner workspace.
//!
//! Shared test doubles and fixtures: a scripted executor, a counting
//! failure handler, and an executor that assembles the provisioning
//! environment from a provider record the way a real executor would.

#![allow(missing_docs)]

use commissioner_cloud::ProviderConfig;
use commissioner_core::{
    CommandOutcome, FailureHandler, NodeActionParams, NodeCommand, NodeCommandExecutor, TaskError,
    TaskInfo,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// Executor double that fails a scripted number of leading attempts and
/// records every command it sees.
pub struct ScriptedExecutor {
    fail_first: u32,
    calls: AtomicU32,
    seen: Mutex<Vec<NodeCommand>>,
}

impl ScriptedExecutor {
    pub fn succeeding() -> Self {
        Self::failing_times(0)
    }

    pub fn always_failing() -> Self {
        Self::failing_times(u32::MAX)
    }

    /// Fail the first `n` attempts via the deferred error check, then
    /// succeed.
    pub fn failing_times(n: u32) -> Self {
        Self {
            fail_first: n,
            calls: AtomicU32::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_commands(&self) -> Vec<NodeCommand> {
        self.seen.lock().clone()
    }
}

#[async_trait::async_trait]
impl NodeCommandExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        command: NodeCommand,
        params: &NodeActionParams,
    ) -> Result<CommandOutcome, TaskError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(command);
        if call < self.fail_first {
            Ok(CommandOutcome::with_errors(
                params.node_name.clone(),
                vec!["scripted failure".to_string()],
            ))
        } else {
            Ok(CommandOutcome::success(params.node_name.clone()))
        }
    }
}

/// Failure cascade double that only counts invocations.
#[derive(Default)]
pub struct CountingFailureHandler {
    escalations: AtomicU32,
}

impl CountingFailureHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn escalations(&self) -> u32 {
        self.escalations.load(Ordering::SeqCst)
    }
}

impl FailureHandler for CountingFailureHandler {
    fn escalate(&self, _info: &TaskInfo, _cause: &TaskError) {
        self.escalations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Executor double that resolves the execution environment the way a real
/// executor does: the provider record's metadata plus per-command entries
/// derived from the params.
pub struct EnvAssemblingExecutor {
    provider: ProviderConfig,
    captured: Mutex<Option<BTreeMap<String, String>>>,
}

impl EnvAssemblingExecutor {
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            captured: Mutex::new(None),
        }
    }

    /// Environment assembled for the most recent execution.
    pub fn captured_env(&self) -> Option<BTreeMap<String, String>> {
        self.captured.lock().clone()
    }
}

#[async_trait::async_trait]
impl NodeCommandExecutor for EnvAssemblingExecutor {
    async fn execute(
        &self,
        command: NodeCommand,
        params: &NodeActionParams,
    ) -> Result<CommandOutcome, TaskError> {
        let mut env = self.provider.env_vars();
        env.insert("NODE_NAME".to_string(), params.node_name.clone());
        env.insert("COMMAND".to_string(), command.to_string());
        if params.force {
            env.insert("FORCE".to_string(), "true".to_string());
        }
        *self.captured.lock() = Some(env);
        Ok(CommandOutcome::success(params.node_name.clone()))
    }
}

/// Params fixture for a tag-update action.
pub fn tags_update_params(node_name: &str) -> NodeActionParams {
    NodeActionParams::builder(node_name)
        .command(NodeCommand::TagsUpdate)
        .tag("env", "prod")
        .delete_tags("owner")
        .build()
        .expect("fixture params are valid")
}

/// Params fixture for a disk-update action.
pub fn disk_update_params(node_name: &str) -> NodeActionParams {
    NodeActionParams::builder(node_name)
        .command(NodeCommand::DiskUpdate)
        .force(true)
        .build()
        .expect("fixture params are valid")
}
