//! End-to-end scenarios for the node action task:
//! runner-driven retries, the escalate/suppress decision, and the
//! executor-side environment assembly from provider metadata.

use commissioner_cloud::{CloudType, ProviderConfig};
use commissioner_core::prelude::*;
use commissioner_test_utils::{
    disk_update_params, tags_update_params, CountingFailureHandler, EnvAssemblingExecutor,
    ScriptedExecutor,
};
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn tags_update_failure_runs_three_attempts_then_escalates_once() {
    init_tracing();
    let executor = Arc::new(ScriptedExecutor::always_failing());
    let handler = Arc::new(CountingFailureHandler::new());
    let runner = TaskRunner::with_handler(handler.clone());

    let action = NodeAction::new(tags_update_params("node-7"), executor.clone());
    let info = runner.submit(&action).await;

    assert_eq!(executor.calls(), 3, "1 initial attempt + 2 retries");
    assert_eq!(info.attempts, 3);
    assert_eq!(info.state, TaskState::Failure);
    assert_eq!(handler.escalations(), 1);
    assert!(executor.seen_commands().iter().all(|c| *c == NodeCommand::TagsUpdate));
}

#[tokio::test]
async fn disk_update_failure_runs_three_attempts_and_suppresses_the_cascade() {
    init_tracing();
    let executor = Arc::new(ScriptedExecutor::always_failing());
    let handler = Arc::new(CountingFailureHandler::new());
    let runner = TaskRunner::with_handler(handler.clone());

    let action = NodeAction::new(disk_update_params("node-7"), executor.clone());
    let info = runner.submit(&action).await;

    assert_eq!(executor.calls(), 3);
    assert_eq!(info.state, TaskState::Failure, "suppression does not erase the failure");
    assert!(info.error.is_some());
    assert_eq!(handler.escalations(), 0);
}

#[tokio::test]
async fn recovery_on_a_retry_ends_the_run_successfully() {
    init_tracing();
    let executor = Arc::new(ScriptedExecutor::failing_times(1));
    let handler = Arc::new(CountingFailureHandler::new());
    let runner = TaskRunner::with_handler(handler.clone());

    let action = NodeAction::new(tags_update_params("node-7"), executor.clone());
    let info = runner.submit(&action).await;

    assert_eq!(executor.calls(), 2);
    assert_eq!(info.state, TaskState::Success);
    assert_eq!(handler.escalations(), 0);
}

#[tokio::test]
async fn missing_command_fails_without_touching_the_executor() {
    init_tracing();
    let executor = Arc::new(ScriptedExecutor::succeeding());
    let handler = Arc::new(CountingFailureHandler::new());
    let runner = TaskRunner::with_handler(handler.clone());

    let params = NodeActionParams::builder("node-7").build().unwrap();
    let action = NodeAction::new(params, executor.clone());
    let info = runner.submit(&action).await;

    assert_eq!(executor.calls(), 0, "config errors never reach the executor");
    assert_eq!(info.attempts, 1, "config errors are not retried");
    assert_eq!(info.state, TaskState::Failure);
    assert_eq!(handler.escalations(), 1, "no command kind means no suppression");
}

#[tokio::test]
async fn run_records_are_retrievable_after_completion() {
    init_tracing();
    let executor = Arc::new(ScriptedExecutor::succeeding());
    let runner = TaskRunner::new();

    let action = NodeAction::new(tags_update_params("node-7"), executor);
    let info = runner.submit(&action).await;

    let stored = runner.get_info(info.id).expect("record retained");
    assert_eq!(stored.task_type, "NodeAction");
    assert_eq!(stored.node_name, "node-7");
    assert_eq!(stored.state, TaskState::Success);
}

#[tokio::test]
async fn executor_combines_provider_metadata_into_the_environment() {
    init_tracing();
    let section = serde_json::json!({
        "KUBECONFIG": "apiVersion: v1",
        "KUBECONFIG_STORAGE_CLASSES": "ssd",
    });
    let provider =
        ProviderConfig::from_config_section("k8s-east", CloudType::Kubernetes, &section).unwrap();
    let executor = Arc::new(EnvAssemblingExecutor::new(provider));
    let runner = TaskRunner::new();

    let action = NodeAction::new(disk_update_params("node-7"), executor.clone());
    let info = runner.submit(&action).await;
    assert_eq!(info.state, TaskState::Success);

    let env = executor.captured_env().expect("one execution captured");
    assert_eq!(env.get("KUBECONFIG").map(String::as_str), Some("apiVersion: v1"));
    assert_eq!(env.get("KUBECONFIG_STORAGE_CLASSES").map(String::as_str), Some("ssd"));
    assert_eq!(env.get("NODE_NAME").map(String::as_str), Some("node-7"));
    assert_eq!(env.get("COMMAND").map(String::as_str), Some("disk_update"));
    assert_eq!(env.get("FORCE").map(String::as_str), Some("true"));
}
