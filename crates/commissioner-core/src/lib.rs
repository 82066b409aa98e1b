//! Node administration task framework.
//!
//! One task = one administrative command against one cluster node,
//! delegated to an external node command executor. This crate owns the
//! pieces of that contract the orchestrator depends on:
//! - the [`NodeTask`] seam ({run, retry limit, failure hook}) driven by the
//!   [`TaskRunner`] retry loop;
//! - the [`NodeAction`] task with its bound [`NodeActionParams`];
//! - the closed [`NodeCommand`] enumeration and its explicit
//!   kind-to-escalation-policy table;
//! - the [`NodeCommandExecutor`] interface and the deferred-error
//!   [`CommandOutcome`] check.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use commissioner_core::prelude::*;
//!
//! let params = NodeActionParams::builder("node-1")
//!     .command(NodeCommand::TagsUpdate)
//!     .tag("env", "prod")
//!     .build()?;
//! let action = NodeAction::new(params, executor);
//!
//! let runner = TaskRunner::new();
//! let info = runner.submit(&action).await;
//! ```

pub mod error;
pub mod executor;
pub mod node_action;
pub mod runner;
pub mod task;
pub mod types;

pub use error::TaskError;
pub use executor::{CommandOutcome, NodeCommandExecutor};
pub use node_action::{NodeAction, NodeActionParams, NodeActionParamsBuilder, NODE_ACTION_RETRY_LIMIT};
pub use runner::TaskRunner;
pub use task::{FailureHandler, LoggingFailureHandler, NodeTask};
pub use types::{FailurePolicy, NodeCommand, TaskId, TaskInfo, TaskState};

/// Convenience re-exports.
pub mod prelude {
    pub use crate::error::TaskError;
    pub use crate::executor::{CommandOutcome, NodeCommandExecutor};
    pub use crate::node_action::{NodeAction, NodeActionParams, NODE_ACTION_RETRY_LIMIT};
    pub use crate::runner::TaskRunner;
    pub use crate::task::{FailureHandler, LoggingFailureHandler, NodeTask};
    pub use crate::types::{FailurePolicy, NodeCommand, TaskId, TaskInfo, TaskState};
}
