//! # Declarative
//!
//! A framework for declarative reconciliation of cloud resources.
//!
//! This crate provides the core abstractions for describing desired state,
//! fetching actual state, validating the difference, and converging the
//! remote resource to match.
//!
//! ## Core Concepts
//!
//! - **Task**: a descriptor of one remote resource (disk, resource group)
//! - **Pass**: `find` → `normalize` → `changes` → `check_changes` → `render`
//! - **Lifecycle**: how a task takes part in a pass (sync, ignore, validate)
//! - **ExecutionPlan**: tasks grouped into ordered stages
//! - **Executor**: previews, confirms, and reconciles a plan in parallel
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{run, Context};
//!
//! let client = azkit::Client::in_memory("eastus");
//! let ctx = Context::new(&client, "my-cluster");
//!
//! let mut disk = Disk::new("etcd", "rg", 32);
//! let report = run(&mut disk, &ctx)?;
//! assert_eq!(report.result, ApplyResult::Created);
//! ```
//!
//! ## Callback Traits
//!
//! - [`ProgressCallback`]: Receives progress updates
//! - [`ConfirmCallback`]: Handles user confirmations
//!
//! This allows the crate to be used without hard dependencies on
//! specific UI frameworks or cloud SDKs.

pub mod context;
pub mod diff;
pub mod error;
pub mod executor;
pub mod planner;
pub mod task;
pub mod types;

// Re-export main types at crate root
pub use context::{AutoConfirm, AutoDecline, ConfirmCallback, Context, NoProgress, ProgressCallback};
pub use diff::{FieldChange, PlanSummary, changed, changed_map, describe, group_by_kind};
pub use error::{Error, Result};
pub use executor::{execute, preview};
pub use planner::{ExecutionPlan, Stage};
pub use task::{BoxedTask, DynTask, Task, run};
pub use types::{
    ApplyResult, ExecuteOptions, ExecuteSummary, Lifecycle, PassPhase, PassReport, PlannedAction,
};
