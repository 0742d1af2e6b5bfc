//! Reconciliation context and callback traits
//!
//! These traits allow the declarative crate to be used without
//! depending on a specific cloud client, progress display or prompt.

use crate::types::{ApplyResult, PassReport};
use anyhow::Result;

/// Context passed to every task operation
///
/// `C` is the cloud gateway the tasks talk to. The context only borrows it,
/// so one gateway can serve many concurrent passes.
pub struct Context<'a, C: ?Sized> {
    /// Cloud gateway
    pub cloud: &'a C,
    /// Name of the cluster that owns the resources
    pub cluster_name: String,
    /// Whether this is a dry run (no remote mutation)
    pub dry_run: bool,
}

impl<'a, C: ?Sized> Context<'a, C> {
    /// Create a new context for a cluster
    pub fn new(cloud: &'a C, cluster_name: impl Into<String>) -> Self {
        Self {
            cloud,
            cluster_name: cluster_name.into(),
            dry_run: false,
        }
    }

    /// Set whether passes may mutate the cloud
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Borrow this context as a dry run
    pub fn as_dry_run(&self) -> Self {
        Self {
            cloud: self.cloud,
            cluster_name: self.cluster_name.clone(),
            dry_run: true,
        }
    }
}

// Manual impl: deriving would require `C: Clone`.
impl<C: ?Sized> Clone for Context<'_, C> {
    fn clone(&self) -> Self {
        Self {
            cloud: self.cloud,
            cluster_name: self.cluster_name.clone(),
            dry_run: self.dry_run,
        }
    }
}

impl<C: ?Sized> std::fmt::Debug for Context<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("cluster_name", &self.cluster_name)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

/// Progress callback for execution operations
///
/// Implement this trait to receive progress updates during execution.
pub trait ProgressCallback: Send {
    /// Called once with the dry-run reports of every task in the plan
    fn on_preview(&mut self, _reports: &[PassReport]) {}

    /// Called when starting a stage of the plan
    fn on_stage_start(&mut self, name: &str, count: usize);

    /// Called when starting to reconcile a single task
    fn on_task_start(&mut self, kind: &str, id: &str);

    /// Called when a task's pass completes
    fn on_task_complete(&mut self, kind: &str, id: &str, result: &ApplyResult);

    /// Called when a stage completes
    fn on_stage_complete(&mut self);
}

/// Confirmation callback for user interaction
///
/// Implement this trait to handle user confirmations.
pub trait ConfirmCallback: Send {
    /// Ask the user to confirm an action
    ///
    /// # Returns
    /// `true` if the user confirmed, `false` otherwise
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_stage_start(&mut self, _name: &str, _count: usize) {}
    fn on_task_start(&mut self, _kind: &str, _id: &str) {}
    fn on_task_complete(&mut self, _kind: &str, _id: &str, _result: &ApplyResult) {}
    fn on_stage_complete(&mut self) {}
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}
