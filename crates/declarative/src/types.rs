//! Core types for declarative resource reconciliation

use crate::diff::FieldChange;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a task takes part in a reconciliation pass
///
/// Deserialization goes through [`FromStr`], so `"sync"` and `"Sync"` are
/// the same value everywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Lifecycle {
    /// Create or update the resource to match
    #[default]
    Sync,
    /// Leave the resource alone; the pass is skipped
    Ignore,
    /// The resource must exist and match; any difference is an error
    ExistsAndValidates,
    /// The resource must exist; differences are reported but not applied
    ExistsAndWarnIfChanges,
}

impl Lifecycle {
    /// Every lifecycle value
    pub const ALL: [Self; 4] = [
        Self::Sync,
        Self::Ignore,
        Self::ExistsAndValidates,
        Self::ExistsAndWarnIfChanges,
    ];

    /// Name as written in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sync => "Sync",
            Self::Ignore => "Ignore",
            Self::ExistsAndValidates => "ExistsAndValidates",
            Self::ExistsAndWarnIfChanges => "ExistsAndWarnIfChanges",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lifecycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown lifecycle: {s}"))
    }
}

impl TryFrom<String> for Lifecycle {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Where a reconciliation pass stands
///
/// `Pending -> Found | NotFound -> Normalized -> Validated -> Applied`,
/// with `Rejected` for an illegal change set and `Failed` for a gateway
/// error. `Applied`, `Rejected` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassPhase {
    Pending,
    Found,
    NotFound,
    Normalized,
    Validated,
    Applied,
    Rejected,
    Failed,
}

impl PassPhase {
    /// Check if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Applied | Self::Rejected | Self::Failed)
    }

    /// Check if moving to `next` is a legal transition
    pub fn can_advance_to(self, next: PassPhase) -> bool {
        match (self, next) {
            (Self::Pending, Self::Found | Self::NotFound) => true,
            (Self::Found | Self::NotFound, Self::Normalized) => true,
            (Self::Normalized, Self::Validated | Self::Rejected) => true,
            (Self::Validated, Self::Applied | Self::Rejected) => true,
            (current, Self::Failed) => !current.is_terminal(),
            _ => false,
        }
    }

    /// Terminal phase a pass ends in when it fails with `err`
    pub fn for_error(err: &Error) -> Self {
        if err.is_transport() {
            Self::Failed
        } else {
            Self::Rejected
        }
    }
}

impl fmt::Display for PassPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a pass does, or would do, to the remote resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlannedAction {
    /// Resource is missing and will be created
    Create,
    /// Resource exists and differs
    Update,
    /// Nothing to do
    None,
}

/// Result of a reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// No changes needed
    NoChange,
    /// Resource was created
    Created,
    /// Resource was modified
    Modified,
    /// Pass failed
    Failed { error: String },
    /// Pass was skipped
    Skipped { reason: String },
}

impl ApplyResult {
    /// Check if the result represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Check if the result represents a change
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Created | Self::Modified)
    }
}

/// Outcome of one reconciliation pass over one task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassReport {
    /// Task kind, e.g. "Disk"
    pub kind: String,
    /// Resource identifier
    pub id: String,
    /// Phase the pass ended in
    pub phase: PassPhase,
    /// What the change set called for
    pub action: PlannedAction,
    /// What actually happened
    pub result: ApplyResult,
    /// Field-level description of the change set
    pub changes: Vec<FieldChange>,
}

impl PassReport {
    /// Build the report for a pass that ended in `err`
    pub fn from_error(kind: &str, id: &str, err: &Error) -> Self {
        Self {
            kind: kind.to_string(),
            id: id.to_string(),
            phase: PassPhase::for_error(err),
            action: PlannedAction::None,
            result: ApplyResult::Failed {
                error: err.to_string(),
            },
            changes: Vec::new(),
        }
    }

    /// Whether running this task for real would touch the cloud or fail
    pub fn needs_apply(&self) -> bool {
        self.action != PlannedAction::None || !self.result.is_success()
    }
}

/// Summary of execution results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub created: usize,
    pub modified: usize,
    pub skipped: usize,
    pub failed: usize,
    pub no_change: usize,
}

impl ExecuteSummary {
    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.modified
    }

    /// Check if execution was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of tasks processed
    pub fn total(&self) -> usize {
        self.created + self.modified + self.skipped + self.failed + self.no_change
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: &ExecuteSummary) {
        self.created += other.created;
        self.modified += other.modified;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.no_change += other.no_change;
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::NoChange => self.no_change += 1,
            ApplyResult::Created => self.created += 1,
            ApplyResult::Modified => self.modified += 1,
            ApplyResult::Failed { .. } => self.failed += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// Options for execution
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Don't make changes, just show what would happen
    pub dry_run: bool,
    /// Number of parallel passes within a stage
    pub jobs: usize,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            jobs: 4,
        }
    }
}
