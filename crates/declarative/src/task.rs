//! Task trait and the reconciliation pass
//!
//! A task is a descriptor of one remote resource. A pass converges the
//! resource to the descriptor in a fixed order:
//!
//! 1. `find` fetches the actual state (`None` when it does not exist)
//! 2. `normalize` fills context-dependent values into the descriptor
//! 3. `changes` diffs actual against expected
//! 4. `check_changes` rejects illegal change sets
//! 5. `render` issues the single create-or-update call
//!
//! Validation always happens before the first mutating call, so a
//! rejected pass leaves the cloud untouched.

use crate::context::Context;
use crate::diff::{FieldChange, describe};
use crate::error::{Error, Result};
use crate::types::{ApplyResult, Lifecycle, PassPhase, PassReport, PlannedAction};
use serde::Serialize;
use std::fmt;

/// Core trait for reconcilable resources
///
/// Implementors are plain data: every optional desired value is an
/// `Option`, and `None` means "don't care".
pub trait Task: Clone + fmt::Debug + Send + Sync + Serialize {
    /// Cloud gateway the task talks to
    type Cloud: ?Sized + Sync;

    /// Kind name used in reports and errors, e.g. "Disk"
    const KIND: &'static str;

    /// Resource name, if set
    fn name(&self) -> Option<&str>;

    /// Identifier shown to users
    fn id(&self) -> String {
        self.name().unwrap_or("<unnamed>").to_string()
    }

    /// How this task takes part in a pass
    fn lifecycle(&self) -> Lifecycle {
        Lifecycle::Sync
    }

    /// Fetch the actual state of the resource
    ///
    /// Returns `Ok(None)` when the resource does not exist. Gateway errors
    /// other than "not found" are returned, never swallowed. The returned
    /// descriptor always has a name and carries over this task's lifecycle.
    fn find(&self, ctx: &Context<'_, Self::Cloud>) -> Result<Option<Self>>;

    /// Fill context-dependent values in place; must be idempotent
    fn normalize(&mut self, ctx: &Context<'_, Self::Cloud>) -> Result<()>;

    /// Fields of `expected` that are set and differ from `actual`
    fn changes(actual: &Self, expected: &Self) -> Option<Self>;

    /// Decide whether a change set may be applied
    ///
    /// Pure: no remote calls, no mutation.
    fn check_changes(actual: Option<&Self>, expected: &Self, changes: Option<&Self>) -> Result<()>;

    /// Issue the create-or-update call and return what the cloud stored
    fn render(
        ctx: &Context<'_, Self::Cloud>,
        actual: Option<&Self>,
        expected: &Self,
        changes: &Self,
    ) -> Result<Self>;

    /// Take in the server-observed state after a successful render
    fn merge_observed(&mut self, observed: Self) {
        *self = observed;
    }
}

struct Pass {
    kind: &'static str,
    id: String,
    phase: PassPhase,
}

impl Pass {
    fn new(kind: &'static str, id: String) -> Self {
        Self {
            kind,
            id,
            phase: PassPhase::Pending,
        }
    }

    fn advance(&mut self, next: PassPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal pass transition {} -> {}",
            self.phase,
            next
        );
        log::trace!("{} {}: {} -> {}", self.kind, self.id, self.phase, next);
        self.phase = next;
    }

    fn finish(
        self,
        action: PlannedAction,
        result: ApplyResult,
        changes: Vec<FieldChange>,
    ) -> PassReport {
        PassReport {
            kind: self.kind.to_string(),
            id: self.id,
            phase: self.phase,
            action,
            result,
            changes,
        }
    }
}

/// Run one reconciliation pass over `task`
///
/// On success the task holds the server-observed state. On error nothing
/// was rendered unless the error came from the render call itself.
pub fn run<T: Task>(task: &mut T, ctx: &Context<'_, T::Cloud>) -> Result<PassReport> {
    let lifecycle = Task::lifecycle(task);
    let mut pass = Pass::new(T::KIND, Task::id(task));

    if lifecycle == Lifecycle::Ignore {
        log::debug!("{} {}: lifecycle is Ignore, skipping", T::KIND, pass.id);
        return Ok(pass.finish(
            PlannedAction::None,
            ApplyResult::Skipped {
                reason: "lifecycle is Ignore".to_string(),
            },
            Vec::new(),
        ));
    }

    let actual = task.find(ctx)?;
    pass.advance(if actual.is_some() {
        PassPhase::Found
    } else {
        PassPhase::NotFound
    });

    task.normalize(ctx)?;
    pass.advance(PassPhase::Normalized);

    let changes = match &actual {
        None => Some(task.clone()),
        Some(a) => T::changes(a, task),
    };
    let action = match (&actual, &changes) {
        (None, _) => PlannedAction::Create,
        (Some(_), Some(_)) => PlannedAction::Update,
        (Some(_), None) => PlannedAction::None,
    };
    let described = changes
        .as_ref()
        .map(|c| describe(actual.as_ref(), c))
        .unwrap_or_default();

    T::check_changes(actual.as_ref(), task, changes.as_ref())?;
    pass.advance(PassPhase::Validated);

    match lifecycle {
        Lifecycle::ExistsAndValidates | Lifecycle::ExistsAndWarnIfChanges if actual.is_none() => {
            return Err(Error::Lifecycle {
                kind: T::KIND,
                id: pass.id,
                lifecycle,
                reason: "resource does not exist".to_string(),
            });
        }
        Lifecycle::ExistsAndValidates if changes.is_some() => {
            return Err(Error::Lifecycle {
                kind: T::KIND,
                id: pass.id,
                lifecycle,
                reason: format!("{} field(s) differ", described.len().max(1)),
            });
        }
        Lifecycle::ExistsAndWarnIfChanges if changes.is_some() => {
            for change in &described {
                log::warn!("{} {}: {}", T::KIND, pass.id, change);
            }
            return Ok(pass.finish(
                PlannedAction::None,
                ApplyResult::Skipped {
                    reason: "lifecycle is ExistsAndWarnIfChanges".to_string(),
                },
                described,
            ));
        }
        _ => {}
    }

    let Some(changes) = changes else {
        log::debug!("{} {}: no changes", T::KIND, pass.id);
        pass.advance(PassPhase::Applied);
        return Ok(pass.finish(action, ApplyResult::NoChange, described));
    };

    if ctx.dry_run {
        return Ok(pass.finish(
            action,
            ApplyResult::Skipped {
                reason: "dry run".to_string(),
            },
            described,
        ));
    }

    let observed = T::render(ctx, actual.as_ref(), task, &changes)?;
    task.merge_observed(observed);
    pass.advance(PassPhase::Applied);

    let result = if actual.is_none() {
        log::info!("Created {} {}", T::KIND, pass.id);
        ApplyResult::Created
    } else {
        log::info!("Updated {} {}", T::KIND, pass.id);
        ApplyResult::Modified
    };
    Ok(pass.finish(action, result, described))
}

/// Object-safe view of a [`Task`] for heterogeneous plans
pub trait DynTask: Send + Sync + fmt::Debug {
    /// Cloud gateway the task talks to
    type Cloud: ?Sized + Sync;

    /// Task kind
    fn kind(&self) -> &'static str;

    /// Identifier shown to users
    fn id(&self) -> String;

    /// How this task takes part in a pass
    fn lifecycle(&self) -> Lifecycle;

    /// Run a dry pass over a copy of the task
    fn preview(&self, ctx: &Context<'_, Self::Cloud>) -> PassReport;

    /// Run a pass; errors are folded into the report
    fn reconcile(&mut self, ctx: &Context<'_, Self::Cloud>) -> PassReport;
}

impl<T: Task> DynTask for T {
    type Cloud = T::Cloud;

    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn id(&self) -> String {
        Task::id(self)
    }

    fn lifecycle(&self) -> Lifecycle {
        Task::lifecycle(self)
    }

    fn preview(&self, ctx: &Context<'_, Self::Cloud>) -> PassReport {
        let mut copy = self.clone();
        let dry = ctx.as_dry_run();
        run(&mut copy, &dry).unwrap_or_else(|e| PassReport::from_error(T::KIND, &Task::id(self), &e))
    }

    fn reconcile(&mut self, ctx: &Context<'_, Self::Cloud>) -> PassReport {
        let id = Task::id(self);
        run(self, ctx).unwrap_or_else(|e| {
            log::debug!("{} {}: pass failed: {}", T::KIND, id, e);
            PassReport::from_error(T::KIND, &id, &e)
        })
    }
}

/// A boxed task for type-erased storage
pub type BoxedTask<C> = Box<dyn DynTask<Cloud = C>>;
