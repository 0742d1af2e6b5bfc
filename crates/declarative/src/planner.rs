//! Execution planner - groups tasks into ordered stages

use crate::task::{BoxedTask, DynTask};

/// A named group of tasks that do not depend on each other
pub struct Stage<C: ?Sized + Sync> {
    /// Stage name, e.g. "disks"
    pub name: String,
    /// Tasks in this stage
    pub tasks: Vec<BoxedTask<C>>,
}

impl<C: ?Sized + Sync> Stage<C> {
    /// Create an empty stage
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }
}

/// An execution plan: stages run in order, tasks within a stage in parallel
pub struct ExecutionPlan<C: ?Sized + Sync> {
    /// Stages in execution order
    pub stages: Vec<Stage<C>>,
}

impl<C: ?Sized + Sync> ExecutionPlan<C> {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Get a stage by name, appending it if it does not exist yet
    pub fn stage(&mut self, name: &str) -> &mut Stage<C> {
        let index = match self.stages.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.stages.push(Stage::new(name));
                self.stages.len() - 1
            }
        };
        &mut self.stages[index]
    }

    /// Add a task to the named stage
    pub fn add_task(&mut self, stage: &str, task: BoxedTask<C>) {
        self.stage(stage).tasks.push(task);
    }

    /// Filter plan to only include tasks matching a predicate
    ///
    /// Stages left without tasks are dropped.
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&dyn DynTask<Cloud = C>) -> bool,
    {
        let stages = self
            .stages
            .into_iter()
            .map(|stage| Stage {
                name: stage.name,
                tasks: stage
                    .tasks
                    .into_iter()
                    .filter(|t| predicate(t.as_ref()))
                    .collect(),
            })
            .filter(|stage| !stage.tasks.is_empty())
            .collect();
        Self { stages }
    }

    /// Filter plan to only include tasks matching a target pattern
    ///
    /// Target format: "kind" or "kind.name"
    pub fn filter_by_target(self, target: Option<&str>) -> Self {
        match target {
            None => self,
            Some(t) => {
                let (kind, name) = parse_target(t);
                self.filter(|task| matches_filter(task, kind.as_deref(), name.as_deref()))
            }
        }
    }

    /// Total number of tasks in the plan
    pub fn total_tasks(&self) -> usize {
        self.stages.iter().map(|s| s.tasks.len()).sum()
    }

    /// Check if plan is empty
    pub fn is_empty(&self) -> bool {
        self.total_tasks() == 0
    }
}

impl<C: ?Sized + Sync> Default for ExecutionPlan<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a target string like "kind.name" into (kind, name)
///
/// Only the first dot separates: disk names may contain dots.
fn parse_target(target: &str) -> (Option<String>, Option<String>) {
    match target.split_once('.') {
        None => (Some(target.to_string()), None),
        Some((kind, name)) if kind.is_empty() => (None, Some(name.to_string())),
        Some((kind, name)) => (Some(kind.to_string()), Some(name.to_string())),
    }
}

/// Fold a kind for comparison: "resource-groups" and "ResourceGroup" match
fn fold_kind(kind: &str) -> String {
    let folded: String = kind
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect();
    match folded.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => folded,
    }
}

/// Check if a task matches the filter criteria
fn matches_filter<C: ?Sized + Sync>(
    task: &dyn DynTask<Cloud = C>,
    kind: Option<&str>,
    name: Option<&str>,
) -> bool {
    if let Some(k) = kind
        && fold_kind(task.kind()) != fold_kind(k)
    {
        return false;
    }

    if let Some(n) = name
        && !task.id().contains(n)
    {
        return false;
    }

    true
}
