//! Change-set computation and description

use crate::types::{ApplyResult, PassReport, PlannedAction};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The expected value of a field when it is set and differs from actual
///
/// Unset expected fields are never part of a change set: the task does not
/// care about them.
pub fn changed<T: PartialEq + Clone>(actual: &Option<T>, expected: &Option<T>) -> Option<T> {
    match expected {
        Some(e) if actual.as_ref() != Some(e) => Some(e.clone()),
        _ => None,
    }
}

/// Map counterpart of [`changed`]: an empty expected map means "unset"
pub fn changed_map<K, V>(actual: &BTreeMap<K, V>, expected: &BTreeMap<K, V>) -> BTreeMap<K, V>
where
    K: Ord + Clone,
    V: PartialEq + Clone,
{
    if expected.is_empty() || actual == expected {
        BTreeMap::new()
    } else {
        expected.clone()
    }
}

/// One field of a change set, for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Serialized field name
    pub field: String,
    /// Value currently in the cloud, if any
    pub from: Option<Value>,
    /// Value the pass converges to
    pub to: Value,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            Some(from) => write!(f, "{}: {} -> {}", self.field, from, self.to),
            None => write!(f, "{}: {}", self.field, self.to),
        }
    }
}

fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Describe a change set field by field
///
/// Works from the serialized forms of the descriptors, so any task kind
/// can be described without knowing its fields.
pub fn describe<T: Serialize>(actual: Option<&T>, changes: &T) -> Vec<FieldChange> {
    let Ok(Value::Object(changed)) = serde_json::to_value(changes) else {
        return Vec::new();
    };
    let current = actual
        .and_then(|a| serde_json::to_value(a).ok())
        .and_then(|v| match v {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .unwrap_or_default();

    changed
        .into_iter()
        .filter(|(_, to)| !is_unset(to))
        .map(|(field, to)| {
            let from = current.get(&field).filter(|v| !is_unset(v)).cloned();
            FieldChange { field, from, to }
        })
        .collect()
}

/// Plan summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanSummary {
    /// Number of resources to create
    pub creates: usize,
    /// Number of resources to update
    pub updates: usize,
    /// Number of resources already converged
    pub unchanged: usize,
    /// Number of resources skipped (lifecycle or dry run)
    pub skipped: usize,
    /// Number of resources whose pass failed
    pub failed: usize,
}

impl PlanSummary {
    /// Create a summary from a list of pass reports
    pub fn from_reports(reports: &[PassReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            if !report.result.is_success() {
                summary.failed += 1;
                continue;
            }
            match report.action {
                PlannedAction::Create => summary.creates += 1,
                PlannedAction::Update => summary.updates += 1,
                PlannedAction::None => match report.result {
                    ApplyResult::Skipped { .. } => summary.skipped += 1,
                    _ => summary.unchanged += 1,
                },
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.creates + self.updates
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

/// Group reports by task kind
pub fn group_by_kind(reports: &[PassReport]) -> BTreeMap<String, Vec<&PassReport>> {
    let mut groups: BTreeMap<String, Vec<&PassReport>> = BTreeMap::new();
    for report in reports {
        groups.entry(report.kind.clone()).or_default().push(report);
    }
    groups
}
