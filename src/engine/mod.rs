//! Execution engine for clusterup
//!
//! The engine orchestrates:
//! 1. Planning - Build staged tasks from the cluster file
//! 2. Previewing - Dry passes rendered as a plan box
//! 3. Executing - Reconcile stage by stage with parallelism

pub mod differ;
pub mod executor;
pub mod planner;

pub use executor::{ApplyOptions, execute};
pub use planner::build_plan;
