//! `clusterup plan` - preview what apply would change

use anyhow::Result;
use declarative::{PassReport, PlanSummary, preview};

use super::Session;
use crate::Context;
use crate::engine::{build_plan, differ};
use crate::ui;

pub fn run(ctx: &Context, target: Option<&str>) -> Result<PlanSummary> {
    let session = Session::open(ctx)?;
    let plan = build_plan(&session.config)?.filter_by_target(target);

    if plan.is_empty() {
        ui::warn(&format!(
            "Nothing matches target '{}'",
            target.unwrap_or_default()
        ));
        return Ok(PlanSummary::default());
    }

    let reports: Vec<PassReport> = preview(&plan, &session.reconcile_context());
    differ::display_plan(&reports);

    let summary = PlanSummary::from_reports(&reports);
    if summary.has_changes() && !ctx.quiet {
        println!();
        ui::dim("Run 'clusterup apply' to make these changes.");
    }
    Ok(summary)
}
