//! `clusterup apply` - make the cloud match the cluster file

use anyhow::{Result, bail};
use declarative::ExecuteSummary;

use super::Session;
use crate::Context;
use crate::engine::{self, ApplyOptions, build_plan};
use crate::ui;

pub fn run(
    ctx: &Context,
    target: Option<&str>,
    dry_run: bool,
    yes: bool,
    jobs: usize,
) -> Result<ExecuteSummary> {
    let session = Session::open(ctx)?;
    let plan = build_plan(&session.config)?.filter_by_target(target);

    if plan.is_empty() {
        ui::warn(&format!(
            "Nothing matches target '{}'",
            target.unwrap_or_default()
        ));
        return Ok(ExecuteSummary::default());
    }

    let opts = ApplyOptions {
        dry_run,
        jobs,
        yes,
        quiet: ctx.quiet,
    };
    let summary = engine::execute(plan, &session.reconcile_context(), &opts)?;

    if !summary.is_success() {
        bail!("{} resource(s) failed to reconcile", summary.failed);
    }
    Ok(summary)
}
