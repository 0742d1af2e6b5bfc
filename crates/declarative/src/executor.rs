//! Execution engine - reconciles a plan stage by stage with parallelism

use crate::context::{ConfirmCallback, Context, ProgressCallback};
use crate::planner::{ExecutionPlan, Stage};
use crate::types::{ApplyResult, ExecuteOptions, ExecuteSummary, PassReport};
use anyhow::Result;
use rayon::prelude::*;

/// Run a dry pass over every task of the plan, in stage order
///
/// Tasks are previewed on copies; the plan is left untouched and the cloud
/// is only read.
pub fn preview<C: ?Sized + Sync>(plan: &ExecutionPlan<C>, ctx: &Context<'_, C>) -> Vec<PassReport> {
    plan.stages
        .iter()
        .flat_map(|stage| stage.tasks.iter())
        .map(|task| task.preview(ctx))
        .collect()
}

/// Execute a plan with the given options and callbacks
///
/// # Type Parameters
/// * `C` - Cloud gateway type
/// * `P` - Progress callback type
/// * `F` - Confirm callback type
///
/// # Arguments
/// * `plan` - The execution plan to run
/// * `ctx` - Reconciliation context (gateway and cluster identity)
/// * `opts` - Execution options (dry_run, jobs)
/// * `progress` - Progress callback
/// * `confirm` - Confirmation callback
///
/// # Returns
/// Summary of execution results
pub fn execute<C, P, F>(
    mut plan: ExecutionPlan<C>,
    ctx: &Context<'_, C>,
    opts: &ExecuteOptions,
    progress: &mut P,
    confirm: &mut F,
) -> Result<ExecuteSummary>
where
    C: ?Sized + Sync,
    P: ProgressCallback,
    F: ConfirmCallback,
{
    let reports = preview(&plan, ctx);
    progress.on_preview(&reports);

    let pending = reports.iter().filter(|r| r.needs_apply()).count();
    if pending == 0 {
        let mut summary = ExecuteSummary::default();
        for report in &reports {
            summary.add_result(&report.result);
        }
        return Ok(summary);
    }

    let dry_run = opts.dry_run || ctx.dry_run;

    // Confirm before proceeding (unless dry_run)
    if !dry_run && !confirm.confirm("Apply changes?")? {
        return Ok(ExecuteSummary {
            skipped: pending,
            ..Default::default()
        });
    }

    if dry_run {
        return Ok(ExecuteSummary::default());
    }

    let mut summary = ExecuteSummary::default();
    let mut failed_stage: Option<String> = None;

    for stage in &mut plan.stages {
        if let Some(failed) = &failed_stage {
            log::warn!(
                "Skipping stage {} ({} task(s)): stage {} failed",
                stage.name,
                stage.tasks.len(),
                failed
            );
            summary.skipped += stage.tasks.len();
            continue;
        }

        progress.on_stage_start(&stage.name, stage.tasks.len());
        let results = execute_stage(stage, ctx, opts.jobs, progress)?;
        progress.on_stage_complete();

        let mut stage_summary = ExecuteSummary::default();
        for result in &results {
            stage_summary.add_result(result);
        }
        if !stage_summary.is_success() {
            failed_stage = Some(stage.name.clone());
        }
        summary.merge(&stage_summary);
    }

    Ok(summary)
}

/// Execute the tasks of one stage
fn execute_stage<C, P>(
    stage: &mut Stage<C>,
    ctx: &Context<'_, C>,
    jobs: usize,
    progress: &mut P,
) -> Result<Vec<ApplyResult>>
where
    C: ?Sized + Sync,
    P: ProgressCallback,
{
    if jobs <= 1 || stage.tasks.len() == 1 {
        // Sequential execution
        let mut results = Vec::with_capacity(stage.tasks.len());
        for task in &mut stage.tasks {
            let (kind, id) = (task.kind(), task.id());
            progress.on_task_start(kind, &id);
            let report = task.reconcile(ctx);
            progress.on_task_complete(kind, &id, &report.result);
            results.push(report.result);
        }
        Ok(results)
    } else {
        execute_parallel(stage, ctx, jobs, progress)
    }
}

/// Execute tasks in parallel using rayon
fn execute_parallel<C, P>(
    stage: &mut Stage<C>,
    ctx: &Context<'_, C>,
    jobs: usize,
    progress: &mut P,
) -> Result<Vec<ApplyResult>>
where
    C: ?Sized + Sync,
    P: ProgressCallback,
{
    // The progress callback is not thread-safe; results are reported after.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create thread pool: {}", e))?;

    let reports: Vec<PassReport> = pool.install(|| {
        stage
            .tasks
            .par_iter_mut()
            .map(|task| task.reconcile(ctx))
            .collect()
    });

    for report in &reports {
        progress.on_task_complete(&report.kind, &report.id, &report.result);
    }

    Ok(reports.into_iter().map(|r| r.result).collect())
}
