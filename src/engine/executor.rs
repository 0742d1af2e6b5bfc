//! Execution engine - clusterup executor with UI integration

use anyhow::Result;
use azkit::Client;
use colored::Colorize;
use declarative::{
    ApplyResult, ConfirmCallback, Context, ExecuteSummary, ExecutionPlan, PassReport,
    ProgressCallback,
};
use indicatif::ProgressBar;

use super::differ::display_plan;
use crate::progress;

/// Options for execution (CLI flavour, includes `yes` for confirmation skip)
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Don't make changes, just show what would happen
    pub dry_run: bool,
    /// Number of parallel passes per stage
    pub jobs: usize,
    /// Skip confirmation prompts
    pub yes: bool,
    /// Hide progress bars
    pub quiet: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            jobs: 4,
            yes: false,
            quiet: false,
        }
    }
}

/// Progress reporting on the terminal: plan box, then a bar per stage
struct UiProgress {
    quiet: bool,
    bar: Option<ProgressBar>,
    failed: usize,
}

impl UiProgress {
    fn new(quiet: bool) -> Self {
        Self {
            quiet,
            bar: None,
            failed: 0,
        }
    }
}

impl ProgressCallback for UiProgress {
    fn on_preview(&mut self, reports: &[PassReport]) {
        display_plan(reports);
    }

    fn on_stage_start(&mut self, name: &str, count: usize) {
        println!();
        println!("  {} Applying {} {}...", "→".cyan(), count, name);
        self.failed = 0;
        self.bar = Some(progress::bar(count as u64, name, self.quiet));
    }

    fn on_task_start(&mut self, _kind: &str, id: &str) {
        if let Some(pb) = &self.bar {
            pb.set_message(id.to_string());
        }
    }

    fn on_task_complete(&mut self, kind: &str, id: &str, result: &ApplyResult) {
        if let ApplyResult::Failed { error } = result {
            self.failed += 1;
            log::error!("{kind} {id}: {error}");
        }
        if let Some(pb) = &self.bar {
            pb.set_message(format!("{} {}", result_symbol(result), id));
            pb.inc(1);
        }
    }

    fn on_stage_complete(&mut self) {
        if let Some(pb) = self.bar.take() {
            let done = pb.position();
            if self.failed == 0 {
                progress::finish_success(&pb, &format!("{done} done"));
            } else {
                progress::finish_warn(&pb, &format!("{done} done, {} failed", self.failed));
            }
        }
    }
}

/// Confirmation through an interactive prompt, or automatic with `--yes`
struct PromptConfirm {
    yes: bool,
    declined: bool,
}

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        if self.yes {
            return Ok(true);
        }
        let confirmed = confirm_proceed(prompt)?;
        self.declined = !confirmed;
        Ok(confirmed)
    }
}

/// Symbol shown for a finished pass
fn result_symbol(result: &ApplyResult) -> &'static str {
    match result {
        ApplyResult::NoChange => "○",
        ApplyResult::Created | ApplyResult::Modified => "✓",
        ApplyResult::Failed { .. } => "✗",
        ApplyResult::Skipped { .. } => "⊘",
    }
}

/// Execute the plan with clusterup's UI integration
pub fn execute(
    plan: ExecutionPlan<Client>,
    ctx: &Context<'_, Client>,
    opts: &ApplyOptions,
) -> Result<ExecuteSummary> {
    let exec_opts = declarative::ExecuteOptions {
        dry_run: opts.dry_run,
        jobs: opts.jobs.max(1),
    };
    let mut ui = UiProgress::new(opts.quiet);
    let mut confirm = PromptConfirm {
        yes: opts.yes,
        declined: false,
    };

    let summary = declarative::execute(plan, ctx, &exec_opts, &mut ui, &mut confirm)?;

    if confirm.declined {
        println!();
        println!("  {} Aborted", "✗".red());
    } else if opts.dry_run || ctx.dry_run {
        println!();
        println!("  {} Dry run - no changes made", "ℹ".blue());
    } else if summary.total_changes() > 0 || !summary.is_success() || summary.skipped > 0 {
        print_summary(&summary);
    }

    Ok(summary)
}

/// Confirm with user
fn confirm_proceed(prompt: &str) -> Result<bool> {
    use dialoguer::Confirm;

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(true)
        .interact()?;

    Ok(confirmed)
}

/// Print final summary
fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.is_success() {
        println!("  {} Cluster reconciled successfully!", "✓".green().bold());
    } else {
        println!("  {} Cluster reconciled with errors", "⚠".yellow().bold());
    }

    if summary.created > 0 {
        println!("    • {} resources created", summary.created);
    }
    if summary.modified > 0 {
        println!("    • {} resources modified", summary.modified);
    }
    if summary.no_change > 0 {
        println!("    • {} resources unchanged", summary.no_change);
    }
    if summary.skipped > 0 {
        println!("    • {} resources skipped", summary.skipped);
    }
    if summary.failed > 0 {
        println!("    • {} {} failed", summary.failed, "resources".red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClusterConfig;
    use crate::engine::planner::build_plan;

    const CONFIG: &str = r#"
[cluster]
name = "prod"
location = "eastus"
resource_group = "prod-rg"

[[resource_groups]]
name = "prod-rg"

[[disks]]
name = "etcd-main"
size_gb = 32
"#;

    fn opts() -> ApplyOptions {
        ApplyOptions {
            yes: true,
            quiet: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_result_symbol() {
        assert_eq!(result_symbol(&ApplyResult::Created), "✓");
        assert_eq!(result_symbol(&ApplyResult::NoChange), "○");
        assert_eq!(
            result_symbol(&ApplyResult::Failed {
                error: "x".to_string()
            }),
            "✗"
        );
    }

    #[test]
    fn test_yes_confirms_without_prompt() {
        let mut confirm = PromptConfirm {
            yes: true,
            declined: false,
        };
        assert!(confirm.confirm("Apply changes?").unwrap());
        assert!(!confirm.declined);
    }

    #[test]
    fn test_execute_creates_then_converges() {
        let config = ClusterConfig::parse(CONFIG).unwrap();
        let client = Client::in_memory("eastus");
        let ctx = Context::new(&client, "prod");

        let summary = execute(build_plan(&config).unwrap(), &ctx, &opts()).unwrap();
        assert_eq!(summary.created, 2);
        assert!(summary.is_success());
        assert_eq!(
            client.get_disk("prod-rg", "etcd-main").unwrap().disk_size_gb(),
            Some(32)
        );

        let again = execute(build_plan(&config).unwrap(), &ctx, &opts()).unwrap();
        assert_eq!(again.total_changes(), 0);
        assert_eq!(again.no_change, 2);
    }

    #[test]
    fn test_execute_dry_run_leaves_cloud_alone() {
        let config = ClusterConfig::parse(CONFIG).unwrap();
        let client = Client::in_memory("eastus");
        let ctx = Context::new(&client, "prod");
        let dry = ApplyOptions {
            dry_run: true,
            ..opts()
        };

        let summary = execute(build_plan(&config).unwrap(), &ctx, &dry).unwrap();
        assert_eq!(summary.total(), 0);
        assert!(client.find_disk("prod-rg", "etcd-main").unwrap().is_none());
    }
}
