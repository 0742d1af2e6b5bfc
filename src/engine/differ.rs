//! Plan display - clusterup-specific UI

use colored::{ColoredString, Colorize};
use declarative::{ApplyResult, PassReport, PlanSummary, PlannedAction, group_by_kind};

/// How a report shows up in the plan box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Create,
    Update,
    Held,
    Failed,
}

impl Mark {
    /// Mark for a report, `None` when the resource is converged
    pub fn for_report(report: &PassReport) -> Option<Self> {
        if !report.result.is_success() {
            return Some(Self::Failed);
        }
        match report.action {
            PlannedAction::Create => Some(Self::Create),
            PlannedAction::Update => Some(Self::Update),
            PlannedAction::None => match &report.result {
                ApplyResult::Skipped { .. } => Some(Self::Held),
                _ => None,
            },
        }
    }

    fn symbol(self) -> ColoredString {
        match self {
            Self::Create => "+".green(),
            Self::Update => "~".yellow(),
            Self::Held => "⊘".dimmed(),
            Self::Failed => "✗".red(),
        }
    }
}

/// Section title for a task kind
pub fn kind_title(kind: &str) -> &str {
    match kind {
        "ResourceGroup" => "Resource groups",
        "Disk" => "Disks",
        _ => kind,
    }
}

/// Short explanation printed next to the resource id
fn detail(report: &PassReport, mark: Mark) -> String {
    match (&report.result, mark) {
        (ApplyResult::Failed { error }, _) => error.clone(),
        (_, Mark::Create) => "(will create)".to_string(),
        (ApplyResult::Skipped { reason }, Mark::Held) => format!("({reason})"),
        _ => String::new(),
    }
}

/// Display the dry-run reports of a plan
pub fn display_plan(reports: &[PassReport]) {
    let summary = PlanSummary::from_reports(reports);
    if !summary.has_changes() && summary.failed == 0 && summary.skipped == 0 {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Cluster Plan".bold()
    );
    println!("│");

    for (kind, kind_reports) in group_by_kind(reports) {
        let marked: Vec<_> = kind_reports
            .into_iter()
            .filter_map(|r| Mark::for_report(r).map(|m| (r, m)))
            .collect();
        if marked.is_empty() {
            continue;
        }

        println!("│ {}", kind_title(&kind).bold());
        for (report, mark) in marked {
            println!(
                "│   {} {:<30} {}",
                mark.symbol(),
                report.id,
                detail(report, mark).dimmed()
            );
            if mark != Mark::Failed {
                for change in &report.changes {
                    println!("│       {}", change.to_string().dimmed());
                }
            }
        }
        println!("│");
    }

    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} to create, {} to update, {} unchanged, {} held, {}",
        summary.creates.to_string().green(),
        summary.updates.to_string().yellow(),
        summary.unchanged,
        summary.skipped,
        format!("{} failed", summary.failed).red()
    );
    println!("└─────────────────────────────────────────────────────┘");
}
