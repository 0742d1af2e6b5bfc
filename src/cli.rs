use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "clusterup")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Reconcile a cluster's Azure disks and resource groups", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Cluster file (default: clusterup/cluster.toml in the config dir)
    #[arg(short, long, global = true, env = "CLUSTERUP_CONFIG")]
    pub config: Option<String>,

    /// Simulated cloud state file (default: clusterup/cloud.json in the state dir)
    #[arg(long, global = true, env = "CLUSTERUP_STATE")]
    pub state: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Preview what apply would change
    Plan(PlanArgs),

    /// Make the cloud match the cluster file
    Apply(ApplyArgs),

    /// Look up one disk and print its observed state
    Show(ShowArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct PlanArgs {
    /// Only plan a subset: "disks", "disk.etcd", "resourcegroups"
    pub target: Option<String>,
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Only apply a subset: "disks", "disk.etcd", "resourcegroups"
    pub target: Option<String>,

    /// Dry run - show what would be done
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Number of parallel passes per stage
    #[arg(short, long, default_value = "4")]
    pub jobs: usize,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Disk name
    pub disk: String,

    /// Resource group (default: cluster.resource_group)
    #[arg(short = 'g', long)]
    pub resource_group: Option<String>,

    /// Print the disk as JSON
    #[arg(long)]
    pub json: bool,
}
