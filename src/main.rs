mod cli;
mod commands;
mod config;
mod engine;
mod paths;
mod progress;
mod tasks;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

/// Global context for the application
pub struct Context {
    pub quiet: bool,
    /// Explicit cluster file, if given
    pub config: Option<String>,
    /// Explicit simulated cloud file, if given
    pub state: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        quiet: cli.quiet,
        config: cli.config,
        state: cli.state,
    };

    match cli.command {
        Command::Plan(args) => commands::plan::run(&ctx, args.target.as_deref()).map(|_| ()),
        Command::Apply(args) => commands::apply::run(
            &ctx,
            args.target.as_deref(),
            args.dry_run,
            args.yes,
            args.jobs,
        )
        .map(|_| ()),
        Command::Show(args) => commands::show::run(
            &ctx,
            &args.disk,
            args.resource_group.as_deref(),
            args.json,
        )
        .map(|_| ()),
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "clusterup", &mut io::stdout());
            Ok(())
        }
    }
}
