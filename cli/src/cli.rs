//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Publish build artifacts to current and versioned FTP paths
#[derive(Parser)]
#[command(
    name = "sitepub",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (the NO_COLOR environment variable is also honoured)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Never prompt; fail when a setting is missing
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Publish artifacts to the current and versioned remote paths
    ///
    /// Each artifact is uploaded to <root>/<path> and <root>/<version>/<path>.
    /// Runs are not transactional and concurrent deploys to the same site are
    /// not coordinated.
    Deploy(commands::deploy::DeployArgs),

    /// Show what a deploy would upload, without connecting
    Plan(commands::plan::PlanArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            command,
            ..
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
        });

        match command {
            Command::Deploy(args) => commands::deploy::run(&app, args).await,
            Command::Plan(args) => commands::plan::run(&app, &args),
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}
