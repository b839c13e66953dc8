//! `sitepub plan` — show what a deploy would upload, without connecting.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::commands::{SelectionArgs, prepare};
use crate::output::TerminalReporter;

/// Arguments for the plan command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Run the plan command.
///
/// # Errors
///
/// Returns an error if the config, manifest, or artifacts cannot be resolved.
pub fn run(app: &AppContext, args: &PlanArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let site = args
        .selection
        .site
        .as_deref()
        .or(config.site.as_deref())
        .map(str::to_owned);

    let reporter = TerminalReporter::new(app.progress_output());
    let prepared = prepare(&args.selection, &config, site.as_deref(), &reporter)?;
    app.renderer().render_plan(&prepared.plan())?;
    Ok(ExitCode::SUCCESS)
}
