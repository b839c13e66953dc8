//! `sitepub deploy` — publish artifacts over FTP.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::application::services::credentials::{CredentialInputs, resolve_credentials};
use crate::commands::{SelectionArgs, prepare};
use crate::domain::PublishReport;
use crate::infra::fs::LocalFs;
use crate::infra::ftp::{ConnectionSettings, FtpRemote};
use crate::infra::prompt::TerminalPrompt;
use crate::output::{TerminalReporter, progress};

/// Arguments for the deploy command.
///
/// The password is read from `SITEPUB_PASSWORD` or prompted for; it is never
/// accepted as a flag.
#[derive(Args, Debug)]
pub struct DeployArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// FTP user name
    #[arg(long, env = "SITEPUB_USER")]
    pub user: Option<String>,

    /// Abort the whole deploy after this many seconds
    #[arg(long, value_name = "SECS")]
    pub deadline: Option<u64>,
}

/// Run the deploy command.
///
/// # Errors
///
/// Returns an error if credentials are missing, the manifest or an artifact
/// cannot be read, the connection fails, any remote operation fails, or the
/// deadline expires.
pub async fn run(app: &AppContext, args: DeployArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let password = std::env::var("SITEPUB_PASSWORD").ok();
    let creds = resolve_credentials(
        &CredentialInputs {
            site: args.selection.site.as_deref(),
            username: args.user.as_deref(),
            password: password.as_deref(),
        },
        &config,
        &TerminalPrompt,
        app.non_interactive,
    )?;

    let out = app.progress_output();
    let prepared = prepare(
        &args.selection,
        &config,
        Some(&creds.site),
        &TerminalReporter::new(out.clone()),
    )?;
    let host = prepared
        .host
        .clone()
        .unwrap_or_else(|| format!("ftp.{}", creds.site));

    if !app.is_json() {
        app.output.info(&format!(
            "Deploying version {} to {}",
            prepared.version, creds.site
        ));
    }
    tracing::info!(
        version = %prepared.version,
        site = %creds.site,
        host = %host,
        artifacts = prepared.artifacts.len(),
        "deploy starting",
    );

    let settings = ConnectionSettings {
        host,
        port: prepared.port,
        username: creds.username,
        password: creds.password,
        timeout: Duration::from_secs(config.timeout_secs),
        chunk_size: config.chunk_size,
    };
    let total = prepared.artifacts.len() as u64;

    let task = tokio::task::spawn_blocking(move || -> Result<PublishReport> {
        let target = format!("{}:{}", settings.host, settings.port);
        let spinner = out
            .show_progress()
            .then(|| progress::spinner(&format!("Connecting to {target}...")));
        let connected = FtpRemote::connect(&settings);
        if let Some(pb) = &spinner {
            match &connected {
                Ok(_) => progress::finish_ok(pb, &format!("Connected to {target}")),
                Err(_) => progress::finish_error(pb, &format!("Cannot connect to {target}")),
            }
        }
        let mut remote = connected.with_context(|| format!("cannot connect to {target}"))?;

        let reporter = TerminalReporter::with_bar(out, total);
        let result = prepared.publisher.publish(
            &prepared.version,
            &prepared.artifacts,
            &mut remote,
            &LocalFs,
            &reporter,
        );
        reporter.finish();
        result.map_err(anyhow::Error::from)
    });

    let joined = match args.deadline {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), task)
            .await
            .map_err(|_| anyhow::anyhow!("deploy exceeded the {secs}s deadline"))?,
        None => task.await,
    };
    let report = joined.context("deploy worker panicked")??;

    app.renderer().render_report(&report)?;
    Ok(ExitCode::SUCCESS)
}
