//! Command implementations

pub mod config;
pub mod deploy;
pub mod plan;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::application::ports::ProgressReporter;
use crate::application::services::collect::collect_artifacts;
use crate::application::services::publish::{PublishOptions, Publisher};
use crate::domain::config::{resolve_host, resolve_remote_root};
use crate::domain::{ArtifactSet, DeployConfig, DeployPlan, PlannedArtifact, ReleaseVersion, RemoteRelPath};
use crate::infra::fs::LocalFs;
use crate::infra::manifest::read_version;

/// Flags that select what gets published and where. Each overrides the
/// matching config file setting.
#[derive(Args, Debug, Default)]
pub struct SelectionArgs {
    /// Site name, e.g. example.org
    #[arg(long, env = "SITEPUB_SITE")]
    pub site: Option<String>,

    /// FTP host [default: ftp.<site>]
    #[arg(long)]
    pub host: Option<String>,

    /// FTP control port
    #[arg(long)]
    pub port: Option<u16>,

    /// Remote base directory; {site} expands to the site name
    #[arg(long)]
    pub remote_root: Option<String>,

    /// Manifest holding the release version
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Local directory artifact paths are relative to
    #[arg(long = "root")]
    pub local_root: Option<PathBuf>,

    /// Artifact path or glob; repeat to list several (replaces the configured list)
    #[arg(long = "artifact", value_name = "PATTERN")]
    pub artifacts: Vec<String>,
}

/// Everything a deploy needs that does not involve the network.
pub struct Prepared {
    pub version: ReleaseVersion,
    pub artifacts: ArtifactSet,
    pub publisher: Publisher,
    /// Resolved host, when the site is known.
    pub host: Option<String>,
    pub port: u16,
}

impl Prepared {
    /// The dry-run view of this deploy.
    #[must_use]
    pub fn plan(&self) -> DeployPlan {
        DeployPlan {
            version: self.version.clone(),
            host: self.host.clone(),
            remote_root: self.publisher.remote_root().to_string(),
            directories: self.publisher.directories(&self.version, &self.artifacts),
            artifacts: self
                .artifacts
                .iter()
                .map(|a| PlannedArtifact::new(&self.version, a))
                .collect(),
        }
    }
}

/// Resolve the version, artifact set, and publisher from flags and config.
///
/// `site` is the resolved site name, if known; without it the remote root
/// template is left unexpanded.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read, an artifact is missing,
/// or a configured version subdirectory is not a valid relative path.
pub fn prepare(
    selection: &SelectionArgs,
    config: &DeployConfig,
    site: Option<&str>,
    reporter: &impl ProgressReporter,
) -> Result<Prepared> {
    let local_root = selection
        .local_root
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.local_root));
    let manifest = selection
        .manifest
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.manifest));
    let version = read_version(&resolve_local(&local_root, &manifest))?;

    let patterns = if selection.artifacts.is_empty() {
        &config.artifacts
    } else {
        &selection.artifacts
    };
    let artifacts = collect_artifacts(&LocalFs, &local_root, patterns, reporter)
        .with_context(|| format!("cannot collect artifacts under {}", local_root.display()))?;

    let template = selection
        .remote_root
        .as_deref()
        .unwrap_or(&config.remote_root);
    let remote_root = site.map_or_else(|| template.to_string(), |s| resolve_remote_root(template, s));
    let version_subdirs = config
        .version_subdirs
        .iter()
        .map(|d| RemoteRelPath::parse(d))
        .collect::<Result<Vec<_>, _>>()
        .context("invalid version_subdirs setting")?;

    let host = site.map(|s| {
        resolve_host(
            selection.host.as_deref().or(config.host.as_deref()),
            s,
        )
    });

    Ok(Prepared {
        version,
        artifacts,
        publisher: Publisher::new(PublishOptions {
            remote_root,
            version_subdirs,
        }),
        host,
        port: selection.port.unwrap_or(config.port),
    })
}

/// The manifest path is taken relative to the local root unless absolute
/// or already present as given.
fn resolve_local(local_root: &Path, manifest: &Path) -> PathBuf {
    if manifest.is_absolute() || manifest.exists() {
        manifest.to_path_buf()
    } else {
        local_root.join(manifest)
    }
}
