//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a command fails, and the renderer for successful results.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::DeployConfig;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Renders results as pretty-printed JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// Print any serialisable value.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render<T: Serialize>(&self, value: &T) -> Result<()> {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("JSON serialization failed")?
        );
        Ok(())
    }

    /// Print the configuration together with the file it came from.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &DeployConfig, path: &Path) -> Result<()> {
        self.render(&serde_json::json!({
            "path": path.display().to_string(),
            "config": config,
        }))
    }
}

/// Stable error code for the `--json` error object.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    use crate::domain::{ArtifactError, ConfigError, PublishError, ReleaseError, RemoteError};

    if let Some(e) = err.downcast_ref::<PublishError>() {
        return e.code();
    }
    if err.downcast_ref::<RemoteError>().is_some() {
        return "REMOTE_CONNECT_FAILED";
    }
    if err.downcast_ref::<ArtifactError>().is_some() {
        return "ARTIFACT_ERROR";
    }
    if err.downcast_ref::<ReleaseError>().is_some() {
        return "MANIFEST_ERROR";
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return "CONFIG_ERROR";
    }
    "DEPLOY_FAILED"
}
