//! Project manifest reader.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::ReleaseVersion;

/// Read the release version from a JSON manifest such as `package.json`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not JSON, or has no
/// valid string `version` field.
pub fn read_version(path: &Path) -> Result<ReleaseVersion> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read manifest {}", path.display()))?;
    let version = ReleaseVersion::from_manifest(&content)
        .with_context(|| format!("invalid manifest {}", path.display()))?;
    tracing::debug!(manifest = %path.display(), %version, "read release version");
    Ok(version)
}
