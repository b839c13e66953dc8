//! Expand artifact patterns into an `ArtifactSet`.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};

use crate::application::ports::{ArtifactSource, ProgressReporter};
use crate::domain::{Artifact, ArtifactError, ArtifactSet, RemoteRelPath};

const GLOB_META: &[char] = &['*', '?', '['];

/// Expand `patterns` (relative to `local_root`) into an ordered artifact set.
///
/// - glob patterns keep matching regular files, sorted; no match is a warning
/// - a literal directory expands to every file beneath it, sorted
/// - a literal file is kept as is
///
/// # Errors
///
/// Returns `ArtifactError::Missing` when a literal path does not exist,
/// `ArtifactError::InvalidPattern` for malformed globs, and
/// `ArtifactError::Empty` when nothing is left to publish.
pub fn collect_artifacts(
    source: &impl ArtifactSource,
    local_root: &Path,
    patterns: &[String],
    reporter: &impl ProgressReporter,
) -> Result<ArtifactSet, ArtifactError> {
    let mut artifacts = Vec::new();
    for pattern in patterns {
        for local in expand(source, local_root, pattern, reporter)? {
            let remote = RemoteRelPath::from_local(local_root, &local)?;
            artifacts.push(Artifact { local, remote });
        }
    }
    ArtifactSet::new(artifacts)
}

fn expand(
    source: &impl ArtifactSource,
    local_root: &Path,
    pattern: &str,
    reporter: &impl ProgressReporter,
) -> Result<Vec<PathBuf>, ArtifactError> {
    if Path::new(pattern).is_absolute() {
        return Err(ArtifactError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "must be relative to the local root".to_string(),
        });
    }
    if pattern.contains(GLOB_META) {
        let matches = source.glob(&rooted_pattern(local_root, pattern)?)?;
        if matches.is_empty() {
            tracing::warn!(pattern, "artifact pattern matched no files");
            reporter.warn(&format!("'{pattern}' matched no files"));
        }
        return Ok(matches);
    }

    let full = local_root.join(pattern);
    if source.is_file(&full) {
        return Ok(vec![full]);
    }
    if source.is_dir(&full) {
        let files = source.walk(&full)?;
        if files.is_empty() {
            tracing::warn!(pattern, "artifact directory is empty");
            reporter.warn(&format!("'{pattern}' is an empty directory"));
        }
        return Ok(files);
    }

    Err(ArtifactError::Missing {
        pattern: pattern.to_string(),
    })
}

/// Prefix `pattern` with the local root, escaping any glob characters in the root.
fn rooted_pattern(local_root: &Path, pattern: &str) -> Result<String, ArtifactError> {
    let root = local_root.to_str().ok_or_else(|| ArtifactError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: format!("local root {} is not valid UTF-8", local_root.display()),
    })?;
    let root = glob::Pattern::escape(root);
    Ok(match root.as_str() {
        "" => pattern.to_string(),
        r if r.ends_with('/') => format!("{r}{pattern}"),
        r => format!("{r}/{pattern}"),
    })
}
