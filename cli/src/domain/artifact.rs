//! Artifact types: validated remote paths and the ordered artifact set.
//!
//! This module is intentionally free of I/O, async, and external layer imports.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::domain::error::ArtifactError;

/// A relative remote path with `/` separators and no `.`/`..` segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RemoteRelPath(String);

impl RemoteRelPath {
    /// Validate a relative remote path.
    ///
    /// # Errors
    ///
    /// Returns `ArtifactError::InvalidPath` if the path is empty, absolute,
    /// uses `\`, or has empty, `.` or `..` segments.
    pub fn parse(raw: &str) -> Result<Self, ArtifactError> {
        let invalid = |reason: &str| ArtifactError::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };
        if raw.is_empty() {
            return Err(invalid("path is empty"));
        }
        if raw.starts_with('/') {
            return Err(invalid("path must be relative"));
        }
        if raw.contains('\\') {
            return Err(invalid("use '/' as the separator"));
        }
        for segment in raw.split('/') {
            match segment {
                "" => return Err(invalid("empty path segment")),
                "." | ".." => return Err(invalid("'.' and '..' segments are not allowed")),
                _ => {}
            }
        }
        Ok(Self(raw.to_string()))
    }

    /// Build a remote path from a local path relative to the local root.
    ///
    /// `.` components are ignored on both sides, so a root of `./site`
    /// accepts `site/dist/0.bundle.js` as well as `./site/index.html`.
    ///
    /// # Errors
    ///
    /// Returns `ArtifactError::InvalidPath` if `local` is not under `root`
    /// or has a non-UTF-8 component.
    pub fn from_local(root: &Path, local: &Path) -> Result<Self, ArtifactError> {
        let invalid = |reason: &str| ArtifactError::InvalidPath {
            path: local.display().to_string(),
            reason: reason.to_string(),
        };
        let mut rel = local.components().filter(|c| *c != Component::CurDir);
        for expected in root.components().filter(|c| *c != Component::CurDir) {
            if rel.next() != Some(expected) {
                return Err(invalid("not under the local root"));
            }
        }
        let mut segments = Vec::new();
        for component in rel {
            match component {
                Component::Normal(part) => {
                    segments.push(part.to_str().ok_or_else(|| invalid("not valid UTF-8"))?);
                }
                _ => return Err(invalid("must not escape the local root")),
            }
        }
        Self::parse(&segments.join("/"))
    }

    /// The path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Every ancestor directory, outermost first. `a/b/c.js` yields `a`, `a/b`.
    #[must_use]
    pub fn parent_dirs(&self) -> Vec<String> {
        let segments: Vec<&str> = self.0.split('/').collect();
        (1..segments.len())
            .map(|n| segments[..n].join("/"))
            .collect()
    }
}

impl fmt::Display for RemoteRelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One local file and where it lands relative to the remote root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// Local file to read.
    pub local: PathBuf,
    /// Destination relative to the remote root (and to the version directory).
    pub remote: RemoteRelPath,
}

/// Ordered, non-empty set of artifacts with unique remote paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArtifactSet(Vec<Artifact>);

impl ArtifactSet {
    /// Build a set, keeping the first occurrence of each remote path.
    ///
    /// # Errors
    ///
    /// Returns `ArtifactError::Empty` for an empty input and
    /// `ArtifactError::Conflict` when two different local files map to the
    /// same remote path.
    pub fn new(artifacts: impl IntoIterator<Item = Artifact>) -> Result<Self, ArtifactError> {
        let mut out: Vec<Artifact> = Vec::new();
        for artifact in artifacts {
            match out.iter().find(|a| a.remote == artifact.remote) {
                Some(existing) if existing.local == artifact.local => {}
                Some(existing) => {
                    return Err(ArtifactError::Conflict {
                        remote: artifact.remote.to_string(),
                        first: existing.local.display().to_string(),
                        second: artifact.local.display().to_string(),
                    });
                }
                None => out.push(artifact),
            }
        }
        if out.is_empty() {
            return Err(ArtifactError::Empty);
        }
        Ok(Self(out))
    }

    /// Iterate artifacts in publish order.
    pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
        self.0.iter()
    }

    /// Number of artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: the set is non-empty by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Directories the set needs, parents before children, first-seen order.
    #[must_use]
    pub fn directories(&self) -> Vec<String> {
        let mut dirs: Vec<String> = Vec::new();
        for dir in self.0.iter().flat_map(|a| a.remote.parent_dirs()) {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }
}

impl<'a> IntoIterator for &'a ArtifactSet {
    type Item = &'a Artifact;
    type IntoIter = std::slice::Iter<'a, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
