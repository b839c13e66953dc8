//! The serialisable record of a publish run and of a planned one.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::artifact::{Artifact, RemoteRelPath};
use crate::domain::release::ReleaseVersion;

/// One artifact as it was stored at both destinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedArtifact {
    /// Path relative to the remote root ("current" location).
    pub current: String,
    /// Path relative to the remote root under the version directory.
    pub versioned: String,
    /// Size in bytes.
    pub bytes: u64,
    /// Lowercase hex SHA-256 of the uploaded content.
    pub sha256: String,
}

impl PublishedArtifact {
    #[must_use]
    pub fn new(version: &ReleaseVersion, remote: &RemoteRelPath, bytes: u64, sha256: String) -> Self {
        Self {
            current: remote.to_string(),
            versioned: versioned_path(version, remote),
            bytes,
            sha256,
        }
    }
}

/// Summary of a successful publish.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub version: ReleaseVersion,
    pub remote_root: String,
    pub published_at: DateTime<Utc>,
    pub artifacts: Vec<PublishedArtifact>,
}

impl PublishReport {
    /// Total bytes uploaded per destination.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.artifacts.iter().map(|a| a.bytes).sum()
    }
}

/// What a deploy would do, computed without connecting.
#[derive(Debug, Clone, Serialize)]
pub struct DeployPlan {
    pub version: ReleaseVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub remote_root: String,
    /// Directories created relative to the remote root, in order.
    pub directories: Vec<String>,
    pub artifacts: Vec<PlannedArtifact>,
}

/// One planned upload.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedArtifact {
    pub local: String,
    pub current: String,
    pub versioned: String,
}

impl PlannedArtifact {
    #[must_use]
    pub fn new(version: &ReleaseVersion, artifact: &Artifact) -> Self {
        Self {
            local: artifact.local.display().to_string(),
            current: artifact.remote.to_string(),
            versioned: versioned_path(version, &artifact.remote),
        }
    }
}

/// `<version>/<rel>`, the snapshot location of an artifact.
#[must_use]
pub fn versioned_path(version: &ReleaseVersion, remote: &RemoteRelPath) -> String {
    format!("{version}/{remote}")
}

/// Lowercase hex encoding.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}
