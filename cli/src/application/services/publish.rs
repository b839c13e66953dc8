//! Application service — publish artifacts to the current and versioned paths.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! The run is strictly sequential. Each artifact is read once into memory,
//! the stale "current" copy is deleted, and the buffer is stored at
//! `<rel>` and then `<version>/<rel>` before the next artifact starts.
//! Nothing is rolled back on failure: artifacts finished before the error
//! stay in place. Two concurrent runs against the same remote tree are not
//! coordinated and may interleave.

use std::io::ErrorKind;

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::application::ports::{ArtifactSource, ProgressReporter, RemoteStore};
use crate::domain::report::{hex_encode, versioned_path};
use crate::domain::{
    Artifact, ArtifactSet, PublishError, PublishReport, PublishedArtifact, ReleaseVersion,
    RemoteError, RemoteRelPath,
};

/// Fixed settings for a `Publisher`, resolved before any connection is made.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Remote base directory; "current" files live directly under it.
    pub remote_root: String,
    /// Directories always created under the version directory, even when no
    /// artifact lands in them.
    pub version_subdirs: Vec<RemoteRelPath>,
}

/// Publishes an artifact set to a remote store.
pub struct Publisher {
    options: PublishOptions,
}

impl Publisher {
    #[must_use]
    pub fn new(options: PublishOptions) -> Self {
        Self { options }
    }

    /// Remote root this publisher writes under.
    #[must_use]
    pub fn remote_root(&self) -> &str {
        &self.options.remote_root
    }

    /// Directories to create, relative to the remote root, in creation order.
    ///
    /// The version directory comes first, then everything beneath it, then
    /// the directories the "current" copies need.
    #[must_use]
    pub fn directories(&self, version: &ReleaseVersion, artifacts: &ArtifactSet) -> Vec<String> {
        let mut dirs = vec![version.to_string()];
        let mut push = |dir: String| {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        };

        for subdir in &self.options.version_subdirs {
            for parent in subdir.parent_dirs() {
                push(format!("{version}/{parent}"));
            }
            push(versioned_path(version, subdir));
        }
        let artifact_dirs = artifacts.directories();
        for dir in &artifact_dirs {
            push(format!("{version}/{dir}"));
        }
        for dir in artifact_dirs {
            push(dir);
        }
        dirs
    }

    /// Publish every artifact to `<root>/<rel>` and `<root>/<version>/<rel>`.
    ///
    /// Closes the remote session on success. On failure the session is closed
    /// on a best-effort basis and the first error is returned.
    ///
    /// # Errors
    ///
    /// Returns the first fatal `PublishError`: a missing or unreadable local
    /// artifact, or a remote failure other than "not found" on delete and
    /// "already exists" on directory creation.
    pub fn publish(
        &self,
        version: &ReleaseVersion,
        artifacts: &ArtifactSet,
        remote: &mut impl RemoteStore,
        source: &impl ArtifactSource,
        reporter: &impl ProgressReporter,
    ) -> Result<PublishReport, PublishError> {
        let result = self.run(version, artifacts, remote, source, reporter);
        if let Err(err) = &result {
            tracing::error!(error = %err, "publish aborted");
            if !matches!(err, PublishError::Close { .. }) {
                if let Err(close_err) = remote.close() {
                    tracing::debug!(error = %close_err, "close after failed publish");
                }
            }
        }
        result
    }

    fn run(
        &self,
        version: &ReleaseVersion,
        artifacts: &ArtifactSet,
        remote: &mut impl RemoteStore,
        source: &impl ArtifactSource,
        reporter: &impl ProgressReporter,
    ) -> Result<PublishReport, PublishError> {
        preflight(artifacts, source)?;

        let root = &self.options.remote_root;
        tracing::debug!(root = %root, "changing to remote root");
        remote
            .change_dir(root)
            .map_err(|source| PublishError::ChangeDirectory {
                path: root.clone(),
                source,
            })?;

        reporter.step(&format!("preparing {root}/{version}"));
        for dir in self.directories(version, artifacts) {
            ensure_dir(remote, &dir)?;
        }
        reporter.success(&format!("{root}/{version} ready"));

        let mut published = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            published.push(publish_one(version, artifact, remote, source, reporter)?);
        }

        remote
            .close()
            .map_err(|source| PublishError::Close { source })?;

        Ok(PublishReport {
            version: version.clone(),
            remote_root: root.clone(),
            published_at: Utc::now(),
            artifacts: published,
        })
    }
}

/// Refuse to touch the remote tree unless every declared artifact is present.
fn preflight(artifacts: &ArtifactSet, source: &impl ArtifactSource) -> Result<(), PublishError> {
    match artifacts.iter().find(|a| !source.is_file(&a.local)) {
        Some(missing) => Err(PublishError::LocalArtifactMissing {
            artifact: missing.local.display().to_string(),
        }),
        None => Ok(()),
    }
}

fn ensure_dir(remote: &mut impl RemoteStore, dir: &str) -> Result<(), PublishError> {
    match remote.make_dir(dir) {
        Ok(()) => {
            tracing::debug!(dir, "created remote directory");
            Ok(())
        }
        Err(RemoteError::AlreadyExists) => {
            tracing::debug!(dir, "remote directory already exists");
            Ok(())
        }
        Err(source) => Err(PublishError::CreateDirectory {
            path: dir.to_string(),
            source,
        }),
    }
}

fn publish_one(
    version: &ReleaseVersion,
    artifact: &Artifact,
    remote: &mut impl RemoteStore,
    source: &impl ArtifactSource,
    reporter: &impl ProgressReporter,
) -> Result<PublishedArtifact, PublishError> {
    let rel = artifact.remote.as_str();
    let contents = source.read(&artifact.local).map_err(|e| {
        let name = artifact.local.display().to_string();
        if e.kind() == ErrorKind::NotFound {
            PublishError::LocalArtifactMissing { artifact: name }
        } else {
            PublishError::LocalArtifactUnreadable {
                artifact: name,
                reason: e.to_string(),
            }
        }
    })?;

    match remote.delete(rel) {
        Ok(()) => tracing::debug!(path = rel, "deleted previous current copy"),
        Err(RemoteError::NotFound) => tracing::debug!(path = rel, "no previous current copy"),
        Err(source) => {
            return Err(PublishError::Delete {
                artifact: rel.to_string(),
                source,
            });
        }
    }

    let versioned = versioned_path(version, &artifact.remote);
    for path in [rel, versioned.as_str()] {
        remote
            .store(path, &contents)
            .map_err(|source| PublishError::Store {
                artifact: rel.to_string(),
                path: path.to_string(),
                source,
            })?;
    }

    let bytes = contents.len() as u64;
    let digest = hex_encode(&Sha256::digest(&contents));
    tracing::info!(artifact = rel, bytes, "uploaded");
    reporter.uploaded(rel, bytes);

    Ok(PublishedArtifact::new(version, &artifact.remote, bytes, digest))
}
