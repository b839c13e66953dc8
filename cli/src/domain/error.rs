//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Release errors ────────────────────────────────────────────────────────────

/// Errors related to the release version token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReleaseError {
    #[error("Release version is empty.")]
    Empty,

    #[error(
        "Invalid release version '{0}': must match ^[A-Za-z0-9][A-Za-z0-9._+-]*$ \
         so it is safe as a single remote path segment"
    )]
    Invalid(String),

    #[error("Manifest has no string 'version' field.")]
    MissingVersion,

    #[error("Manifest is not valid JSON: {0}")]
    Manifest(String),
}

// ── Artifact errors ───────────────────────────────────────────────────────────

/// Errors raised while building the artifact set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArtifactError {
    #[error("Declared artifact '{pattern}' does not exist.")]
    Missing { pattern: String },

    #[error("No artifacts to publish. Check the artifact list and local root.")]
    Empty,

    #[error("Invalid artifact pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid remote path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Remote path '{remote}' is claimed by both '{first}' and '{second}'.")]
    Conflict {
        remote: String,
        first: String,
        second: String,
    },
}

// ── Remote errors ─────────────────────────────────────────────────────────────

/// Classified failure of a single remote-storage operation.
///
/// `NotFound` and `AlreadyExists` are recoverable in the contexts where the
/// publisher expects them (delete and create-directory respectively); every
/// other variant is fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("remote path not found")]
    NotFound,

    #[error("remote directory already exists")]
    AlreadyExists,

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("remote I/O failure: {0}")]
    Io(String),

    #[error("remote operation timed out")]
    Timeout,

    #[error("connection lost: {0}")]
    ConnectionLost(String),

    #[error("cannot connect: {0}")]
    Connection(String),
}

// ── Publish errors ────────────────────────────────────────────────────────────

/// Fatal publish failures. Each variant names the artifact or path involved.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Local artifact '{artifact}' is missing or not a regular file.")]
    LocalArtifactMissing { artifact: String },

    #[error("Cannot read local artifact '{artifact}': {reason}")]
    LocalArtifactUnreadable { artifact: String, reason: String },

    #[error("Cannot change to remote directory '{path}': {source}")]
    ChangeDirectory {
        path: String,
        #[source]
        source: RemoteError,
    },

    #[error("Cannot create remote directory '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: RemoteError,
    },

    #[error("Cannot replace '{artifact}': delete failed: {source}")]
    Delete {
        artifact: String,
        #[source]
        source: RemoteError,
    },

    #[error("Upload of '{artifact}' to '{path}' failed: {source}")]
    Store {
        artifact: String,
        path: String,
        #[source]
        source: RemoteError,
    },

    #[error("Cannot close remote connection: {source}")]
    Close {
        #[source]
        source: RemoteError,
    },
}

impl PublishError {
    /// Stable machine-readable code used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::LocalArtifactMissing { .. } => "LOCAL_ARTIFACT_MISSING",
            Self::LocalArtifactUnreadable { .. } => "LOCAL_ARTIFACT_UNREADABLE",
            Self::ChangeDirectory { .. } => "REMOTE_CHDIR_FAILED",
            Self::CreateDirectory { .. } => "REMOTE_MKDIR_FAILED",
            Self::Delete { .. } => "REMOTE_DELETE_FAILED",
            Self::Store { .. } => "REMOTE_STORE_FAILED",
            Self::Close { .. } => "REMOTE_CLOSE_FAILED",
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },

    #[error("No {what} available in non-interactive mode. {hint}")]
    MissingSetting {
        what: &'static str,
        hint: &'static str,
    },
}
