//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::{ArtifactError, DeployConfig, RemoteError};

// ── Remote Storage Port ───────────────────────────────────────────────────────

/// An open, authenticated remote file store.
///
/// All calls block until the server answers. Paths are relative to the
/// current remote directory unless they start with `/` or `~`.
pub trait RemoteStore {
    /// Change the current remote directory.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotFound` if the directory does not exist, or
    /// another `RemoteError` on permission, I/O, or connection failure.
    fn change_dir(&mut self, path: &str) -> Result<(), RemoteError>;

    /// Create one directory level.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::AlreadyExists` when the directory is already
    /// present; any other variant is a genuine failure.
    fn make_dir(&mut self, path: &str) -> Result<(), RemoteError>;

    /// Delete a file.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotFound` when no such file exists; any other
    /// variant is a genuine failure.
    fn delete(&mut self, path: &str) -> Result<(), RemoteError>;

    /// Store `contents` at `path` byte-for-byte, replacing any existing file.
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` if the transfer fails at any point.
    fn store(&mut self, path: &str, contents: &[u8]) -> Result<u64, RemoteError>;

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` if the server does not acknowledge the close.
    fn close(&mut self) -> Result<(), RemoteError>;
}

// ── Local Artifact Port ───────────────────────────────────────────────────────

/// Read access to the local build outputs.
pub trait ArtifactSource {
    /// `true` when `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// `true` when `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Regular files matching a glob pattern, sorted.
    ///
    /// # Errors
    ///
    /// Returns `ArtifactError::InvalidPattern` for malformed patterns.
    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, ArtifactError>;

    /// Every regular file beneath `dir`, sorted.
    ///
    /// # Errors
    ///
    /// Returns `ArtifactError::InvalidPattern` if the directory cannot be
    /// listed.
    fn walk(&self, dir: &Path) -> Result<Vec<PathBuf>, ArtifactError>;

    /// Read the whole file as raw bytes (no newline or encoding translation).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// An artifact reached both remote destinations.
    fn uploaded(&self, artifact: &str, bytes: u64);
}

// ── Configuration Ports ───────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, returning defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<DeployConfig>;

    /// Persist the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &DeployConfig) -> Result<()>;

    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}

/// Asks the operator for values that no flag, variable, or file supplied.
pub trait CredentialPrompt {
    /// Ask for a visible value such as the site or user name.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    fn input(&self, prompt: &str) -> Result<String>;

    /// Ask for a secret without echoing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    fn password(&self, prompt: &str) -> Result<String>;
}
