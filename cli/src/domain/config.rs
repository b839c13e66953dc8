//! Domain types and validators for sitepub configuration.
//!
//! Pure functions only, no I/O.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "site",
    "username",
    "host",
    "port",
    "remote_root",
    "manifest",
    "local_root",
    "artifacts",
    "version_subdirs",
    "timeout_secs",
    "chunk_size",
];

pub const DEFAULT_PORT: u16 = 21;
pub const DEFAULT_REMOTE_ROOT: &str = "~/{site}/lic";
pub const DEFAULT_MANIFEST: &str = "package.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CHUNK_SIZE: usize = 400_000;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.sitepub/config.yaml`.
///
/// The password is deliberately absent: it comes from `SITEPUB_PASSWORD` or
/// an interactive prompt and is never written to disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeployConfig {
    /// Site name, e.g. `example.org`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    /// FTP login name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// FTP host. Defaults to `ftp.<site>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// FTP control port.
    pub port: u16,
    /// Remote base directory; `{site}` expands to the site name.
    pub remote_root: String,
    /// Manifest holding the `version` field.
    pub manifest: String,
    /// Local directory artifact patterns are relative to.
    pub local_root: String,
    /// Artifact paths or glob patterns, in publish order.
    pub artifacts: Vec<String>,
    /// Extra directories always created under the version directory.
    pub version_subdirs: Vec<String>,
    /// Socket timeout for the FTP connection.
    pub timeout_secs: u64,
    /// Upper bound on a single write to the data connection.
    pub chunk_size: usize,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            site: None,
            username: None,
            host: None,
            port: DEFAULT_PORT,
            remote_root: DEFAULT_REMOTE_ROOT.to_string(),
            manifest: DEFAULT_MANIFEST.to_string(),
            local_root: ".".to_string(),
            artifacts: vec!["index.html".to_string(), "dist".to_string()],
            version_subdirs: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl DeployConfig {
    /// Apply a validated `key = value` assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "site" => self.site = Some(value.to_string()),
            "username" => self.username = Some(value.to_string()),
            "host" => self.host = Some(value.to_string()),
            "port" => self.port = value.parse()?,
            "remote_root" => self.remote_root = value.to_string(),
            "manifest" => self.manifest = value.to_string(),
            "local_root" => self.local_root = value.to_string(),
            "artifacts" => self.artifacts = split_list(value),
            "version_subdirs" => self.version_subdirs = split_list(value),
            "timeout_secs" => self.timeout_secs = value.parse()?,
            "chunk_size" => self.chunk_size = value.parse()?,
            _ => anyhow::bail!("Unknown setting: {key}"),
        }
        Ok(())
    }

    /// Check every stored value against the same rules as `set`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first value that fails.
    pub fn validate(&self) -> Result<()> {
        let optional = [
            ("site", &self.site),
            ("username", &self.username),
            ("host", &self.host),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                validate_config_value(key, value)?;
            }
        }
        validate_config_value("port", &self.port.to_string())?;
        validate_config_value("remote_root", &self.remote_root)?;
        validate_config_value("manifest", &self.manifest)?;
        validate_config_value("local_root", &self.local_root)?;
        validate_config_value("artifacts", &self.artifacts.join(","))?;
        validate_config_value("timeout_secs", &self.timeout_secs.to_string())?;
        validate_config_value("chunk_size", &self.chunk_size.to_string())
    }

    /// Flatten the config into `(key, value)` pairs for display.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let unset = || "(unset)".to_string();
        vec![
            ("site", self.site.clone().unwrap_or_else(unset)),
            ("username", self.username.clone().unwrap_or_else(unset)),
            (
                "host",
                self.host
                    .clone()
                    .unwrap_or_else(|| "(ftp.<site>)".to_string()),
            ),
            ("port", self.port.to_string()),
            ("remote_root", self.remote_root.clone()),
            ("manifest", self.manifest.clone()),
            ("local_root", self.local_root.clone()),
            ("artifacts", self.artifacts.join(",")),
            ("version_subdirs", self.version_subdirs.join(",")),
            ("timeout_secs", self.timeout_secs.to_string()),
            ("chunk_size", self.chunk_size.to_string()),
        ]
    }
}

/// Host to connect to for `site`, honouring an explicit override.
#[must_use]
pub fn resolve_host(host: Option<&str>, site: &str) -> String {
    host.map_or_else(|| format!("ftp.{site}"), str::to_string)
}

/// Expand `{site}` in the remote root template.
#[must_use]
pub fn resolve_remote_root(template: &str, site: &str) -> String {
    template.replace("{site}", site)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |expected: &str| -> anyhow::Error {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
        .into()
    };
    match key {
        "port" => match value.parse::<u16>() {
            Ok(port) if port > 0 => Ok(()),
            _ => Err(invalid("a port number between 1 and 65535")),
        },
        "timeout_secs" => match value.parse::<u64>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err(invalid("a positive number of seconds")),
        },
        "chunk_size" => match value.parse::<usize>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err(invalid("a positive number of bytes")),
        },
        "artifacts" if split_list(value).is_empty() => {
            Err(invalid("a comma-separated list of paths or globs"))
        }
        "version_subdirs" => Ok(()),
        _ if value.trim().is_empty() => Err(invalid("a non-empty value")),
        _ => Ok(()),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
