//! Release version token.
//!
//! Pure functions only. No I/O.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::error::ReleaseError;

static VERSION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Pattern is a compile-time constant
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._+-]*$").expect("valid version regex")
});

/// Opaque release identifier read from the project manifest.
///
/// Only ever used as a single remote path segment, so anything that could
/// escape or split a path (`/`, `\`, whitespace, leading dots) is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    /// Validate and wrap a version token.
    ///
    /// Surrounding whitespace is trimmed first.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseError::Empty` for blank input and
    /// `ReleaseError::Invalid` for tokens that are not a safe path segment.
    pub fn parse(raw: &str) -> Result<Self, ReleaseError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(ReleaseError::Empty);
        }
        if !VERSION_TOKEN.is_match(token) {
            return Err(ReleaseError::Invalid(token.to_string()));
        }
        Ok(Self(token.to_string()))
    }

    /// Extract the `version` field from a JSON manifest such as `package.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not JSON, has no string `version`
    /// field, or the version is not a valid token.
    pub fn from_manifest(json: &str) -> Result<Self, ReleaseError> {
        let doc: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ReleaseError::Manifest(e.to_string()))?;
        let version = doc
            .get("version")
            .and_then(serde_json::Value::as_str)
            .ok_or(ReleaseError::MissingVersion)?;
        Self::parse(version)
    }

    /// The token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
