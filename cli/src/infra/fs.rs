//! `ArtifactSource` over the local disk.

use std::path::{Path, PathBuf};

use crate::application::ports::ArtifactSource;
use crate::domain::ArtifactError;

/// Production filesystem implementation of `ArtifactSource`.
pub struct LocalFs;

impl ArtifactSource for LocalFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, ArtifactError> {
        let entries = glob::glob(pattern).map_err(|e| ArtifactError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(pattern, error = %e, "skipping unreadable glob entry");
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();
        files.sort();
        Ok(files)
    }

    fn walk(&self, dir: &Path) -> Result<Vec<PathBuf>, ArtifactError> {
        let dir_str = dir.to_str().ok_or_else(|| ArtifactError::InvalidPattern {
            pattern: dir.display().to_string(),
            reason: "not valid UTF-8".to_string(),
        })?;
        let pattern = format!("{}/**/*", glob::Pattern::escape(dir_str));
        self.glob(&pattern)
    }

    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}
