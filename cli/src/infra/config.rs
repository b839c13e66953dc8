//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::DeployConfig;

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
///
/// The path is `$SITEPUB_CONFIG` when set, else `~/.sitepub/config.yaml`.
pub struct YamlConfigStore;

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<DeployConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(DeployConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        parse_config(&content).with_context(|| format!("invalid config in {}", path.display()))
    }

    fn save(&self, config: &DeployConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;

        // Atomic write via temp file then rename
        let temp_path = path.with_extension("yaml.tmp");
        std::fs::write(&temp_path, content)
            .with_context(|| format!("cannot write {}", temp_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", temp_path.display()))?;
        }

        std::fs::rename(&temp_path, &path)
            .with_context(|| format!("cannot replace {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var("SITEPUB_CONFIG") {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".sitepub").join("config.yaml"))
    }
}

/// Deserialize a config document and reject values `config set` would refuse.
fn parse_config(content: &str) -> Result<DeployConfig> {
    let config: DeployConfig = serde_yaml::from_str(content).context("cannot parse YAML")?;
    config.validate()?;
    Ok(config)
}
