//! Resolve the site and login details for a deploy.
//!
//! Precedence is flag (or its environment variable) > config file > prompt.
//! In non-interactive mode a value that is still missing is an error.

use std::fmt;

use anyhow::Result;

use crate::application::ports::CredentialPrompt;
use crate::domain::{ConfigError, DeployConfig};

/// Values supplied on the command line or through environment variables.
#[derive(Default)]
pub struct CredentialInputs<'a> {
    pub site: Option<&'a str>,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
}

/// Fully resolved login details for one deploy.
#[derive(Clone)]
pub struct Credentials {
    pub site: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("site", &self.site)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Resolve the site, user name, and password.
///
/// # Errors
///
/// Returns `ConfigError::MissingSetting` when a value is missing and
/// `non_interactive` is set, or the prompt error when prompting fails.
pub fn resolve_credentials(
    inputs: &CredentialInputs<'_>,
    config: &DeployConfig,
    prompt: &impl CredentialPrompt,
    non_interactive: bool,
) -> Result<Credentials> {
    let site = pick(inputs.site, config.site.as_deref()).map_or_else(
        || {
            ask(non_interactive, "site", "Pass --site or set SITEPUB_SITE.", || {
                prompt.input("Site")
            })
        },
        Ok,
    )?;
    let username = pick(inputs.username, config.username.as_deref()).map_or_else(
        || {
            ask(non_interactive, "username", "Pass --user or set SITEPUB_USER.", || {
                prompt.input("Username")
            })
        },
        Ok,
    )?;
    let password = match inputs.password {
        Some(p) => p.to_string(),
        None => ask(non_interactive, "password", "Set SITEPUB_PASSWORD.", || {
            prompt.password("Password")
        })?,
    };
    Ok(Credentials {
        site,
        username,
        password,
    })
}

fn pick(flag: Option<&str>, config: Option<&str>) -> Option<String> {
    flag.or(config)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn ask(
    non_interactive: bool,
    what: &'static str,
    hint: &'static str,
    prompt: impl FnOnce() -> Result<String>,
) -> Result<String> {
    if non_interactive {
        return Err(ConfigError::MissingSetting { what, hint }.into());
    }
    let value = prompt()?;
    let value = value.trim();
    if value.is_empty() {
        anyhow::bail!("{what} must not be empty");
    }
    Ok(value.to_string())
}
