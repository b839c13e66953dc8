//! Terminal prompts via `dialoguer`.

use anyhow::Result;

use crate::application::ports::CredentialPrompt;

/// Production `CredentialPrompt` that asks on the controlling terminal.
pub struct TerminalPrompt;

impl CredentialPrompt for TerminalPrompt {
    fn input(&self, prompt: &str) -> Result<String> {
        let value: String = dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()?;
        Ok(value)
    }

    fn password(&self, prompt: &str) -> Result<String> {
        let value = dialoguer::Password::new().with_prompt(prompt).interact()?;
        Ok(value)
    }
}
