//! Interactive input, abstracted so prompts can be scripted in tests.

use dialoguer::{Input, Password};
use plasma_util::errors::{PublishError, PublishResult};

/// Source of interactive answers.
pub trait TerminalInput {
    /// Read a line of visible text.
    fn prompt_text(&self, prompt: &str) -> PublishResult<String>;

    /// Read a secret without echoing it.
    fn prompt_secret(&self, prompt: &str) -> PublishResult<String>;
}

/// [`TerminalInput`] on the process's terminal via `dialoguer`.
///
/// Refuses to prompt when stdin is not a TTY instead of blocking a CI job.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialoguerTerminal;

impl DialoguerTerminal {
    fn ensure_interactive(prompt: &str) -> PublishResult<()> {
        if atty::is(atty::Stream::Stdin) {
            Ok(())
        } else {
            Err(PublishError::Prompt {
                message: format!("cannot ask for '{prompt}': stdin is not a terminal"),
            })
        }
    }
}

impl TerminalInput for DialoguerTerminal {
    fn prompt_text(&self, prompt: &str) -> PublishResult<String> {
        Self::ensure_interactive(prompt)?;
        Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| PublishError::Prompt {
                message: e.to_string(),
            })
    }

    fn prompt_secret(&self, prompt: &str) -> PublishResult<String> {
        Self::ensure_interactive(prompt)?;
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| PublishError::Prompt {
                message: e.to_string(),
            })
    }
}
