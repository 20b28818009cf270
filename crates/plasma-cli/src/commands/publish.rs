//! Handler for `plasmactl publish`.

use miette::Result;

use plasma_core::config::{GlobalConfig, KEYRING_PASSPHRASE_ENV};
use plasma_keyring::{FileKeyring, KeyringError};
use plasma_ops::ops_publish::{self, PublishOptions};
use plasma_ops::terminal::{DialoguerTerminal, TerminalInput};
use plasma_repository::transport::HttpTransport;
use plasma_util::errors::PublishError;

pub fn exec(username: Option<String>, password: Option<String>) -> Result<()> {
    let project_root = std::env::current_dir().map_err(PublishError::Io)?;
    let config = GlobalConfig::load()?;

    let terminal = DialoguerTerminal;
    let transport = HttpTransport::new(
        config.repository.probe_timeout(),
        config.repository.request_timeout(),
    )?;
    let mut keyring = FileKeyring::new(config.keyring.resolved_path(), || {
        keyring_passphrase(&terminal)
    });
    tracing::debug!("using keyring {}", keyring.path().display());

    let options = PublishOptions {
        project_root,
        username,
        password,
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(PublishError::Io)?;
    rt.block_on(ops_publish::publish(
        &config,
        &options,
        &transport,
        &mut keyring,
        &terminal,
    ))?;
    Ok(())
}

/// Passphrase from the environment, else a masked prompt.
///
/// An unavailable prompt counts as an empty passphrase.
fn keyring_passphrase(terminal: &dyn TerminalInput) -> Result<String, KeyringError> {
    if let Ok(passphrase) = std::env::var(KEYRING_PASSPHRASE_ENV) {
        return Ok(passphrase);
    }
    terminal.prompt_secret("Keyring passphrase").map_err(|e| {
        tracing::debug!("{e}");
        KeyringError::EmptyPassphrase
    })
}
