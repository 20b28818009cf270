//! Credential resolution for the chosen repository domain.
//!
//! Lookup order: the credential store, then the `--username`/`--password`
//! arguments, then interactive prompts for whatever is still missing.
//! Newly entered credentials are added to the store in memory and only
//! written out once an upload has proven them valid.

use plasma_keyring::{CredentialStore, CredentialsItem, KeyringError};
use plasma_util::errors::{PublishError, PublishResult};

use crate::terminal::TerminalInput;

pub const USERNAME_PROMPT: &str = "Artifacts repository username";
pub const PASSWORD_PROMPT: &str = "Artifacts repository password";

/// Credentials for one domain and whether they are new to the store.
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    pub item: CredentialsItem,
    pub should_persist: bool,
}

/// Find or create credentials for `domain`.
///
/// A stored item always wins over supplied arguments. Store failures other
/// than "not found" are fatal: an empty passphrase is
/// [`PublishError::KeyringAccess`], anything else
/// [`PublishError::KeyringCorrupt`].
pub fn resolve_credentials(
    store: &mut dyn CredentialStore,
    terminal: &dyn TerminalInput,
    domain: &str,
    username: Option<&str>,
    password: Option<&str>,
) -> PublishResult<ResolvedCredentials> {
    match store.get_for_url(domain) {
        Ok(item) => {
            tracing::debug!("found stored credentials for {domain}");
            Ok(ResolvedCredentials {
                item,
                should_persist: false,
            })
        }
        Err(KeyringError::NotFound { .. }) => {
            let username = match non_empty(username) {
                Some(u) => u.to_string(),
                None => terminal.prompt_text(USERNAME_PROMPT)?,
            };
            let password = match non_empty(password) {
                Some(p) => p.to_string(),
                None => terminal.prompt_secret(PASSWORD_PROMPT)?,
            };
            let item = CredentialsItem::new(domain, username, password);
            store
                .add_item(item.clone())
                .map_err(|e| keyring_failure(domain, e))?;
            Ok(ResolvedCredentials {
                item,
                should_persist: true,
            })
        }
        Err(e) => Err(keyring_failure(domain, e)),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn keyring_failure(domain: &str, e: KeyringError) -> PublishError {
    match e {
        KeyringError::EmptyPassphrase => PublishError::KeyringAccess {
            message: format!("cannot unlock keyring to read credentials for {domain}: {e}"),
        },
        other => PublishError::KeyringCorrupt {
            message: other.to_string(),
        },
    }
}

/// Result of [`CredentialSession::finish`].
#[derive(Debug)]
pub enum PersistOutcome {
    /// No new credentials were confirmed.
    NothingToSave,
    Saved,
    /// The upload succeeded but the store could not be written.
    Failed(PublishError),
}

/// Exclusive handle on the credential store for one publish run.
///
/// Tracks whether a new item was added and whether it has been confirmed by
/// a successful upload; [`finish`](Self::finish) saves at most once and only
/// in that case.
pub struct CredentialSession<'s> {
    store: &'s mut dyn CredentialStore,
    added: bool,
    confirmed: bool,
}

impl<'s> CredentialSession<'s> {
    pub fn new(store: &'s mut dyn CredentialStore) -> Self {
        Self {
            store,
            added: false,
            confirmed: false,
        }
    }

    /// See [`resolve_credentials`].
    pub fn resolve(
        &mut self,
        terminal: &dyn TerminalInput,
        domain: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> PublishResult<ResolvedCredentials> {
        let resolved = resolve_credentials(&mut *self.store, terminal, domain, username, password)?;
        self.added |= resolved.should_persist;
        Ok(resolved)
    }

    /// Mark newly added credentials as proven by a successful upload.
    pub fn confirm(&mut self) {
        self.confirmed = self.added;
    }

    /// Save the store if a confirmed new item is pending.
    pub fn finish(self) -> PersistOutcome {
        if !self.confirmed {
            return PersistOutcome::NothingToSave;
        }
        match self.store.save() {
            Ok(()) => PersistOutcome::Saved,
            Err(e) => PersistOutcome::Failed(PublishError::Persist {
                message: e.to_string(),
            }),
        }
    }
}
