use crate::{CredentialsItem, KeyringError};

/// A mutable set of credentials keyed by repository URL.
///
/// Changes made with [`add_item`](Self::add_item) stay in memory until
/// [`save`](Self::save) is called.
pub trait CredentialStore {
    /// Look up the item stored for `url`.
    ///
    /// Returns [`KeyringError::NotFound`] when nothing is stored for it.
    fn get_for_url(&mut self, url: &str) -> Result<CredentialsItem, KeyringError>;

    /// Insert `item`, replacing any item with the same URL.
    fn add_item(&mut self, item: CredentialsItem) -> Result<(), KeyringError>;

    /// Write pending changes to durable storage.
    fn save(&mut self) -> Result<(), KeyringError>;
}
