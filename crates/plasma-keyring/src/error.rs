use thiserror::Error;

/// Failures reported by a [`crate::CredentialStore`].
#[derive(Debug, Error)]
pub enum KeyringError {
    /// No item is stored for the requested URL.
    #[error("no credentials stored for {url}")]
    NotFound { url: String },

    /// The store cannot be unlocked without a passphrase.
    #[error("keyring passphrase is empty")]
    EmptyPassphrase,

    /// The stored data could not be decrypted or decoded.
    #[error("keyring is malformed: {message}")]
    Malformed { message: String },

    #[error("keyring I/O error: {0}")]
    Io(#[from] std::io::Error),
}
