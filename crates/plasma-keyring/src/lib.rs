//! Credential storage for `plasmactl`.
//!
//! A [`CredentialStore`] maps repository URLs to [`CredentialsItem`]s.
//! [`FileKeyring`] is the on-disk implementation: a single file encrypted
//! with a user passphrase.

pub mod error;
pub mod file;
pub mod item;
pub mod store;

pub use error::KeyringError;
pub use file::FileKeyring;
pub use item::CredentialsItem;
pub use store::CredentialStore;
