//! Passphrase-encrypted keyring stored in a single file.
//!
//! On disk the keyring is a JSON envelope:
//!
//! ```json
//! { "version": 1, "salt": "<b64>", "nonce": "<b64>", "ciphertext": "<b64>" }
//! ```
//!
//! The key is derived from the passphrase with PBKDF2-HMAC-SHA256 and the
//! payload (a JSON list of credential items) is sealed with AES-256-GCM.
//! A fresh salt and nonce are generated on every save.

use std::io::Write;
use std::path::{Path, PathBuf};

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::{CredentialStore, CredentialsItem, KeyringError};

const FORMAT_VERSION: u32 = 1;
const PBKDF2_ROUNDS: u32 = 100_000;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Supplies the passphrase the first time the keyring needs it.
pub type PassphraseSource<'a> = Box<dyn FnMut() -> Result<String, KeyringError> + 'a>;

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    salt: String,
    nonce: String,
    ciphertext: String,
}

#[derive(Default, Serialize, Deserialize)]
struct KeyringData {
    #[serde(default)]
    items: Vec<CredentialsItem>,
}

/// [`CredentialStore`] backed by an encrypted file.
///
/// The file is read lazily on first access. A missing file is an empty
/// keyring and is only created by [`save`](CredentialStore::save).
pub struct FileKeyring<'a> {
    path: PathBuf,
    passphrase_source: PassphraseSource<'a>,
    passphrase: Option<String>,
    data: Option<KeyringData>,
    dirty: bool,
}

impl<'a> FileKeyring<'a> {
    /// Open the keyring at `path`, asking `passphrase_source` when a
    /// passphrase is first needed.
    pub fn new(
        path: impl Into<PathBuf>,
        passphrase_source: impl FnMut() -> Result<String, KeyringError> + 'a,
    ) -> Self {
        Self {
            path: path.into(),
            passphrase_source: Box::new(passphrase_source),
            passphrase: None,
            data: None,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn passphrase(&mut self) -> Result<String, KeyringError> {
        if let Some(ref p) = self.passphrase {
            return Ok(p.clone());
        }
        let p = (self.passphrase_source)()?;
        if p.is_empty() {
            return Err(KeyringError::EmptyPassphrase);
        }
        self.passphrase = Some(p.clone());
        Ok(p)
    }

    fn load(&mut self) -> Result<&mut KeyringData, KeyringError> {
        if self.data.is_none() {
            let data = if self.path.is_file() {
                let raw = std::fs::read(&self.path)?;
                let passphrase = self.passphrase()?;
                let data = open(&raw, &passphrase)?;
                tracing::debug!(
                    "loaded {} keyring item(s) from {}",
                    data.items.len(),
                    self.path.display()
                );
                data
            } else {
                tracing::debug!("no keyring at {}", self.path.display());
                KeyringData::default()
            };
            self.data = Some(data);
        }
        Ok(self.data.get_or_insert_with(KeyringData::default))
    }
}

impl CredentialStore for FileKeyring<'_> {
    fn get_for_url(&mut self, url: &str) -> Result<CredentialsItem, KeyringError> {
        if self.data.is_none() && !self.path.is_file() {
            return Err(KeyringError::NotFound {
                url: url.to_string(),
            });
        }
        let key = normalize_url(url);
        self.load()?
            .items
            .iter()
            .find(|item| normalize_url(&item.url) == key)
            .cloned()
            .ok_or_else(|| KeyringError::NotFound {
                url: url.to_string(),
            })
    }

    fn add_item(&mut self, item: CredentialsItem) -> Result<(), KeyringError> {
        let key = normalize_url(&item.url).to_string();
        let data = self.load()?;
        data.items.retain(|existing| normalize_url(&existing.url) != key);
        data.items.push(item);
        self.dirty = true;
        Ok(())
    }

    fn save(&mut self) -> Result<(), KeyringError> {
        if !self.dirty {
            return Ok(());
        }
        let passphrase = self.passphrase()?;
        let data = self.load()?;
        let sealed = seal(data, &passphrase)?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        plasma_util::fs::ensure_dir(&dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&sealed)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| KeyringError::Io(e.error))?;

        self.dirty = false;
        tracing::debug!("saved keyring to {}", self.path.display());
        Ok(())
    }
}

fn normalize_url(url: &str) -> &str {
    url.trim_end_matches('/')
}

fn derive_key(passphrase: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, PBKDF2_ROUNDS, &mut key);
    key
}

fn malformed(message: impl std::fmt::Display) -> KeyringError {
    KeyringError::Malformed {
        message: message.to_string(),
    }
}

fn seal(data: &KeyringData, passphrase: &str) -> Result<Vec<u8>, KeyringError> {
    let plaintext = serde_json::to_vec(data).map_err(malformed)?;

    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    let mut rng = rand::thread_rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce);

    let key = derive_key(passphrase, &salt);
    let cipher = Aes256Gcm::new_from_slice(&key).map_err(malformed)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_slice())
        .map_err(|_| malformed("encryption failed"))?;

    let envelope = Envelope {
        version: FORMAT_VERSION,
        salt: BASE64.encode(salt),
        nonce: BASE64.encode(nonce),
        ciphertext: BASE64.encode(ciphertext),
    };
    serde_json::to_vec_pretty(&envelope).map_err(malformed)
}

fn open(raw: &[u8], passphrase: &str) -> Result<KeyringData, KeyringError> {
    let envelope: Envelope = serde_json::from_slice(raw).map_err(malformed)?;
    if envelope.version != FORMAT_VERSION {
        return Err(malformed(format!(
            "unsupported keyring version {}",
            envelope.version
        )));
    }
    let salt = BASE64.decode(&envelope.salt).map_err(malformed)?;
    let nonce = BASE64.decode(&envelope.nonce).map_err(malformed)?;
    let ciphertext = BASE64.decode(&envelope.ciphertext).map_err(malformed)?;
    if nonce.len() != NONCE_LEN {
        return Err(malformed("invalid nonce length"));
    }

    let key = derive_key(passphrase, &salt);
    let cipher = Aes256Gcm::new_from_slice(&key).map_err(malformed)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
        .map_err(|_| malformed("decryption failed"))?;
    serde_json::from_slice(&plaintext).map_err(malformed)
}
