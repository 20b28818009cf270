#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use plasma_core::artifact::ArtifactDescriptor;
use plasma_core::config::GlobalConfig;
use plasma_core::identity::RepositoryIdentity;
use plasma_keyring::{CredentialStore, CredentialsItem, KeyringError};
use plasma_ops::terminal::TerminalInput;
use plasma_repository::transport::{RepositoryTransport, TransportError};
use plasma_util::errors::{PublishError, PublishResult};
use reqwest::StatusCode;

pub const PRIMARY: &str = "https://public.example.com";
pub const FALLBACK: &str = "http://internal.example.com:8081";

/// What the fake store answers to `get_for_url`.
pub enum Lookup {
    Found,
    NotFound,
    EmptyPassphrase,
    Malformed,
}

/// In-memory store that counts calls.
pub struct FakeStore {
    pub lookup: Lookup,
    pub fail_save: bool,
    pub added: Vec<CredentialsItem>,
    pub saved: Vec<Vec<CredentialsItem>>,
}

impl FakeStore {
    pub fn new(lookup: Lookup) -> Self {
        Self {
            lookup,
            fail_save: false,
            added: Vec::new(),
            saved: Vec::new(),
        }
    }
}

impl CredentialStore for FakeStore {
    fn get_for_url(&mut self, url: &str) -> Result<CredentialsItem, KeyringError> {
        match self.lookup {
            Lookup::Found => Ok(CredentialsItem::new(url, "stored-user", "stored-pass")),
            Lookup::NotFound => Err(KeyringError::NotFound {
                url: url.to_string(),
            }),
            Lookup::EmptyPassphrase => Err(KeyringError::EmptyPassphrase),
            Lookup::Malformed => Err(KeyringError::Malformed {
                message: "bad envelope".to_string(),
            }),
        }
    }

    fn add_item(&mut self, item: CredentialsItem) -> Result<(), KeyringError> {
        self.added.push(item);
        Ok(())
    }

    fn save(&mut self) -> Result<(), KeyringError> {
        if self.fail_save {
            return Err(KeyringError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only filesystem",
            )));
        }
        self.saved.push(self.added.clone());
        Ok(())
    }
}

/// Terminal that replays scripted answers and records the prompts it saw.
#[derive(Default)]
pub struct ScriptedTerminal {
    pub answers: RefCell<VecDeque<String>>,
    pub prompts: RefCell<Vec<String>>,
}

impl ScriptedTerminal {
    pub fn with_answers(answers: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(|a| a.to_string()).collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    fn next(&self, kind: &str, prompt: &str) -> PublishResult<String> {
        self.prompts.borrow_mut().push(format!("{kind}:{prompt}"));
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| PublishError::Prompt {
                message: format!("no scripted answer for '{prompt}'"),
            })
    }
}

impl TerminalInput for ScriptedTerminal {
    fn prompt_text(&self, prompt: &str) -> PublishResult<String> {
        self.next("text", prompt)
    }

    fn prompt_secret(&self, prompt: &str) -> PublishResult<String> {
        self.next("secret", prompt)
    }
}

/// Transport with scripted answers per request kind.
pub struct FakeTransport {
    pub probe: Result<u16, &'static str>,
    pub head: Result<u16, &'static str>,
    pub put: Result<u16, &'static str>,
    pub calls: Mutex<Vec<String>>,
    pub credentials_seen: Mutex<Vec<(String, String)>>,
}

impl FakeTransport {
    pub fn new(
        probe: Result<u16, &'static str>,
        head: Result<u16, &'static str>,
        put: Result<u16, &'static str>,
    ) -> Self {
        Self {
            probe,
            head,
            put,
            calls: Mutex::new(Vec::new()),
            credentials_seen: Mutex::new(Vec::new()),
        }
    }

    /// Fallback down, probe and upload accepted.
    pub fn happy() -> Self {
        Self::new(Err("connection refused"), Ok(200), Ok(201))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| c.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn record_credentials(&self, credentials: &CredentialsItem) {
        self.credentials_seen
            .lock()
            .unwrap()
            .push((credentials.username.clone(), credentials.password.clone()));
    }
}

fn answer(scripted: Result<u16, &'static str>) -> Result<StatusCode, TransportError> {
    scripted
        .map(|code| StatusCode::from_u16(code).unwrap())
        .map_err(TransportError::new)
}

#[async_trait]
impl RepositoryTransport for FakeTransport {
    async fn probe(&self, url: &str) -> Result<StatusCode, TransportError> {
        self.record(format!("GET {url}"));
        answer(self.probe)
    }

    async fn head(
        &self,
        url: &str,
        credentials: &CredentialsItem,
    ) -> Result<StatusCode, TransportError> {
        self.record(format!("HEAD {url}"));
        self.record_credentials(credentials);
        answer(self.head)
    }

    async fn put_file(
        &self,
        url: &str,
        credentials: &CredentialsItem,
        _file: tokio::fs::File,
        _len: u64,
    ) -> Result<StatusCode, TransportError> {
        self.record(format!("PUT {url}"));
        self.record_credentials(credentials);
        answer(self.put)
    }
}

pub fn config() -> GlobalConfig {
    let mut config = GlobalConfig::default();
    config.repository.primary_domain = PRIMARY.to_string();
    config.repository.fallback_domain = FALLBACK.to_string();
    config
}

/// Descriptor for `sample@abcdef1` rooted at `root`, optionally with the archive on disk.
pub fn artifact(root: &Path, create: bool) -> ArtifactDescriptor {
    let identity = RepositoryIdentity {
        name: "sample".to_string(),
        commit_short_hash: "abcdef1".to_string(),
    };
    let artifact = ArtifactDescriptor::new(&identity, root, ".compose/artifacts");
    if create {
        std::fs::create_dir_all(artifact.dir()).unwrap();
        std::fs::write(&artifact.local_path, b"archive").unwrap();
    }
    artifact
}
