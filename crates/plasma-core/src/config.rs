use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use plasma_util::errors::{PublishError, PublishResult};

/// Public artifacts repository.
pub const DEFAULT_PRIMARY_DOMAIN: &str = "https://repositories.skilld.cloud";

/// In-cluster artifacts repository, preferred when reachable.
pub const DEFAULT_FALLBACK_DOMAIN: &str = "http://repositories.interaction.svc.skilld:8081";

/// Where `plasmactl platform:package` leaves the archive.
pub const DEFAULT_ARTIFACT_DIR: &str = ".compose/artifacts";

/// Environment variable holding the keyring passphrase.
pub const KEYRING_PASSPHRASE_ENV: &str = "PLASMACTL_KEYRING_PASSPHRASE";

/// Global user configuration loaded from `~/.plasmactl/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    #[serde(default)]
    pub keyring: KeyringConfig,
}

/// Artifacts repository endpoints from `[repository]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default = "default_primary_domain", rename = "primary-domain")]
    pub primary_domain: String,
    #[serde(default = "default_fallback_domain", rename = "fallback-domain")]
    pub fallback_domain: String,
    #[serde(default = "default_probe_timeout", rename = "probe-timeout-secs")]
    pub probe_timeout_secs: u64,
    #[serde(default, rename = "request-timeout-secs")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            primary_domain: default_primary_domain(),
            fallback_domain: default_fallback_domain(),
            probe_timeout_secs: default_probe_timeout(),
            request_timeout_secs: None,
        }
    }
}

impl RepositoryConfig {
    /// Deadline for the unauthenticated liveness probe.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Deadline for authenticated requests, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn default_primary_domain() -> String {
    DEFAULT_PRIMARY_DOMAIN.to_string()
}

fn default_fallback_domain() -> String {
    DEFAULT_FALLBACK_DOMAIN.to_string()
}

fn default_probe_timeout() -> u64 {
    5
}

/// Local artifact location from `[artifacts]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_artifact_dir")]
    pub dir: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: default_artifact_dir(),
        }
    }
}

fn default_artifact_dir() -> String {
    DEFAULT_ARTIFACT_DIR.to_string()
}

/// Credential store settings from `[keyring]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyringConfig {
    #[serde(default)]
    pub path: Option<String>,
}

impl KeyringConfig {
    /// Resolved keyring file path, defaulting to `~/.plasmactl/keyring.enc`.
    pub fn resolved_path(&self) -> PathBuf {
        match self.path.as_deref() {
            Some(p) => plasma_util::fs::expand_home(p),
            None => dirs_path().join("keyring.enc"),
        }
    }
}

impl GlobalConfig {
    /// Load `~/.plasmactl/config.toml`, or defaults if it doesn't exist.
    pub fn load() -> PublishResult<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load a config file from an explicit path, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> PublishResult<Self> {
        if !path.is_file() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| PublishError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| PublishError::Config {
            message: format!("Failed to parse {}: {e}", path.display()),
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the plasmactl data directory (`~/.plasmactl/`).
pub fn dirs_path() -> PathBuf {
    plasma_util::fs::home_dir().join(".plasmactl")
}
