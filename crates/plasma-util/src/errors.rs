use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all publish operations.
#[derive(Debug, Error, Diagnostic)]
pub enum PublishError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The local git repository could not be inspected.
    #[error("Error getting repository information: {message}")]
    #[diagnostic(help("Run the command from a git checkout with an `origin` remote and at least one commit"))]
    RepositoryInfo { message: String },

    /// The packaged archive is missing from the artifact directory.
    #[error("Artifact {file} not found in {dir}")]
    #[diagnostic(help("Execute 'plasmactl platform:package' before publishing"))]
    ArtifactNotFound { file: String, dir: String },

    /// The credential store cannot be unlocked.
    #[error("Keyring access error: {message}")]
    #[diagnostic(help("Provide a keyring passphrase via PLASMACTL_KEYRING_PASSPHRASE or the prompt"))]
    KeyringAccess { message: String },

    /// The credential store is unreadable.
    #[error("The keyring is malformed or wrong passphrase provided: {message}")]
    KeyringCorrupt { message: String },

    /// The repository rejected the credentials before any data was sent.
    #[error("Authentication failed: {message}")]
    #[diagnostic(help("Check the username and password for the artifacts repository"))]
    Authentication { message: String },

    /// The artifact transfer was attempted but rejected or failed.
    #[error("Failed to upload artifact: {message}")]
    Upload { message: String },

    /// New credentials could not be saved after a successful upload.
    #[error("Failed to save credentials: {message}")]
    Persist { message: String },

    /// Interactive input could not be read.
    #[error("Prompt error: {message}")]
    Prompt { message: String },

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check ~/.plasmactl/config.toml for syntax errors"))]
    Config { message: String },

    /// HTTP client setup failed.
    #[error("Network error: {message}")]
    Network { message: String },
}

/// Convenience alias for results carrying a [`PublishError`].
pub type PublishResult<T> = Result<T, PublishError>;
