//! Repository identity: the name and short commit hash that key an artifact.
//!
//! Both are read from the local git checkout through the `git` CLI:
//! the name from the `origin` remote URL, the hash from `HEAD`.

use std::path::Path;

use plasma_util::errors::{PublishError, PublishResult};
use plasma_util::process::CommandBuilder;

/// Length of the abbreviated commit hash used in archive names.
pub const SHORT_HASH_LEN: usize = 7;

/// Name and head commit of the repository being published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryIdentity {
    pub name: String,
    pub commit_short_hash: String,
}

impl RepositoryIdentity {
    /// Build an identity from a remote URL and a full commit id.
    pub fn from_parts(remote_url: &str, commit_id: &str) -> PublishResult<Self> {
        Ok(Self {
            name: repository_name_from_url(remote_url)?,
            commit_short_hash: short_hash(commit_id)?,
        })
    }
}

/// Inspect the git checkout at `dir`.
pub fn resolve(dir: &Path) -> PublishResult<RepositoryIdentity> {
    git(dir, &["rev-parse", "--git-dir"]).map_err(|detail| {
        repo_error(format!(
            "no git repository found at {}: {detail}",
            dir.display()
        ))
    })?;

    let remote_url = git(dir, &["remote", "get-url", "origin"])
        .map_err(|detail| repo_error(format!("no `origin` remote configured: {detail}")))?;

    let head = git(dir, &["rev-parse", "--verify", "HEAD"])
        .map_err(|detail| repo_error(format!("cannot resolve HEAD: {detail}")))?;

    let identity = RepositoryIdentity::from_parts(&remote_url, &head)?;
    tracing::debug!(
        "repository identity: {} @ {} (origin {remote_url})",
        identity.name,
        identity.commit_short_hash
    );
    Ok(identity)
}

/// Final path segment of a remote URL, without a trailing `.git`.
///
/// Handles `https://host/org/repo.git`, `ssh://git@host/org/repo.git`
/// and scp-style `git@host:repo.git`.
pub fn repository_name_from_url(url: &str) -> PublishResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let segment = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
    let name = segment.strip_suffix(".git").unwrap_or(segment);
    if name.is_empty() {
        return Err(repo_error(format!(
            "cannot derive repository name from remote URL '{url}'"
        )));
    }
    Ok(name.to_string())
}

/// First [`SHORT_HASH_LEN`] characters of a commit id, lowercased.
pub fn short_hash(commit_id: &str) -> PublishResult<String> {
    let id = commit_id.trim();
    if id.len() < SHORT_HASH_LEN || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(repo_error(format!("'{id}' is not a commit id")));
    }
    Ok(id[..SHORT_HASH_LEN].to_ascii_lowercase())
}

fn repo_error(message: String) -> PublishError {
    PublishError::RepositoryInfo { message }
}

/// Run `git` in `dir`; `Err` carries a printable reason.
fn git(dir: &Path, args: &[&str]) -> Result<String, String> {
    let output = CommandBuilder::new("git")
        .args(args.iter().copied())
        .cwd(dir)
        .exec()
        .map_err(|e| format!("failed to run git: {e}"))?;
    if output.success {
        Ok(output.stdout)
    } else {
        Err(output.stderr)
    }
}
