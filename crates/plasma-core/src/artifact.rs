//! The release archive produced by `plasmactl platform:package`.

use std::path::{Path, PathBuf};

use plasma_util::errors::{PublishError, PublishResult};

use crate::identity::RepositoryIdentity;

/// Suffix shared by every packaged source archive.
pub const ARCHIVE_SUFFIX: &str = "plasma-src.tar.gz";

/// Name and on-disk location of the archive to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub repository_name: String,
    pub commit_short_hash: String,
    pub file_name: String,
    /// Artifact directory as configured, used in messages.
    pub artifact_dir: String,
    pub local_path: PathBuf,
}

impl ArtifactDescriptor {
    /// Describe the archive for `identity`, located under `project_root/artifact_dir`.
    pub fn new(identity: &RepositoryIdentity, project_root: &Path, artifact_dir: &str) -> Self {
        let file_name = archive_file_name(&identity.name, &identity.commit_short_hash);
        let local_path = project_root.join(artifact_dir).join(&file_name);
        Self {
            repository_name: identity.name.clone(),
            commit_short_hash: identity.commit_short_hash.clone(),
            file_name,
            artifact_dir: artifact_dir.to_string(),
            local_path,
        }
    }

    /// Directory holding the archive.
    pub fn dir(&self) -> &Path {
        self.local_path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Fail with [`PublishError::ArtifactNotFound`] unless `local_path` is a regular file.
    pub fn ensure_exists(&self) -> PublishResult<()> {
        if self.local_path.is_file() {
            Ok(())
        } else {
            Err(PublishError::ArtifactNotFound {
                file: self.file_name.clone(),
                dir: self.artifact_dir.clone(),
            })
        }
    }
}

/// `{repo}-{sha}-plasma-src.tar.gz`
pub fn archive_file_name(repository_name: &str, commit_short_hash: &str) -> String {
    format!("{repository_name}-{commit_short_hash}-{ARCHIVE_SUFFIX}")
}
