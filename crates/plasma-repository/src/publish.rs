//! Two-phase artifact transfer: an authenticated probe of the repository
//! root, then a streamed `PUT` of the archive.
//!
//! The probe rejects bad credentials before any archive bytes are sent, so
//! callers can treat a successful transfer as proof the credentials work.

use plasma_core::artifact::ArtifactDescriptor;
use plasma_keyring::CredentialsItem;
use plasma_util::errors::{PublishError, PublishResult};
use reqwest::StatusCode;

use crate::repository::Endpoint;
use crate::transport::RepositoryTransport;

/// Outcome of a completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub object_url: String,
    pub status: StatusCode,
    pub bytes: u64,
}

/// Validate `credentials` against the endpoint, then upload the archive.
///
/// The archive must already exist (see [`ArtifactDescriptor::ensure_exists`]).
pub async fn publish_artifact<T>(
    transport: &T,
    artifact: &ArtifactDescriptor,
    endpoint: &Endpoint,
    credentials: &CredentialsItem,
) -> PublishResult<TransferReceipt>
where
    T: RepositoryTransport + ?Sized,
{
    verify_credentials(transport, endpoint, credentials).await?;
    upload(transport, artifact, endpoint, credentials).await
}

/// `HEAD` the chosen domain; anything but exactly 200 is an authentication failure.
pub async fn verify_credentials<T>(
    transport: &T,
    endpoint: &Endpoint,
    credentials: &CredentialsItem,
) -> PublishResult<()>
where
    T: RepositoryTransport + ?Sized,
{
    let status = transport
        .head(&endpoint.chosen_domain, credentials)
        .await
        .map_err(|e| PublishError::Authentication {
            message: format!("{} is unreachable: {e}", endpoint.chosen_domain),
        })?;

    if status != StatusCode::OK {
        return Err(PublishError::Authentication {
            message: format!("{} answered {status}", endpoint.chosen_domain),
        });
    }
    tracing::debug!("credentials for {} accepted", credentials.username);
    Ok(())
}

/// Stream the archive to its object URL; 200 and 201 count as success.
pub async fn upload<T>(
    transport: &T,
    artifact: &ArtifactDescriptor,
    endpoint: &Endpoint,
    credentials: &CredentialsItem,
) -> PublishResult<TransferReceipt>
where
    T: RepositoryTransport + ?Sized,
{
    let object_url = endpoint.object_url(artifact);

    // Dropped (and closed) on every exit path, including transport errors.
    let file = tokio::fs::File::open(&artifact.local_path)
        .await
        .map_err(|e| PublishError::Upload {
            message: format!(
                "error opening artifact file {}: {e}",
                artifact.local_path.display()
            ),
        })?;
    let bytes = file.metadata().await?.len();

    let spinner = plasma_util::progress::spinner(&format!("Uploading {}", artifact.file_name));
    let result = transport.put_file(&object_url, credentials, file, bytes).await;
    spinner.finish_and_clear();

    let status = result.map_err(|e| PublishError::Upload {
        message: format!("error uploading artifact to {object_url}: {e}"),
    })?;
    if status != StatusCode::OK && status != StatusCode::CREATED {
        return Err(PublishError::Upload {
            message: status.to_string(),
        });
    }

    tracing::info!("uploaded {bytes} bytes to {object_url} ({status})");
    Ok(TransferReceipt {
        object_url,
        status,
        bytes,
    })
}
