//! The publish pipeline.
//!
//! Stages run strictly in order and stop at the first error:
//!
//! 1. repository identity → artifact descriptor
//! 2. artifact presence check (before any network traffic)
//! 3. endpoint selection
//! 4. credential resolution
//! 5. authenticated probe + upload
//! 6. credential persistence, only when 5 succeeded with new credentials

use std::path::PathBuf;

use plasma_core::artifact::ArtifactDescriptor;
use plasma_core::config::GlobalConfig;
use plasma_core::identity;
use plasma_keyring::CredentialStore;
use plasma_repository::endpoint::resolve_endpoint;
use plasma_repository::publish::{publish_artifact, TransferReceipt};
use plasma_repository::repository::Endpoint;
use plasma_repository::transport::RepositoryTransport;
use plasma_util::errors::{PublishError, PublishResult};
use plasma_util::fs::{human_readable_size, list_files};
use plasma_util::progress;

use crate::credentials::{CredentialSession, PersistOutcome};
use crate::terminal::TerminalInput;

/// Inputs from the command line.
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    pub project_root: PathBuf,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// What a successful run did.
#[derive(Debug)]
pub struct PublishReport {
    pub endpoint: Endpoint,
    pub receipt: TransferReceipt,
    /// New credentials were written to the store.
    pub credentials_saved: bool,
    /// The upload succeeded but new credentials could not be saved.
    pub persist_warning: Option<PublishError>,
}

/// Publish the archive for the git checkout at `options.project_root`.
pub async fn publish<T>(
    config: &GlobalConfig,
    options: &PublishOptions,
    transport: &T,
    store: &mut dyn CredentialStore,
    terminal: &dyn TerminalInput,
) -> PublishResult<PublishReport>
where
    T: RepositoryTransport + ?Sized,
{
    let identity = identity::resolve(&options.project_root)?;
    let artifact = ArtifactDescriptor::new(&identity, &options.project_root, &config.artifacts.dir);
    publish_descriptor(config, options, &artifact, transport, store, terminal).await
}

/// Publish an already-described archive. Stages 2–6 of the pipeline.
pub async fn publish_descriptor<T>(
    config: &GlobalConfig,
    options: &PublishOptions,
    artifact: &ArtifactDescriptor,
    transport: &T,
    store: &mut dyn CredentialStore,
    terminal: &dyn TerminalInput,
) -> PublishResult<PublishReport>
where
    T: RepositoryTransport + ?Sized,
{
    tracing::info!("ARTIFACT_DIR={}", artifact.artifact_dir);
    tracing::info!("ARTIFACT_FILE={}", artifact.file_name);

    progress::status_info(
        "Looking",
        &format!("for artifact {} in {}", artifact.file_name, artifact.artifact_dir),
    );
    artifact.ensure_exists()?;
    print_artifact_listing(artifact);

    let endpoint = resolve_endpoint(
        transport,
        &config.repository.primary_domain,
        &config.repository.fallback_domain,
    )
    .await;
    print_endpoint(&endpoint);

    let mut session = CredentialSession::new(store);
    let transfer = authenticate_and_upload(
        &mut session,
        options,
        artifact,
        &endpoint,
        transport,
        terminal,
    )
    .await;

    let persisted = session.finish();
    let receipt = transfer?;

    progress::status(
        "Published",
        &format!("{} ({})", receipt.object_url, receipt.status),
    );

    let (credentials_saved, persist_warning) = match persisted {
        PersistOutcome::NothingToSave => (false, None),
        PersistOutcome::Saved => {
            progress::status_info(
                "Saved",
                &format!("credentials for {}", endpoint.chosen_domain),
            );
            (true, None)
        }
        PersistOutcome::Failed(e) => {
            tracing::warn!("{e}");
            progress::status_warn("Warning", &e.to_string());
            (false, Some(e))
        }
    };

    Ok(PublishReport {
        endpoint,
        receipt,
        credentials_saved,
        persist_warning,
    })
}

async fn authenticate_and_upload<T>(
    session: &mut CredentialSession<'_>,
    options: &PublishOptions,
    artifact: &ArtifactDescriptor,
    endpoint: &Endpoint,
    transport: &T,
    terminal: &dyn TerminalInput,
) -> PublishResult<TransferReceipt>
where
    T: RepositoryTransport + ?Sized,
{
    let resolved = session.resolve(
        terminal,
        &endpoint.chosen_domain,
        options.username.as_deref(),
        options.password.as_deref(),
    )?;
    if resolved.should_persist {
        progress::status_info(
            "Credentials",
            &format!(
                "entered for {} (saved after a successful upload)",
                endpoint.chosen_domain
            ),
        );
    } else {
        progress::status_info(
            "Credentials",
            &format!("loaded from keyring for {}", endpoint.chosen_domain),
        );
    }

    let object_url = endpoint.object_url(artifact);
    tracing::info!("ARTIFACT_ARCHIVE_URL={object_url}");
    log_digest(artifact);
    progress::status(
        "Publishing",
        &format!(
            "{}/{} to {object_url}",
            artifact.artifact_dir, artifact.file_name
        ),
    );

    let receipt = publish_artifact(transport, artifact, endpoint, &resolved.item).await?;
    session.confirm();
    Ok(receipt)
}

fn print_endpoint(endpoint: &Endpoint) {
    let observed = endpoint
        .probe_status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unreachable".to_string());
    progress::status_info(
        "Domain",
        &format!(
            "{} (fallback {} probe: {observed})",
            endpoint.chosen_domain, endpoint.fallback_domain
        ),
    );
}

/// Diagnostic listing of the artifact directory; problems are only warnings.
fn print_artifact_listing(artifact: &ArtifactDescriptor) {
    match list_files(artifact.dir()) {
        Ok(files) => {
            progress::status_info("Listing", &format!("files in {}", artifact.artifact_dir));
            for file in files {
                eprintln!("{:>12} {:>10} {}", "", human_readable_size(file.size), file.name);
            }
        }
        Err(e) => {
            tracing::warn!("cannot list {}: {e}", artifact.dir().display());
        }
    }
}

fn log_digest(artifact: &ArtifactDescriptor) {
    match plasma_util::hash::digest_file(&artifact.local_path) {
        Ok(d) => tracing::info!(
            "artifact {} size={} sha256={}",
            artifact.file_name,
            d.size,
            d.sha256
        ),
        Err(e) => tracing::warn!("cannot hash {}: {e}", artifact.local_path.display()),
    }
}
