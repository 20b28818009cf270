//! Endpoint selection: prefer the in-network fallback domain when it answers.

use crate::repository::{trim_domain, Endpoint};
use crate::transport::RepositoryTransport;

/// Probe `fallback_domain` once and pick it on a 2xx answer, else `primary_domain`.
///
/// Never fails: errors, timeouts and non-2xx statuses all mean "use the
/// primary domain".
pub async fn resolve_endpoint<T>(
    transport: &T,
    primary_domain: &str,
    fallback_domain: &str,
) -> Endpoint
where
    T: RepositoryTransport + ?Sized,
{
    let mut endpoint = Endpoint::primary(primary_domain, fallback_domain);
    let fallback = trim_domain(fallback_domain);

    match transport.probe(&fallback).await {
        Ok(status) => {
            endpoint.probe_status = Some(status.as_u16());
            if status.is_success() {
                endpoint.chosen_domain = fallback;
            } else {
                tracing::debug!("fallback {fallback} answered {status}, using primary");
            }
        }
        Err(e) => {
            tracing::debug!("fallback {fallback} unreachable ({e}), using primary");
        }
    }

    tracing::info!(
        "ARTIFACTS_REPOSITORY_DOMAIN={} probe_status={:?}",
        endpoint.chosen_domain,
        endpoint.probe_status
    );
    endpoint
}
