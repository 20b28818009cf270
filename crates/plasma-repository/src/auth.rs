//! HTTP Basic authentication for repository requests.

use plasma_keyring::CredentialsItem;
use reqwest::RequestBuilder;

/// Attach `credentials` to `request` as an `Authorization: Basic` header.
pub fn apply_auth(request: RequestBuilder, credentials: &CredentialsItem) -> RequestBuilder {
    request.basic_auth(&credentials.username, Some(&credentials.password))
}
