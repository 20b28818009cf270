//! Repository endpoint: which domain this run talks to and its URL layout.

use plasma_core::artifact::ArtifactDescriptor;

/// The artifacts repository chosen for a publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub primary_domain: String,
    pub fallback_domain: String,
    pub chosen_domain: String,
    /// Status returned by the fallback liveness probe, if it answered at all.
    pub probe_status: Option<u16>,
}

impl Endpoint {
    /// An endpoint that uses the primary domain without probing.
    pub fn primary(primary_domain: &str, fallback_domain: &str) -> Self {
        let primary_domain = trim_domain(primary_domain);
        Self {
            chosen_domain: primary_domain.clone(),
            primary_domain,
            fallback_domain: trim_domain(fallback_domain),
            probe_status: None,
        }
    }

    /// Whether the fallback domain was selected.
    pub fn is_fallback(&self) -> bool {
        self.chosen_domain == self.fallback_domain
    }

    /// Hosted repository holding artifacts for `repository_name`.
    ///
    /// `my-repo` becomes `{domain}/repository/my-repo-artifacts`
    pub fn repository_url(&self, repository_name: &str) -> String {
        format!(
            "{}/repository/{repository_name}-artifacts",
            self.chosen_domain
        )
    }

    /// Full URL the archive is uploaded to.
    pub fn object_url(&self, artifact: &ArtifactDescriptor) -> String {
        format!(
            "{}/{}",
            self.repository_url(&artifact.repository_name),
            artifact.file_name
        )
    }
}

pub(crate) fn trim_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use plasma_core::identity::RepositoryIdentity;
    use std::path::Path;

    fn descriptor() -> ArtifactDescriptor {
        let identity = RepositoryIdentity {
            name: "sample".to_string(),
            commit_short_hash: "abcdef1".to_string(),
        };
        ArtifactDescriptor::new(&identity, Path::new("."), ".compose/artifacts")
    }

    #[test]
    fn primary_trims_trailing_slash() {
        let ep = Endpoint::primary("https://repo.example.com/", "http://internal:8081/");
        assert_eq!(ep.chosen_domain, "https://repo.example.com");
        assert_eq!(ep.fallback_domain, "http://internal:8081");
        assert!(!ep.is_fallback());
    }

    #[test]
    fn object_url_format() {
        let ep = Endpoint::primary("https://repo.example.com", "http://internal:8081");
        assert_eq!(
            ep.object_url(&descriptor()),
            "https://repo.example.com/repository/sample-artifacts/sample-abcdef1-plasma-src.tar.gz"
        );
    }

    #[test]
    fn object_url_follows_chosen_domain() {
        let mut ep = Endpoint::primary("https://repo.example.com", "http://internal:8081");
        ep.chosen_domain = ep.fallback_domain.clone();
        assert!(ep.is_fallback());
        assert!(ep
            .object_url(&descriptor())
            .starts_with("http://internal:8081/repository/sample-artifacts/"));
    }
}
