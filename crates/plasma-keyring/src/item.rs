use serde::{Deserialize, Serialize};

/// Username and password for one repository URL.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsItem {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl CredentialsItem {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of logs and panic messages.
impl std::fmt::Debug for CredentialsItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsItem")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_masks_password() {
        let item = CredentialsItem::new("https://repo", "alice", "s3cret");
        let rendered = format!("{item:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("s3cret"));
    }
}
