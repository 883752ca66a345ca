// Credential check used to gate listings.
//
// The core never holds a secret of its own; callers hand in whatever
// verifier they trust.

/// Something that can say yes or no to an id/secret pair
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, id: &str, secret: &str) -> bool;
}

impl<F> CredentialVerifier for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn verify(&self, id: &str, secret: &str) -> bool {
        self(id, secret)
    }
}

/// A single configured id/secret pair.
///
/// Ids match case-insensitively, secrets exactly. Both sides are trimmed
/// before comparing, so stray form whitespace doesn't lock anyone out.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    id: Option<String>,
    secret: Option<String>,
}

impl StaticCredentials {
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            secret: Some(secret.into()),
        }
    }

    /// Build from possibly-missing config values. With either half missing
    /// every check fails.
    pub fn from_parts(id: Option<String>, secret: Option<String>) -> Self {
        Self { id, secret }
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, id: &str, secret: &str) -> bool {
        match (&self.id, &self.secret) {
            (Some(expected_id), Some(expected_secret)) => {
                id.trim().eq_ignore_ascii_case(expected_id.trim())
                    && secret.trim() == expected_secret.trim()
            }
            _ => false,
        }
    }
}
