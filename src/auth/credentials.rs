//! Credential management for Swyftx API authentication.

use secrecy::{ExposeSecret, SecretString};

/// The long-lived API key used for token exchange.
///
/// Swyftx authenticates by exchanging this key for a short-lived access
/// token; the key itself is never sent on regular API calls.
#[derive(Clone)]
pub struct Credentials {
    api_key: SecretString,
}

impl Credentials {
    /// Create new credentials from an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
        }
    }

    /// Create credentials from the `SWYFTX_API_KEY` environment variable.
    ///
    /// # Panics
    ///
    /// Panics if the environment variable is not set.
    pub fn from_env() -> Self {
        Self::from_env_var("SWYFTX_API_KEY")
    }

    /// Create credentials from a custom environment variable name.
    ///
    /// # Panics
    ///
    /// Panics if the environment variable is not set.
    pub fn from_env_var(key_var: &str) -> Self {
        let api_key = std::env::var(key_var)
            .unwrap_or_else(|_| panic!("Environment variable {key_var} not set"));
        Self::new(api_key)
    }

    /// Try to create credentials from the `SWYFTX_API_KEY` environment variable.
    ///
    /// Returns `None` if the environment variable is not set.
    pub fn try_from_env() -> Option<Self> {
        std::env::var("SWYFTX_API_KEY").ok().map(Self::new)
    }

    /// Get the API key for the token-exchange request body.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials::new("super_secret_key");
        let debug_str = format!("{:?}", creds);
        assert!(!debug_str.contains("super_secret_key"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_expose_key() {
        let creds = Credentials::new("my_key");
        assert_eq!(creds.expose_key(), "my_key");
    }
}
