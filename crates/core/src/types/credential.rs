//! Session credential types.
//!
//! The access/refresh token pair issued by the inventory service's token
//! endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The access/refresh token pair identifying an authenticated session.
///
/// Created on successful login and overwritten on re-login. The session
/// store owns the persisted copy; everything else reads through accessors.
///
/// Implements `Debug` manually to redact both tokens.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    access_token: String,
    refresh_token: String,
}

impl Credential {
    /// Create a new credential pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// The bearer token attached to authorized requests.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The refresh token returned at login.
    ///
    /// Persisted alongside the access token; there is no client-side refresh
    /// exchange, so a rejected access token means re-authenticating.
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Whether the credential is structurally valid.
    ///
    /// A credential with an empty (or whitespace-only) access token cannot
    /// authorize anything and is treated as absent by the session store.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.access_token.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let credential = Credential::new("access-abc", "refresh-xyz");
        assert_eq!(credential.access_token(), "access-abc");
        assert_eq!(credential.refresh_token(), "refresh-xyz");
    }

    #[test]
    fn test_well_formed() {
        assert!(Credential::new("token", "refresh").is_well_formed());
        assert!(Credential::new("token", "").is_well_formed());
        assert!(!Credential::new("", "refresh").is_well_formed());
        assert!(!Credential::new("   ", "refresh").is_well_formed());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let credential = Credential::new("super-secret-access", "super-secret-refresh");
        let debug_output = format!("{credential:?}");

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-access"));
        assert!(!debug_output.contains("super-secret-refresh"));
    }

    #[test]
    fn test_serde_uses_storage_keys() {
        let credential = Credential::new("a", "r");
        let value = serde_json::to_value(&credential).unwrap();

        assert_eq!(value["access_token"], "a");
        assert_eq!(value["refresh_token"], "r");

        let parsed: Credential = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, credential);
    }
}
