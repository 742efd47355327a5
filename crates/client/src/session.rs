//! Durable session storage and the authorization gate.
//!
//! The session store is the client's only persistent state: the
//! access/refresh credential pair, kept in a JSON file under the
//! `access_token` / `refresh_token` keys so it survives restarts until an
//! explicit logout. It behaves as a single-writer value cell - `set`
//! atomically replaces the whole file and `get` re-reads it on every call,
//! so reads always observe the last completed write.
//!
//! No expiry validation happens here. A stale token is only discovered by a
//! rejected request; there is no refresh-token exchange, so the remedy is
//! always a fresh login.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use thiserror::Error;
use tracing::warn;

use smartstock_core::Credential;

use crate::error::ClientError;

/// Errors raised by the session store.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the session file failed.
    #[error("session file error: {0}")]
    Io(#[from] io::Error),

    /// The credential could not be encoded for storage.
    #[error("session encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable store for the current credential pair.
///
/// Cheap to clone; clones share the same backing file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store backed by the given file path.
    ///
    /// The file (and its parent directories) are only created on the first
    /// [`set`](Self::set).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Durably persist a credential, overwriting any prior value.
    ///
    /// The write goes to a sibling temp file which is then renamed over the
    /// target, so concurrent readers never observe a half-written value.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the file cannot be written.
    pub fn set(&self, credential: &Credential) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let encoded = serde_json::to_vec_pretty(credential)?;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, &encoded)?;
        fs::rename(&staging, &self.path)?;

        Ok(())
    }

    /// Read the current credential.
    ///
    /// Returns `None` when no credential is stored, and also when the stored
    /// value is unusable - unparseable, or with an empty access token. An
    /// unusable value is logged and treated as absent rather than surfaced:
    /// the caller's remedy is the same either way, a fresh login.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] only for I/O failures other than the file
    /// not existing.
    pub fn get(&self) -> Result<Option<Credential>, SessionError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        match serde_json::from_slice::<Credential>(&raw) {
            Ok(credential) if credential.is_well_formed() => Ok(Some(credential)),
            Ok(_) => {
                warn!("stored session has an empty access token; treating as absent");
                Ok(None)
            }
            Err(error) => {
                warn!(%error, "stored session is unparseable; treating as absent");
                Ok(None)
            }
        }
    }

    /// Remove any persisted credential. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// Outcome of a session check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// A credential is present; the protected operation may proceed.
    Authorized,
    /// No credential; the operation must be cancelled in favor of login.
    Unauthorized,
}

/// Gate that permits protected operations only while a credential is held.
///
/// A pure presence check: no expiry or signature validation, no caching of
/// the decision - every call re-reads the store.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    store: SessionStore,
}

impl SessionGuard {
    /// Create a guard over the given store.
    #[must_use]
    pub const fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// Check the store at this instant.
    #[must_use]
    pub fn check(&self) -> Access {
        match self.store.get() {
            Ok(Some(_)) => Access::Authorized,
            Ok(None) | Err(_) => Access::Unauthorized,
        }
    }

    /// Require a credential, yielding it or the login-redirect signal.
    ///
    /// # Errors
    ///
    /// [`ClientError::LoginRequired`] when no credential is held;
    /// [`ClientError::Session`] if the store itself fails.
    pub fn require(&self) -> Result<Credential, ClientError> {
        self.store.get()?.ok_or(ClientError::LoginRequired)
    }
}

/// Best-effort display name from the access token's JWT payload.
///
/// An unverified peek at the `username` (or `email`) claim, for greeting
/// only - authorization always goes to the service. Returns `None` for
/// opaque or malformed tokens.
#[must_use]
pub fn display_name(credential: &Credential) -> Option<String> {
    let payload = credential.access_token().split('.').nth(1)?;
    let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&decoded).ok()?;

    ["username", "email"]
        .iter()
        .find_map(|claim| claims.get(claim))
        .and_then(|value| value.as_str())
        .map(String::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session.json"))
    }

    #[test]
    fn test_set_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let credential = Credential::new("access-1", "refresh-1");

        store.set(&credential).unwrap();
        assert_eq!(store.get().unwrap(), Some(credential));
    }

    #[test]
    fn test_get_absent_when_never_set() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).get().unwrap(), None);
    }

    #[test]
    fn test_set_overwrites_prior_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.set(&Credential::new("old", "old-r")).unwrap();
        store.set(&Credential::new("new", "new-r")).unwrap();

        let current = store.get().unwrap().unwrap();
        assert_eq!(current.access_token(), "new");
    }

    #[test]
    fn test_clear_removes_credential_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.set(&Credential::new("access", "refresh")).unwrap();
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);

        // Clearing again is not an error.
        store.clear().unwrap();
    }

    #[test]
    fn test_set_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested/dirs/session.json"));

        store.set(&Credential::new("access", "refresh")).unwrap();
        assert!(store.get().unwrap().is_some());
    }

    #[test]
    fn test_unparseable_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        fs::write(store.path(), b"not json at all").unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_empty_access_token_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        fs::write(
            store.path(),
            br#"{"access_token": "", "refresh_token": "r"}"#,
        )
        .unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_uses_contract_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.set(&Credential::new("a", "r")).unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();

        assert!(raw.contains("\"access_token\""));
        assert!(raw.contains("\"refresh_token\""));
    }

    #[test]
    fn test_guard_tracks_store_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let guard = SessionGuard::new(store.clone());

        assert_eq!(guard.check(), Access::Unauthorized);

        store.set(&Credential::new("access", "refresh")).unwrap();
        assert_eq!(guard.check(), Access::Authorized);

        // No decision caching: an external clear is visible immediately.
        store.clear().unwrap();
        assert_eq!(guard.check(), Access::Unauthorized);
    }

    #[test]
    fn test_display_name_reads_username_claim() {
        let payload = URL_SAFE_NO_PAD.encode(br#"{"username": "ada", "exp": 1}"#);
        let credential = Credential::new(format!("header.{payload}.signature"), "refresh");

        assert_eq!(display_name(&credential), Some("ada".to_string()));
    }

    #[test]
    fn test_display_name_is_none_for_opaque_tokens() {
        let credential = Credential::new("not-a-jwt", "refresh");
        assert_eq!(display_name(&credential), None);
    }

    #[test]
    fn test_guard_require_yields_credential_or_login_signal() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let guard = SessionGuard::new(store.clone());

        assert!(matches!(
            guard.require(),
            Err(ClientError::LoginRequired)
        ));

        store.set(&Credential::new("access", "refresh")).unwrap();
        assert_eq!(guard.require().unwrap().access_token(), "access");
    }
}
