//! Persistent session storage.
//!
//! Stores the session triple in `<dir>/session.json` with restricted
//! permissions (0600). Tokens are never logged in full. The store performs
//! no validation; callers decide whether a stored session is still usable.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Session storage filename.
const SESSION_FILE: &str = "session.json";
/// Transient return-URL slot, consumed once per redirect round-trip.
const RETURN_URL_FILE: &str = "return_url";

/// Authenticated user snapshot, refreshed alongside token refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
}

/// A complete session: token pair plus the user it belongs to.
///
/// Persisted as one value, so partial state (token without user or vice
/// versa) cannot exist on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Short-lived bearer credential (JWT)
    pub access_token: String,
    /// Long-lived opaque credential used only to obtain new access tokens
    pub refresh_token: String,
    pub user: UserProfile,
}

/// File-backed session store.
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    /// Creates a store rooted at the given directory.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Creates a store rooted at the Vortex home directory.
    pub fn at_default() -> Self {
        Self::new(crate::config::paths::vortex_home())
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    fn return_url_path(&self) -> PathBuf {
        self.dir.join(RETURN_URL_FILE)
    }

    /// Reads the stored session, if any.
    ///
    /// A missing or unparsable file reads as absent, never as an error;
    /// stale garbage must not be able to wedge the client.
    ///
    /// # Errors
    /// Returns an error only if the file exists but cannot be read.
    pub fn read(&self) -> Result<Option<Session>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session from {}", path.display()))?;

        match serde_json::from_str(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "discarding unparsable stored session");
                Ok(None)
            }
        }
    }

    /// Persists the session with restricted permissions (0600).
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write(&self, session: &Session) -> Result<()> {
        let path = self.session_path();

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory {}", self.dir.display()))?;

        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&path)
                .with_context(|| format!("Failed to open {} for writing", path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&path, contents)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        Ok(())
    }

    /// Removes the stored session.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }

    /// Records the URL to return to after the sign-in round-trip.
    ///
    /// # Errors
    /// Returns an error if the slot cannot be written.
    pub fn save_return_url(&self, url: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory {}", self.dir.display()))?;
        let path = self.return_url_path();
        fs::write(&path, url).with_context(|| format!("Failed to write to {}", path.display()))
    }

    /// Consumes the stored return URL, removing it.
    pub fn take_return_url(&self) -> Option<String> {
        let path = self.return_url_path();
        let url = fs::read_to_string(&path).ok()?;
        let _ = fs::remove_file(&path);
        let trimmed = url.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    /// Test: read after write returns exactly the written session.
    #[test]
    fn test_session_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().to_path_buf());

        assert!(store.read().unwrap().is_none());

        let session = test_sessions::sample("a.b.c", "r1");
        store.write(&session).unwrap();

        assert_eq!(store.read().unwrap(), Some(session));
    }

    /// Test: clear removes the session; clearing an empty store is fine.
    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().to_path_buf());

        store.clear().unwrap();

        store
            .write(&test_sessions::sample("a.b.c", "r1"))
            .unwrap();
        store.clear().unwrap();
        assert!(store.read().unwrap().is_none());
    }

    /// Test: garbage on disk reads as absent, not as an error.
    #[test]
    fn test_malformed_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().to_path_buf());

        std::fs::write(dir.path().join("session.json"), "{not json").unwrap();
        assert!(store.read().unwrap().is_none());

        // Parsable JSON but missing fields is also absent
        std::fs::write(dir.path().join("session.json"), r#"{"accessToken":"a"}"#).unwrap();
        assert!(store.read().unwrap().is_none());
    }

    /// Test: wire field names are camelCase.
    #[test]
    fn test_wire_field_names() {
        let session = test_sessions::sample("a.b.c", "r1");
        let json = serde_json::to_value(&session).unwrap();

        assert!(json.get("accessToken").is_some());
        assert!(json.get("refreshToken").is_some());
        assert!(json["user"].get("isActive").is_some());
        assert!(json["user"].get("isVerified").is_some());
        assert!(json["user"].get("lastLogin").is_some());
    }

    /// Test: return URL slot is take-once.
    #[test]
    fn test_return_url_take_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().to_path_buf());

        assert!(store.take_return_url().is_none());

        store.save_return_url("http://localhost:8080/products").unwrap();
        assert_eq!(
            store.take_return_url().as_deref(),
            Some("http://localhost:8080/products")
        );
        assert!(store.take_return_url().is_none());
    }

    /// Test: session file is written with 0600 on unix.
    #[cfg(unix)]
    #[test]
    fn test_session_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().to_path_buf());
        store
            .write(&test_sessions::sample("a.b.c", "r1"))
            .unwrap();

        let mode = std::fs::metadata(dir.path().join("session.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
