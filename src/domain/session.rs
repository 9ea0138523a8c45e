//! Session bootstrap.
//!
//! The persisted auth blob is passed in explicitly and parsed once at session
//! start; nothing reads ambient storage at module load time.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::User;
use crate::Result;

/// The persisted auth blob: the API token plus the logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    pub token: String,
    pub user: User,
}

/// Auth state at session start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl AuthState {
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Builds the initial auth state from a persisted blob, if any.
///
/// Called once at session start. A missing blob yields the logged-out state;
/// a malformed one is an error, not a silent logout.
pub fn initial_auth_state(blob: Option<&str>) -> Result<AuthState> {
    match blob {
        None => Ok(AuthState::default()),
        Some(raw) => {
            let auth: AuthToken = serde_json::from_str(raw)?;
            Ok(AuthState {
                token: Some(auth.token),
                user: Some(auth.user),
            })
        }
    }
}

/// Loads the persisted auth blob from a file and builds the initial state.
///
/// A missing file is treated as no persisted session.
pub fn initial_auth_state_from_file(path: impl AsRef<Path>) -> Result<AuthState> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(AuthState::default());
    }
    let raw = std::fs::read_to_string(path)?;
    initial_auth_state(Some(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const BLOB: &str = r#"{
        "token": "abc.def.ghi",
        "user": {
            "id": "u-1",
            "version": 0,
            "slug": "jane-doe",
            "name": "Jane Doe",
            "email": "jane@example.com",
            "state": "active"
        }
    }"#;

    #[test]
    fn no_blob_yields_the_logged_out_state() {
        let state = initial_auth_state(None).unwrap();
        assert!(!state.is_logged_in());
        assert_eq!(state.token, None);
    }

    #[test]
    fn a_valid_blob_restores_the_user() {
        let state = initial_auth_state(Some(BLOB)).unwrap();
        assert!(state.is_logged_in());
        assert_eq!(state.user.unwrap().slug, "jane-doe");
        assert_eq!(state.token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn a_malformed_blob_is_an_error() {
        assert!(initial_auth_state(Some("{not json")).is_err());
    }

    #[test]
    fn loads_the_blob_from_a_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, BLOB).unwrap();

        let state = initial_auth_state_from_file(&path).unwrap();
        assert!(state.is_logged_in());
    }

    #[test]
    fn a_missing_file_is_a_logged_out_state() {
        let dir = tempdir().unwrap();
        let state = initial_auth_state_from_file(dir.path().join("absent.json")).unwrap();
        assert!(!state.is_logged_in());
    }
}
