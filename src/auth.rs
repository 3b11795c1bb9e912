use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, StorageError, SESSION_KEY};

const DEMO_USERNAME: &str = "admin";
const DEMO_PASSWORD: &str = "1234";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    #[serde(default)]
    pub is_authenticated: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Checks the fixed demo credentials and remembers the session.
pub fn login(
    storage: &impl KeyValueStore,
    username: &str,
    password: &str,
) -> Result<Session, AuthError> {
    if username != DEMO_USERNAME || password != DEMO_PASSWORD {
        log::warn!("login rejected username={username}");
        return Err(AuthError::InvalidCredentials);
    }
    let session = Session {
        username: username.to_string(),
        is_authenticated: true,
    };
    storage.set(SESSION_KEY, &session)?;
    log::info!("login ok username={username}");
    Ok(session)
}

pub fn logout(storage: &impl KeyValueStore) -> Result<(), StorageError> {
    storage.remove(SESSION_KEY)
}

/// The remembered session, if one exists and is authenticated.
pub fn check_auth(storage: &impl KeyValueStore) -> Option<Session> {
    match storage.get::<Session>(SESSION_KEY) {
        Ok(session) => session.filter(|s| s.is_authenticated),
        Err(error) => {
            log::warn!("stored session unreadable: {error}");
            None
        }
    }
}
