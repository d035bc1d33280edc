//! Session token accessor
//!
//! The auth token is held by an explicit [`Session`] that callers share via
//! `Arc` instead of living in ambient global storage. A session can
//! optionally be backed by a JSON file so the CLI stays signed in between
//! invocations; stored tokens are discarded after [`SESSION_MAX_AGE_SECS`].

use chrono::{DateTime, Utc};
use rentdesk_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Stored tokens older than a day are treated as gone
pub const SESSION_MAX_AGE_SECS: i64 = 86_400;

/// Observable sign-in state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    SignedOut,
    SignedIn,
    /// The backend rejected the token; the user has to sign in again
    Expired,
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    username: Option<String>,
}

/// On-disk form of a session
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    #[serde(default)]
    username: Option<String>,
    saved_at: DateTime<Utc>,
}

/// Holder of the current auth token
pub struct Session {
    state: RwLock<SessionState>,
    path: Option<PathBuf>,
    status: watch::Sender<SessionStatus>,
}

impl Session {
    /// A session that lives only as long as this value
    pub fn in_memory() -> Self {
        Self::from_state(SessionState::default(), None)
    }

    /// An in-memory session that starts signed in
    pub fn with_token(token: &str) -> Self {
        Self::from_state(
            SessionState {
                token: Some(token.to_string()),
                username: None,
            },
            None,
        )
    }

    /// A session persisted at `path`, restored from it if present and fresh
    pub fn persistent(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match load_stored(&path) {
            Some(stored) if !is_stale(&stored, Utc::now()) => {
                debug!("Restored session from {}", path.display());
                SessionState {
                    token: Some(stored.token),
                    username: stored.username,
                }
            }
            Some(_) => {
                info!("Stored session is older than a day, discarding it");
                remove_file(&path)?;
                SessionState::default()
            }
            None => SessionState::default(),
        };

        Ok(Self::from_state(state, Some(path)))
    }

    fn from_state(state: SessionState, path: Option<PathBuf>) -> Self {
        let initial = if state.token.is_some() {
            SessionStatus::SignedIn
        } else {
            SessionStatus::SignedOut
        };
        let (status, _) = watch::channel(initial);
        Self {
            state: RwLock::new(state),
            path,
            status,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    /// Username recorded at sign-in or verification, for display only
    pub fn username(&self) -> Option<String> {
        self.read().username.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        {
            let mut state = self.write();
            state.token = Some(token.to_string());
            self.persist(&state)?;
        }
        self.status.send_replace(SessionStatus::SignedIn);
        Ok(())
    }

    pub fn set_username(&self, username: &str) -> Result<()> {
        let mut state = self.write();
        state.username = Some(username.to_string());
        self.persist(&state)
    }

    /// Forget the token (and the username that came with it)
    pub fn clear_token(&self) -> Result<()> {
        let result = {
            let mut state = self.write();
            *state = SessionState::default();
            self.persist(&state)
        };
        self.status.send_replace(SessionStatus::SignedOut);
        result
    }

    /// Clear local state after the backend rejected the token
    pub fn expire(&self) {
        {
            let mut state = self.write();
            *state = SessionState::default();
            if let Err(e) = self.persist(&state) {
                warn!("Failed to remove stored session: {}", e);
            }
        }
        info!("Session expired, sign-in required");
        self.status.send_replace(SessionStatus::Expired);
    }

    /// Expire the session once `delay` has passed, leaving time to show why
    pub fn expire_after(self: &Arc<Self>, delay: Duration) -> JoinHandle<()> {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            session.expire();
        })
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    fn persist(&self, state: &SessionState) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let Some(token) = &state.token else {
            return remove_file(path);
        };

        let stored = StoredSession {
            token: token.clone(),
            username: state.username.clone(),
            saved_at: Utc::now(),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::SessionError(e.to_string()))?;
        }
        let json = serde_json::to_vec_pretty(&stored)?;
        std::fs::write(path, json).map_err(|e| Error::SessionError(e.to_string()))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("signed_in", &self.is_signed_in())
            .field("username", &self.username())
            .field("path", &self.path)
            .finish()
    }
}

fn load_stored(path: &Path) -> Option<StoredSession> {
    let raw = std::fs::read(path).ok()?;
    match serde_json::from_slice(&raw) {
        Ok(stored) => Some(stored),
        Err(e) => {
            warn!("Ignoring unreadable session file {}: {}", path.display(), e);
            None
        }
    }
}

fn is_stale(stored: &StoredSession, now: DateTime<Utc>) -> bool {
    (now - stored.saved_at).num_seconds() > SESSION_MAX_AGE_SECS
}

fn remove_file(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::SessionError(e.to_string())),
    }
}
