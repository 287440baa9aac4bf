use std::sync::{Arc, RwLock};

use atrium_core::{AuthToken, User, UserPatch};
use serde::{Deserialize, Serialize};

use crate::api::{AuthApi, Credentials};
use crate::error::AuthError;
use crate::storage::{SESSION_KEY, SessionStorage};

/// Immutable point-in-time view of the session.
///
/// `version` increments on every store mutation; two snapshots with equal
/// versions describe the same session state. Readers never observe a torn
/// user/token pair — both are set and cleared under one lock.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<AuthToken>,
    pub ready: bool,
    pub version: u64,
}

impl Session {
    /// Derived, never stored: a session is authenticated exactly when
    /// both user and token are present.
    #[must_use]
    pub const fn authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}

/// The serialized blob persisted under [`SESSION_KEY`].
///
/// Both fields are required: a blob missing either fails to parse and is
/// treated as "no stored session", which is how partially-written state
/// degrades instead of producing a torn session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub user: User,
    pub token: AuthToken,
}

#[derive(Default)]
struct State {
    user: Option<User>,
    token: Option<AuthToken>,
    ready: bool,
    version: u64,
}

/// Owner of the authoritative in-memory session.
///
/// Constructed once at process start, hydrated once, and shared by
/// reference for the life of the process. All mutation goes through this
/// service; everything else reads [`Session`] snapshots.
///
/// `login`/`logout`/`refresh` serialize on an internal gate: rapid
/// repeated submits queue instead of racing, so the last-resolved call's
/// effect is the one left in place.
pub struct SessionService {
    storage: Arc<dyn SessionStorage>,
    api: Arc<dyn AuthApi>,
    state: RwLock<State>,
    auth_gate: tokio::sync::Mutex<()>,
}

impl SessionService {
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>, api: Arc<dyn AuthApi>) -> Self {
        Self {
            storage,
            api,
            state: RwLock::new(State::default()),
            auth_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Current session snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned, which cannot happen outside
    /// a prior panic.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        let state = self.state.read().expect("session lock poisoned");
        Session {
            user: state.user.clone(),
            token: state.token.clone(),
            ready: state.ready,
            version: state.version,
        }
    }

    /// Restore the session from storage, once.
    ///
    /// Marks the session ready regardless of what storage held: absent,
    /// malformed, or partial blobs all hydrate to an empty-but-ready
    /// session. Calls after the first completed hydration are no-ops.
    /// Never fails.
    pub async fn hydrate(&self) {
        if self.snapshot().ready {
            tracing::debug!("session already hydrated; skipping");
            return;
        }

        let stored = match self.storage.get(SESSION_KEY).await {
            Some(blob) => match serde_json::from_str::<StoredSession>(&blob) {
                Ok(stored) => Some(stored),
                Err(error) => {
                    tracing::warn!(%error, "stored session is malformed; starting empty");
                    None
                }
            },
            None => None,
        };

        let mut state = self.state.write().expect("session lock poisoned");
        if state.ready {
            return;
        }
        if let Some(stored) = stored {
            state.user = Some(stored.user);
            state.token = Some(stored.token);
        }
        state.ready = true;
        state.version += 1;
        tracing::debug!(authenticated = state.user.is_some(), "session hydrated");
    }

    /// Authenticate against the backend.
    ///
    /// On success the user and token are set together and the combined
    /// blob is written through to storage before this returns. On failure
    /// the session is left exactly as it was.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] on a credential failure,
    /// [`AuthError::Transport`] / [`AuthError::Api`] on network or
    /// protocol trouble.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let _gate = self.auth_gate.lock().await;

        let response = self.api.login(credentials).await?;
        let stored = StoredSession {
            user: response.user.clone(),
            token: response.token.clone(),
        };

        {
            let mut state = self.state.write().expect("session lock poisoned");
            state.user = Some(response.user.clone());
            state.token = Some(response.token);
            state.version += 1;
        }
        self.persist(&stored).await;

        tracing::info!(user = %stored.user.username, "logged in");
        Ok(response.user)
    }

    /// End the session.
    ///
    /// The backend notification is best-effort: a failed request is
    /// logged and local state is cleared regardless. Never fails.
    pub async fn logout(&self) {
        let _gate = self.auth_gate.lock().await;

        let token = self.snapshot().token;
        if let Some(token) = token
            && let Err(error) = self.api.logout(&token).await
        {
            tracing::warn!(%error, "logout request failed; clearing local session anyway");
        }

        {
            let mut state = self.state.write().expect("session lock poisoned");
            state.user = None;
            state.token = None;
            state.version += 1;
        }
        self.storage.remove(SESSION_KEY).await;
        tracing::info!("logged out");
    }

    /// Merge a profile patch into the current user and rewrite storage.
    ///
    /// Returns the updated user, or `None` when no session exists — an
    /// anonymous session is left untouched.
    pub async fn update_user(&self, patch: &UserPatch) -> Option<User> {
        let stored = {
            let mut state = self.state.write().expect("session lock poisoned");
            let token = state.token.clone();
            let (Some(user), Some(token)) = (state.user.as_mut(), token) else {
                return None;
            };
            patch.apply_to(user);
            let user = user.clone();
            state.version += 1;
            StoredSession {
                user,
                token,
            }
        };
        self.persist(&stored).await;
        Some(stored.user)
    }

    /// Exchange the held refresh token for a fresh access token,
    /// write-through.
    ///
    /// The backend may omit a new refresh token; the previous one is kept
    /// in that case so refresh stays repeatable.
    ///
    /// # Errors
    ///
    /// [`AuthError::NotAuthenticated`] on an anonymous session,
    /// [`AuthError::NoRefreshToken`] when the held token has no refresh
    /// counterpart, plus the [`AuthApi::refresh`] failures.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let _gate = self.auth_gate.lock().await;

        let snapshot = self.snapshot();
        let (Some(_), Some(token)) = (&snapshot.user, &snapshot.token) else {
            return Err(AuthError::NotAuthenticated);
        };
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or(AuthError::NoRefreshToken)?;

        let mut new_token = self.api.refresh(&refresh_token).await?;
        if new_token.refresh_token.is_none() {
            new_token.refresh_token = Some(refresh_token);
        }

        let stored = {
            let mut state = self.state.write().expect("session lock poisoned");
            let (Some(user), Some(token)) = (state.user.clone(), state.token.as_mut()) else {
                return Err(AuthError::NotAuthenticated);
            };
            *token = new_token;
            let token = token.clone();
            state.version += 1;
            StoredSession {
                user,
                token,
            }
        };
        self.persist(&stored).await;
        Ok(())
    }

    async fn persist(&self, stored: &StoredSession) {
        match serde_json::to_string(stored) {
            Ok(blob) => self.storage.set(SESSION_KEY, &blob).await,
            Err(error) => {
                tracing::warn!(%error, "failed to serialize session blob; not persisted");
            }
        }
    }
}
