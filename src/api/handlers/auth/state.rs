//! Shared state for the sign-in flows: configuration, the session store, and
//! the provider client they all hang off.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use uuid::Uuid;

use super::csrf;
use crate::provider::Provider;

const DEFAULT_SESSION_TTL_SECONDS: u64 = 12 * 60 * 60;

/// Tunables for session handling.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    session_ttl_seconds: u64,
    secure_cookies: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            secure_cookies: false,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    /// Mark session cookies `Secure` for TLS-terminated deployments.
    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    pub(super) fn session_ttl_seconds(&self) -> u64 {
        self.session_ttl_seconds
    }

    pub(super) fn session_cookie_secure(&self) -> bool {
        self.secure_cookies
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity attached to a session. Either every field is known or none is,
/// so a half-connected session cannot be represented at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionAuth {
    Disconnected,
    Connected(ConnectedUser),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectedUser {
    pub access_token: String,
    pub subject_id: String,
    pub user_id: i64,
    pub display_name: String,
    pub email: String,
}

struct Session {
    state: Option<String>,
    auth: SessionAuth,
    created_at: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            state: None,
            auth: SessionAuth::Disconnected,
            created_at: Instant::now(),
        }
    }
}

/// In-memory session store keyed by the cookie id, swept on access so expired
/// entries never resurrect.
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Return the id of a live session, minting a fresh one when the cookie
    /// is missing, unknown, or expired. The flag reports whether a new
    /// session was created and its cookie must be set on the response.
    ///
    /// A presented id that is not in the store is never adopted, which keeps
    /// clients from fixating their own session ids.
    pub async fn ensure(&self, presented: Option<Uuid>) -> (Uuid, bool) {
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, session| session.created_at.elapsed() < self.ttl);

        if let Some(id) = presented {
            if sessions.contains_key(&id) {
                return (id, false);
            }
        }

        let id = Uuid::new_v4();
        sessions.insert(id, Session::new());
        (id, true)
    }

    /// Issue the session's anti-forgery state token on first use and keep it
    /// stable afterwards.
    pub async fn ensure_state(&self, id: Uuid) -> String {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(id).or_insert_with(Session::new);
        session
            .state
            .get_or_insert_with(csrf::generate_state_token)
            .clone()
    }

    pub async fn state(&self, id: Uuid) -> Option<String> {
        let sessions = self.sessions.lock().await;
        sessions.get(&id).and_then(|session| session.state.clone())
    }

    pub async fn auth(&self, id: Uuid) -> SessionAuth {
        let sessions = self.sessions.lock().await;
        sessions
            .get(&id)
            .map_or(SessionAuth::Disconnected, |session| session.auth.clone())
    }

    /// Attach a fully resolved identity to the session in one step.
    pub async fn connect(&self, id: Uuid, user: ConnectedUser) {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(id).or_insert_with(Session::new);
        session.auth = SessionAuth::Connected(user);
    }

    /// Drop the session's identity. Clearing is total by construction, so an
    /// interrupted connect can never leave partial fields behind.
    pub async fn disconnect(&self, id: Uuid) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(&id) {
            session.auth = SessionAuth::Disconnected;
        }
    }
}

/// Everything the auth handlers share, injected as one extension.
pub struct AuthState {
    config: AuthConfig,
    provider: Provider,
    sessions: SessionStore,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, provider: Provider) -> Self {
        let sessions = SessionStore::new(Duration::from_secs(config.session_ttl_seconds()));
        Self {
            config,
            provider,
            sessions,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(Duration::from_secs(60))
    }

    fn connected_user() -> ConnectedUser {
        ConnectedUser {
            access_token: "token-1".to_string(),
            subject_id: "subject-1".to_string(),
            user_id: 7,
            display_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = AuthConfig::new();

        assert_eq!(config.session_ttl_seconds(), 12 * 60 * 60);
        assert!(!config.session_cookie_secure());

        let config = AuthConfig::new()
            .with_session_ttl_seconds(60)
            .with_secure_cookies(true);

        assert_eq!(config.session_ttl_seconds(), 60);
        assert!(config.session_cookie_secure());
    }

    #[tokio::test]
    async fn test_ensure_reuses_live_session() {
        let store = store();

        let (id, created) = store.ensure(None).await;
        assert!(created);

        let (again, created) = store.ensure(Some(id)).await;
        assert!(!created);
        assert_eq!(id, again);
    }

    #[tokio::test]
    async fn test_ensure_rejects_unknown_session_id() {
        let store = store();
        let forged = Uuid::new_v4();

        let (id, created) = store.ensure(Some(forged)).await;

        assert!(created);
        assert_ne!(id, forged);
    }

    #[tokio::test]
    async fn test_ensure_drops_expired_sessions() {
        let store = SessionStore::new(Duration::ZERO);

        let (id, _) = store.ensure(None).await;
        let (fresh, created) = store.ensure(Some(id)).await;

        assert!(created);
        assert_ne!(id, fresh);
    }

    #[tokio::test]
    async fn test_ensure_state_is_idempotent() {
        let store = store();
        let (id, _) = store.ensure(None).await;

        let first = store.ensure_state(id).await;
        let second = store.ensure_state(id).await;

        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        assert_eq!(store.state(id).await.as_deref(), Some(first.as_str()));
    }

    #[tokio::test]
    async fn test_connect_then_disconnect() {
        let store = store();
        let (id, _) = store.ensure(None).await;

        assert_eq!(store.auth(id).await, SessionAuth::Disconnected);

        store.connect(id, connected_user()).await;
        let auth = store.auth(id).await;
        let SessionAuth::Connected(user) = auth else {
            panic!("expected a connected session");
        };
        assert_eq!(user.user_id, 7);
        assert_eq!(user.subject_id, "subject-1");

        store.disconnect(id).await;
        assert_eq!(store.auth(id).await, SessionAuth::Disconnected);
    }

    #[tokio::test]
    async fn test_auth_defaults_to_disconnected_for_unknown_session() {
        let store = store();

        assert_eq!(store.auth(Uuid::new_v4()).await, SessionAuth::Disconnected);
    }
}
