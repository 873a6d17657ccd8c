//! services/web/src/web/state.rs
//!
//! Defines the application's shared and session-specific states.

use crate::config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use study_planner_core::{domain::ChatHistory, ports::TextGenerationService};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Sessions)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub generator: Arc<dyn TextGenerationService>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Arc<Config>, generator: Arc<dyn TextGenerationService>) -> Self {
        let sessions = SessionStore::new(config.session_idle_timeout);
        Self {
            config,
            generator,
            sessions,
        }
    }
}

//=========================================================================================
// ChatSession (Specific to One Browser Session)
//=========================================================================================

/// The state held for a single browser session.
#[derive(Debug, Default)]
pub struct ChatSession {
    pub history: ChatHistory,
}

/// A session resolved for the current request, as placed in request extensions
/// by the session middleware.
///
/// A handle for an id the store does not know yet carries a detached, empty
/// session. Handlers that process an event call [`SessionStore::register`]
/// to get the stored session instead.
#[derive(Clone)]
pub struct SessionHandle {
    pub id: Uuid,
    /// `true` when the request carried no usable session cookie and one has
    /// to be sent with the response.
    pub issue_cookie: bool,
    pub session: Arc<Mutex<ChatSession>>,
}

//=========================================================================================
// SessionStore (In-Memory Session Registry)
//=========================================================================================

struct SessionEntry {
    session: Arc<Mutex<ChatSession>>,
    last_seen: Instant,
}

/// In-memory registry of live sessions. Nothing survives a restart.
///
/// Sessions are only stored once an event is processed for them, and a stored
/// session that stays idle for longer than `idle_timeout` is dropped the next
/// time a session is registered.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SESSION_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Looks up the session for `id` without storing anything.
    ///
    /// A missing id gets a fresh one. An id that is well formed but unknown
    /// (never registered, or evicted) is kept, so the browser's cookie stays valid.
    pub async fn resolve(&self, id: Option<Uuid>) -> SessionHandle {
        if let Some(id) = id {
            if let Some(entry) = self.sessions.write().await.get_mut(&id) {
                entry.last_seen = Instant::now();
                return SessionHandle {
                    id,
                    issue_cookie: false,
                    session: entry.session.clone(),
                };
            }
        }

        SessionHandle {
            id: id.unwrap_or_else(Uuid::new_v4),
            issue_cookie: id.is_none(),
            session: Arc::new(Mutex::new(ChatSession::default())),
        }
    }

    /// Stores the handle's session if its id is not stored yet and returns the
    /// stored session for the id.
    ///
    /// Concurrent requests for the same new id all get the same session.
    pub async fn register(&self, handle: &SessionHandle) -> Arc<Mutex<ChatSession>> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let idle_timeout = self.idle_timeout;
        sessions.retain(|id, entry| {
            *id == handle.id || now.duration_since(entry.last_seen) < idle_timeout
        });

        let entry = sessions.entry(handle.id).or_insert_with(|| SessionEntry {
            session: handle.session.clone(),
            last_seen: now,
        });
        entry.last_seen = now;
        entry.session.clone()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
