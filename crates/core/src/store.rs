//! In-memory session store.
//!
//! Each session sits behind its own async mutex, so requests for one token are
//! serialized while requests for different tokens proceed independently. The
//! map lock is only held long enough to look up, insert or purge handles.

use crate::session::Session;
use chrono::{TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a default session for `token`, replacing any existing one.
    pub async fn create(&self, token: &str) {
        let replaced = self
            .sessions
            .write()
            .await
            .insert(token.to_string(), Arc::new(Mutex::new(Session::default())))
            .is_some();
        debug!(replaced, "Session created");
    }

    /// Returns the handle for `token`, or `None` when no such session exists.
    pub async fn get(&self, token: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(token).cloned()
    }

    /// A copy of the session as it is right now.
    pub async fn snapshot(&self, token: &str) -> Option<Session> {
        let handle = self.get(token).await?;
        let session = handle.lock().await;
        Some(session.clone())
    }

    /// Records the learner's emotion. Returns `false` if the token is unknown.
    pub async fn update_emotion(&self, token: &str, label: &str) -> bool {
        let Some(handle) = self.get(token).await else {
            return false;
        };
        let mut session = handle.lock().await;
        session.last_emotion = label.into();
        session.touch();
        true
    }

    /// Drops sessions idle for longer than `max_idle` and returns how many
    /// were removed. Sessions with a request in flight are kept.
    pub async fn purge_idle(&self, max_idle: TimeDelta) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.last_active >= cutoff,
            Err(_) => true,
        });
        let purged = before - sessions.len();
        if purged > 0 {
            info!(purged, remaining = sessions.len(), "Purged idle sessions");
        }
        purged
    }
}
