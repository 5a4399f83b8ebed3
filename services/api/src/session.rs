//! In-memory login sessions
//!
//! A session is an opaque random token mapped to a user id. The token travels
//! in the `sid` cookie; expired entries are ignored on lookup and swept by a
//! background task.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::{sync::RwLock, task::JoinHandle};
use tracing::info;
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "sid";

/// Longest lifetime a session may be given (ten years)
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    user_id: i32,
    /// `None` when the deadline is past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl SessionEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// Session manager
#[derive(Debug, Clone)]
pub struct SessionManager {
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl SessionManager {
    /// Create a new session manager whose sessions live for `ttl`, capped at
    /// [`MAX_SESSION_TTL`]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: ttl.min(MAX_SESSION_TTL),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Session lifetime, also used as the cookie max-age
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a session for a user and return its token
    pub async fn create_session(&self, user_id: i32) -> String {
        info!("Creating session for user: {}", user_id);

        let token = Uuid::new_v4().simple().to_string();
        let entry = SessionEntry {
            user_id,
            expires_at: Instant::now().checked_add(self.ttl),
        };
        self.sessions.write().await.insert(token.clone(), entry);

        token
    }

    /// User id behind a live session
    pub async fn resolve(&self, token: &str) -> Option<i32> {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.user_id)
    }

    /// Drop a session. Unknown tokens are ignored.
    pub async fn destroy(&self, token: &str) {
        if let Some(entry) = self.sessions.write().await.remove(token) {
            info!("Deleting session for user: {}", entry.user_id);
        }
    }

    /// Remove expired sessions and return how many were dropped
    pub async fn prune_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.is_live(now));
        before - sessions.len()
    }

    /// Sweep expired sessions every `period` (at least one second)
    pub fn spawn_pruner(&self, period: Duration) -> JoinHandle<()> {
        let manager = self.clone();
        let period = period.max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // First tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let pruned = manager.prune_expired().await;
                if pruned > 0 {
                    info!("Pruned {} expired sessions", pruned);
                }
            }
        })
    }
}
