//! Per-browser sessions.
//!
//! A [`Session`] holds the signed-in username and a one-shot flash message.
//! Sessions live server-side in a [`SessionStore`] keyed by a random id that
//! the HTTP layer hands to the browser in a cookie. Entries expire after a
//! fixed TTL measured from their last save.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

/// State carried between requests from the same browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// The signed-in username, if any.
    pub username: Option<String>,
    /// Message to show on the next rendered page.
    pub flash: Option<String>,
}

impl Session {
    /// A session already signed in as `username`.
    #[must_use]
    pub fn signed_in(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            flash: None,
        }
    }

    /// Remove and return the flash message.
    pub fn take_flash(&mut self) -> Option<String> {
        self.flash.take()
    }

    /// Whether there is nothing worth keeping between requests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.flash.is_none()
    }
}

/// Longest accepted session lifetime: ten years.
pub const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Session lifetime for `secs`, clamped to [`MAX_TTL_SECS`].
#[must_use]
pub fn ttl_from_secs(secs: u64) -> Duration {
    let secs = i64::try_from(secs.min(MAX_TTL_SECS)).unwrap_or(0);
    Duration::try_seconds(secs).unwrap_or_else(Duration::zero)
}

#[derive(Debug)]
struct SessionEntry {
    session: Session,
    expires_at: DateTime<Utc>,
}

/// In-memory session table with expiry.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create an empty store whose entries live for `ttl` after each save.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Session lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store `session` under a fresh random id and return the id.
    pub async fn create(&self, session: Session) -> String {
        let id = uuid::Uuid::new_v4().as_simple().to_string();
        self.save(&id, session).await;
        id
    }

    /// Fetch a live session by id. Expired entries are treated as absent.
    pub async fn load(&self, id: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .get(id)
            .filter(|entry| entry.expires_at > Utc::now())
            .map(|entry| entry.session.clone())
    }

    /// Insert or replace the session under `id`, renewing its expiry.
    pub async fn save(&self, id: &str, session: Session) {
        let entry = SessionEntry {
            session,
            expires_at: Utc::now()
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.sessions.write().await.insert(id.to_owned(), entry);
    }

    /// Drop the session under `id`.
    pub async fn remove(&self, id: &str) {
        self.sessions.write().await.remove(id);
    }

    /// Drop every expired entry and return how many were removed.
    pub async fn prune_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(sessions.len())
    }

    /// Number of stored entries, including expired ones not yet pruned.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
