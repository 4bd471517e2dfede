//! Per-browser state for the form: last description, chosen language and the
//! last generated PNG. Created when there is something to remember,
//! overwritten on each submit, dropped once idle for `idle_timeout`.

use crate::i18n::Language;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(SessionId)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub last_description: String,
    pub language: Language,
    pub last_png: Option<Arc<Vec<u8>>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            last_description: String::new(),
            language: Language::default(),
            last_png: None,
            created_at: now,
            updated_at: now,
        }
    }
}

pub const DEFAULT_IDLE_TIMEOUT_MINUTES: i64 = 30;

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout: Duration::minutes(DEFAULT_IDLE_TIMEOUT_MINUTES),
        }
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Starts a session, first dropping any that have been idle too long.
    pub fn create(&self) -> SessionId {
        self.prune_idle(Utc::now());
        let id = SessionId::new();
        self.write().insert(id, Session::default());
        log::debug!("Session {} created", id);
        id
    }

    /// Returns `id` if it is live, otherwise a freshly created session.
    pub fn resume_or_create(&self, id: Option<SessionId>) -> SessionId {
        if let Some(id) = id {
            if self.contains(id) {
                return id;
            }
        }
        self.create()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.read().contains_key(&id)
    }

    pub fn get(&self, id: SessionId) -> Option<Session> {
        self.read().get(&id).cloned()
    }

    pub fn update_description(&self, id: SessionId, description: &str) {
        self.update(id, |session| session.last_description = description.to_string());
    }

    pub fn set_language(&self, id: SessionId, language: Language) {
        self.update(id, |session| session.language = language);
    }

    pub fn store_image(&self, id: SessionId, png: Vec<u8>) {
        self.update(id, |session| session.last_png = Some(Arc::new(png)));
    }

    pub fn clear_image(&self, id: SessionId) {
        self.update(id, |session| session.last_png = None);
    }

    pub fn last_image(&self, id: SessionId) -> Option<Arc<Vec<u8>>> {
        self.read().get(&id).and_then(|session| session.last_png.clone())
    }

    pub fn end(&self, id: SessionId) -> bool {
        let removed = self.write().remove(&id).is_some();
        if removed {
            log::debug!("Session {} ended", id);
        }
        removed
    }

    /// Removes sessions untouched since `now - idle_timeout`.
    pub fn prune_idle(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.idle_timeout;
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, session| session.updated_at >= cutoff);
        let pruned = before - sessions.len();
        if pruned > 0 {
            log::debug!("Pruned {} idle sessions", pruned);
        }
        pruned
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn update(&self, id: SessionId, apply: impl FnOnce(&mut Session)) {
        let mut sessions = self.write();
        let session = sessions.entry(id).or_insert_with(Session::default);
        apply(session);
        session.updated_at = Utc::now();
    }

    // A panic while holding the lock leaves plain data behind; keep serving it.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}
