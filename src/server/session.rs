//! Cookie-backed session handles.
//!
//! The session store is an in-memory map from session ID to a shared
//! key/value bag, bounded by an idle TTL and a session cap. A [`Session`] is
//! a cheap `Arc` handle, so the background sub-request sees, and can mutate,
//! the very same data as the outer request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

use crate::config::SessionConfig;

/// Shared handle to one visitor's session data.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    data: Arc<DashMap<String, Value>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            data: Arc::new(DashMap::new()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.data.get(key).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.data.insert(key.into(), value)
    }

    /// True if both handles point at the same underlying data.
    pub fn shares_data_with(&self, other: &Session) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

struct StoredSession {
    session: Session,
    last_seen: Instant,
}

/// In-memory session store keyed by the session cookie.
///
/// Sessions idle for longer than the TTL are dropped on lookup and swept
/// whenever a new session is created. At capacity, the least recently seen
/// session is evicted.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, StoredSession>>,
    cookie_name: Arc<str>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(cookie_name: impl Into<Arc<str>>, ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            cookie_name: cookie_name.into(),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(
            config.cookie_name.as_str(),
            Duration::from_secs(config.ttl_secs),
            config.max_sessions,
        )
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Number of stored sessions, expired ones included until swept.
    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Look up the session named by the request cookie, or start a new one.
    ///
    /// The boolean is true when the session was created by this call.
    pub fn load_or_create(&self, headers: &HeaderMap) -> (Session, bool) {
        if let Some(id) = self.cookie_session_id(headers) {
            if let Some(session) = self.touch(id) {
                return (session, false);
            }
            tracing::debug!(session_id = %id, "Unknown or expired session cookie, starting a new session");
        }

        self.make_room();
        let session = Session::new();
        self.sessions.insert(
            session.id(),
            StoredSession {
                session: session.clone(),
                last_seen: Instant::now(),
            },
        );
        (session, true)
    }

    fn touch(&self, id: Uuid) -> Option<Session> {
        {
            let mut stored = self.sessions.get_mut(&id)?;
            if stored.last_seen.elapsed() < self.ttl {
                stored.last_seen = Instant::now();
                return Some(stored.session.clone());
            }
        }
        self.sessions.remove(&id);
        None
    }

    fn make_room(&self) {
        let ttl = self.ttl;
        self.sessions.retain(|_, stored| stored.last_seen.elapsed() < ttl);

        while self.sessions.len() >= self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.value().last_seen)
                .map(|entry| *entry.key());
            match oldest {
                Some(id) => {
                    self.sessions.remove(&id);
                    tracing::debug!(session_id = %id, "Session store full, evicted oldest session");
                }
                None => break,
            }
        }
    }

    fn cookie_session_id(&self, headers: &HeaderMap) -> Option<Uuid> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == &*self.cookie_name)
            .and_then(|(_, value)| value.trim().parse().ok())
    }

    fn set_cookie_value(&self, session: &Session) -> Option<HeaderValue> {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            self.cookie_name,
            session.id()
        );
        HeaderValue::from_str(&cookie).ok()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("cookie_name", &self.cookie_name)
            .field("sessions", &self.sessions.len())
            .field("ttl", &self.ttl)
            .field("max_sessions", &self.max_sessions)
            .finish()
    }
}

/// Attach a [`Session`] to every request.
///
/// A request that already carries one (a modal sub-request) keeps it; this is
/// how the outer caller's session reaches the background page.
pub async fn session_middleware(
    State(store): State<SessionStore>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if request.extensions().get::<Session>().is_some() {
        return next.run(request).await;
    }

    let (session, created) = store.load_or_create(request.headers());
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if created {
        if let Some(cookie) = store.set_cookie_value(&session) {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
    }
    response
}
