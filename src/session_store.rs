/// Refresh-session store: one active refresh session per user.
///
/// The key is the user's stable identifier and the value is the session
/// identifier embedded in the outstanding refresh token. A `put`
/// unconditionally overwrites, which is what invalidates the prior
/// session; entries expire on their own once the refresh token would
/// have expired anyway.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use uuid::Uuid;

use crate::configuration::SessionStoreSettings;
use crate::error::StoreError;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Records `session_id` as the single active refresh session for
    /// `user_id`, replacing any prior one.
    async fn put(
        &self,
        user_id: Uuid,
        session_id: &str,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    /// Returns the active session identifier, or `None` when absent or
    /// expired. Store failures surface as errors, never as `None`.
    async fn get(&self, user_id: Uuid) -> Result<Option<String>, StoreError>;

    /// Removes the active session; idempotent.
    async fn delete(&self, user_id: Uuid) -> Result<(), StoreError>;
}

/// Redis-backed session store. Every call is bounded by the configured
/// timeout and surfaces a distinguishable error instead of hanging.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: redis::aio::ConnectionManager,
    timeout: Duration,
}

impl RedisSessionStore {
    pub async fn connect(settings: &SessionStoreSettings) -> Result<Self, StoreError> {
        let client = redis::Client::open(settings.connection_string())
            .map_err(StoreError::from)?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(StoreError::from)?;
        Ok(Self {
            conn,
            timeout: Duration::from_millis(settings.timeout_ms),
        })
    }

    async fn bounded<T>(
        &self,
        op: &str,
        fut: impl std::future::Future<Output = Result<T, redis::RedisError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(format!("session store {}", op))),
        }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(
        &self,
        user_id: Uuid,
        session_id: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        self.bounded(
            "put",
            redis::cmd("SET")
                .arg(user_id.to_string())
                .arg(session_id)
                .arg("EX")
                .arg(ttl.as_secs().max(1))
                .query_async::<_, ()>(&mut conn),
        )
        .await
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        self.bounded(
            "get",
            redis::cmd("GET")
                .arg(user_id.to_string())
                .query_async::<_, Option<String>>(&mut conn),
        )
        .await
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        self.bounded(
            "delete",
            redis::cmd("DEL")
                .arg(user_id.to_string())
                .query_async::<_, ()>(&mut conn),
        )
        .await
    }
}

/// In-process session store with the same overwrite and TTL semantics.
/// Backs tests and single-node setups without a cache server.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<Uuid, (String, Instant)>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(
        &self,
        user_id: Uuid,
        session_id: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let deadline = Instant::now() + ttl;
        self.entries
            .lock()
            .unwrap()
            .insert(user_id, (session_id.to_string(), deadline));
        Ok(())
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<String>, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        let live = match entries.get(&user_id) {
            Some((session_id, deadline)) if *deadline > Instant::now() => {
                Some(session_id.clone())
            }
            Some(_) => None,
            None => return Ok(None),
        };
        if live.is_none() {
            entries.remove(&user_id);
        }
        Ok(live)
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), StoreError> {
        self.entries.lock().unwrap().remove(&user_id);
        Ok(())
    }
}
