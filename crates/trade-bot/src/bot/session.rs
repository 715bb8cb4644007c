//! Session state and keyed session storage
//!
//! One [`OrderSession`] exists per conversation id. The caller owns the
//! mapping from id to session and must serialize turns within one id; the
//! storage itself makes no ordering guarantees between concurrent turns on
//! the same session.

use crate::api::Exchange;
use crate::error::{BotError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// State collected over one order conversation.
///
/// Fields fill strictly in order: exchange, then symbol (price fetched
/// alongside it), then quantity (which also overwrites price with the
/// user-declared value). Once quantity is set the session is terminal until
/// reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSession {
    pub exchange: Option<Exchange>,
    pub symbol: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Default for OrderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            exchange: None,
            symbol: None,
            price: None,
            quantity: None,
            created_at: now,
            last_active: now,
        }
    }

    /// Clear all collected fields back to unset, keeping the session alive
    pub fn reset(&mut self) {
        self.exchange = None;
        self.symbol = None;
        self.price = None;
        self.quantity = None;
        self.update_activity();
    }

    /// Whether the order is complete (terminal state)
    pub fn is_complete(&self) -> bool {
        self.quantity.is_some()
    }

    pub fn update_activity(&mut self) {
        self.last_active = Utc::now();
    }

    pub fn is_expired(&self, max_age_seconds: i64) -> bool {
        let max_age = chrono::Duration::seconds(max_age_seconds);
        Utc::now() - self.last_active > max_age
    }
}

/// Storage backend for keyed sessions.
///
/// Shared-access: implementations carry their own interior locking so
/// concurrent turns on *different* session ids never contend on a storage
/// borrow.
pub trait SessionStorage: Send + Sync {
    fn get(&self, session_id: &str) -> Option<OrderSession>;
    fn set(&self, session_id: &str, session: OrderSession) -> Result<()>;
    fn delete(&self, session_id: &str) -> bool;
    fn cleanup_expired(&self, max_age_seconds: i64) -> usize;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory session storage
pub struct InMemoryStorage {
    sessions: Arc<RwLock<HashMap<String, OrderSession>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStorage for InMemoryStorage {
    fn get(&self, session_id: &str) -> Option<OrderSession> {
        self.sessions.read().ok()?.get(session_id).cloned()
    }

    fn set(&self, session_id: &str, session: OrderSession) -> Result<()> {
        self.sessions
            .write()
            .map_err(|e| BotError::Session(format!("lock error: {e}")))?
            .insert(session_id.to_string(), session);
        Ok(())
    }

    fn delete(&self, session_id: &str) -> bool {
        self.sessions
            .write()
            .ok()
            .and_then(|mut sessions| sessions.remove(session_id))
            .is_some()
    }

    fn cleanup_expired(&self, max_age_seconds: i64) -> usize {
        let mut sessions = match self.sessions.write() {
            Ok(s) => s,
            Err(_) => return 0,
        };

        let initial_count = sessions.len();
        sessions.retain(|_, session| !session.is_expired(max_age_seconds));
        initial_count - sessions.len()
    }

    fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }
}

/// Manager mapping conversation ids to sessions
pub struct SessionManager {
    storage: Box<dyn SessionStorage>,
    session_ttl: i64,
}

impl SessionManager {
    pub fn new(session_ttl: i64) -> Self {
        Self {
            storage: Box::new(InMemoryStorage::new()),
            session_ttl,
        }
    }

    pub fn with_storage(storage: Box<dyn SessionStorage>, session_ttl: i64) -> Self {
        Self {
            storage,
            session_ttl,
        }
    }

    /// Fetch the session for an id, creating a fresh one if absent or expired
    pub fn get_or_create(&self, session_id: &str) -> Result<OrderSession> {
        if let Some(session) = self.storage.get(session_id) {
            if !session.is_expired(self.session_ttl) {
                return Ok(session);
            }
        }

        let session = OrderSession::new();
        self.storage.set(session_id, session.clone())?;
        Ok(session)
    }

    pub fn update(&self, session_id: &str, mut session: OrderSession) -> Result<()> {
        session.update_activity();
        self.storage.set(session_id, session)
    }

    pub fn delete(&self, session_id: &str) -> bool {
        self.storage.delete(session_id)
    }

    pub fn cleanup_expired(&self) -> usize {
        self.storage.cleanup_expired(self.session_ttl)
    }

    pub fn active_count(&self) -> usize {
        self.storage.len()
    }
}
