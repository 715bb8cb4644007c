//! Order Bot
//!
//! The conversational front-end: a [`ConversationEngine`] over a market-data
//! gateway plus keyed session storage. Transports hand a session id and one
//! line of text to [`OrderBot::handle_message`] and send the reply back over
//! whatever wire they own.

pub mod conversation;
pub mod session;

pub use conversation::ConversationEngine;
pub use session::{InMemoryStorage, OrderSession, SessionManager, SessionStorage};

use crate::api::{ExchangeGateway, MarketData};
use crate::config::BotConfig;
use crate::error::Result;
use std::sync::Arc;

/// The order bot: conversation engine plus keyed sessions.
///
/// Shared-access: turns take `&self` and no lock is held across a turn's
/// outbound calls, so turns for different session ids run concurrently.
/// Callers must still serialize calls for one session id (one task per
/// connection), because each turn reads and writes that session record.
pub struct OrderBot {
    engine: ConversationEngine,
    sessions: SessionManager,
    config: BotConfig,
}

impl OrderBot {
    /// Create a bot backed by the live exchange gateway
    pub fn new(config: BotConfig) -> Result<Self> {
        let gateway = Arc::new(ExchangeGateway::new(&config)?);
        Ok(Self::with_gateway(gateway, config))
    }

    /// Create a bot over any market-data source (stubs in tests)
    pub fn with_gateway(gateway: Arc<dyn MarketData>, config: BotConfig) -> Self {
        let sessions = SessionManager::new(config.session_ttl_secs);
        Self {
            engine: ConversationEngine::new(gateway),
            sessions,
            config,
        }
    }

    /// Run one turn for the given conversation id.
    ///
    /// The session record is cloned out of storage before the turn and
    /// written back after it, so no storage lock spans the gateway calls.
    pub async fn handle_message(&self, session_id: &str, input: &str) -> Result<String> {
        let mut session = self.sessions.get_or_create(session_id)?;
        let reply = self.engine.handle_turn(input, &mut session).await;
        self.sessions.update(session_id, session)?;
        Ok(reply)
    }

    /// Drop the session for a finished conversation
    pub fn end_session(&self, session_id: &str) -> bool {
        self.sessions.delete(session_id)
    }

    /// Number of live sessions
    pub fn active_sessions(&self) -> usize {
        self.sessions.active_count()
    }

    /// Welcome message sent when a conversation opens
    pub fn welcome(&self) -> &str {
        &self.config.welcome_message
    }

    /// REPL prompt prefix
    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }
}
