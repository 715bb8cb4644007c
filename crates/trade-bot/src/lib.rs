//! Simulated crypto order bot
//!
//! A conversational front-end that walks a user through placing a simulated
//! cryptocurrency order: pick an exchange, pick a symbol, see its live price,
//! then supply quantity and limit price. No real orders are placed; symbol
//! lists and prices come from each venue's public REST API.
//!
//! # Architecture
//!
//! Two strictly layered components:
//!
//! - [`api`]: the exchange gateway. [`ExchangeGateway`] answers symbol-list
//!   and last-price lookups for Binance, Bybit, OKX and Deribit, degrading
//!   every upstream failure to a sentinel (empty set / `"Unavailable"`) so a
//!   flaky venue can never crash a turn.
//! - [`bot`]: the conversation engine. [`ConversationEngine::handle_turn`]
//!   takes one line of text plus a session and produces the reply;
//!   [`OrderBot`] adds keyed session storage for transports.
//!
//! Transports are thin and replaceable: the shipped binary offers a stdin
//! REPL and a WebSocket server ([`server`]), both of which only ever call
//! [`OrderBot::handle_message`].
//!
//! # Example
//!
//! ```rust,ignore
//! use trade_bot::{BotConfig, OrderBot};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut bot = OrderBot::new(BotConfig::default())?;
//!     println!("{}", bot.welcome());
//!     let reply = bot.handle_message("local", "binance").await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bot;
pub mod config;
pub mod error;
pub mod server;

// Re-export main types for convenience
pub use api::{Exchange, ExchangeGateway, GatewayObserver, MarketData, PRICE_UNAVAILABLE};
pub use bot::{ConversationEngine, OrderBot, OrderSession, SessionManager};
pub use config::BotConfig;
pub use error::{BotError, Result};
