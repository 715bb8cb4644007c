//! The conversation state machine
//!
//! A linear sequence of required inputs keyed off the first unset session
//! field: exchange, then symbol (with the reference price fetched alongside
//! it), then `<qty> at <price>`, then a terminal state. `reset` fires in any
//! state and short-circuits everything else for that turn.
//!
//! Validation failures and upstream fetch failures never surface as errors;
//! every turn produces a reply string and leaves the session in a state the
//! user can retry from.

use crate::api::{Exchange, MarketData, PRICE_UNAVAILABLE};
use crate::bot::session::OrderSession;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::debug;

/// Order input: `<number> at <number>`, anchored at the start, whitespace
/// required around the literal word "at". Matched against lowercased input.
static ORDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)\s+at\s+(\d+(?:\.\d+)?)").expect("order pattern is valid")
});

const REPLY_RESET: &str =
    "Conversation reset. Please select an exchange: OKX, Bybit, Deribit, or Binance.";
const REPLY_INVALID_EXCHANGE: &str =
    "Invalid exchange. Please choose from OKX, Bybit, Deribit, or Binance.";
const REPLY_SYMBOLS_FAILED: &str = "Failed to fetch symbols. Please try again later.";
const REPLY_ORDER_FORMAT: &str = "Please format your order like '1.5 at 27000'";
const REPLY_COMPLETED: &str = "Conversation completed. Say 'reset' to start a new one.";

/// The conversation engine: one turn in, one reply out.
///
/// Transport-agnostic; callers must serialize turns for one session because
/// each turn both reads and mutates it.
pub struct ConversationEngine {
    gateway: Arc<dyn MarketData>,
}

impl ConversationEngine {
    pub fn new(gateway: Arc<dyn MarketData>) -> Self {
        Self { gateway }
    }

    /// Process one inbound line against a session and produce the reply.
    ///
    /// Makes 0-2 gateway calls depending on the current step. Gateway
    /// failures degrade to guidance replies or the price sentinel; they never
    /// abort the turn.
    pub async fn handle_turn(&self, input: &str, session: &mut OrderSession) -> String {
        let input = input.trim();

        if input.eq_ignore_ascii_case("reset") {
            session.reset();
            return REPLY_RESET.to_string();
        }

        let Some(exchange) = session.exchange else {
            return match Exchange::from_input(input) {
                Some(exchange) => {
                    session.exchange = Some(exchange);
                    debug!(venue = %exchange, "exchange selected");
                    format!(
                        "Great! Which symbol would you like to trade on {exchange}? (e.g., BTCUSDT)"
                    )
                }
                None => REPLY_INVALID_EXCHANGE.to_string(),
            };
        };

        if session.symbol.is_none() {
            return self.handle_symbol_turn(input, exchange, session).await;
        }

        if session.quantity.is_none() {
            return Self::handle_order_turn(input, exchange, session);
        }

        REPLY_COMPLETED.to_string()
    }

    async fn handle_symbol_turn(
        &self,
        input: &str,
        exchange: Exchange,
        session: &mut OrderSession,
    ) -> String {
        let symbol = input.to_uppercase();

        let symbols = match self.gateway.list_symbols(exchange).await {
            Ok(symbols) => symbols,
            Err(error) => {
                debug!(venue = %exchange, %error, "symbol catalog unavailable");
                return REPLY_SYMBOLS_FAILED.to_string();
            }
        };

        // Empty catalog (including a degraded fetch) rejects every symbol.
        if !symbols.contains(&symbol) {
            return format!("Symbol '{symbol}' not found on {exchange}. Please try another.");
        }

        let price = self
            .gateway
            .last_price(exchange, &symbol)
            .await
            .unwrap_or_else(|_| PRICE_UNAVAILABLE.to_string());

        session.symbol = Some(symbol.clone());
        session.price = Some(price.clone());

        format!(
            "The current price of {symbol} is {price}. \
             Please provide quantity and your desired price like '1.5 at 27000'."
        )
    }

    fn handle_order_turn(input: &str, exchange: Exchange, session: &mut OrderSession) -> String {
        let normalized = input.to_lowercase();

        let Some(caps) = ORDER_PATTERN.captures(&normalized) else {
            return REPLY_ORDER_FORMAT.to_string();
        };

        let quantity = caps[1].to_string();
        let price = caps[2].to_string();
        let symbol = session.symbol.as_deref().unwrap_or_default().to_string();

        session.quantity = Some(quantity.clone());
        // The declared limit price replaces the fetched reference price.
        session.price = Some(price.clone());

        format!(
            "Confirming order: {quantity} of {symbol} at {price} on {exchange}. \
             Say 'reset' to start over."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketData;
    use crate::error::BotError;
    use std::collections::HashSet;

    fn engine(mock: MockMarketData) -> ConversationEngine {
        ConversationEngine::new(Arc::new(mock))
    }

    fn catalog(symbols: &[&str]) -> HashSet<String> {
        symbols.iter().map(|s| (*s).to_string()).collect()
    }

    fn session_at_symbol_step() -> OrderSession {
        let mut session = OrderSession::new();
        session.exchange = Some(Exchange::Binance);
        session
    }

    fn session_at_order_step() -> OrderSession {
        let mut session = session_at_symbol_step();
        session.symbol = Some("BTCUSDT".to_string());
        session.price = Some("27000.5".to_string());
        session
    }

    fn completed_session() -> OrderSession {
        let mut session = session_at_order_step();
        session.quantity = Some("1.5".to_string());
        session
    }

    #[tokio::test]
    async fn test_reset_from_any_state_any_casing() {
        let engine = engine(MockMarketData::new());

        let states: [fn() -> OrderSession; 4] = [
            OrderSession::new,
            session_at_symbol_step,
            session_at_order_step,
            completed_session,
        ];
        for make_session in states {
            for input in ["reset", "RESET", "Reset", "  reset  "] {
                let mut session = make_session();

                let reply = engine.handle_turn(input, &mut session).await;
                assert!(reply.starts_with("Conversation reset."), "reply: {reply}");
                assert!(session.exchange.is_none());
                assert!(session.symbol.is_none());
                assert!(session.price.is_none());
                assert!(session.quantity.is_none());
            }
        }
    }

    #[tokio::test]
    async fn test_exchange_selection_case_insensitive() {
        let engine = engine(MockMarketData::new());

        for (input, expected) in [
            ("binance", Exchange::Binance),
            ("BYBIT", Exchange::Bybit),
            ("Okx", Exchange::Okx),
            ("deribit", Exchange::Deribit),
        ] {
            let mut session = OrderSession::new();
            let reply = engine.handle_turn(input, &mut session).await;
            assert_eq!(session.exchange, Some(expected));
            assert!(reply.contains(expected.name()), "reply: {reply}");
        }
    }

    #[tokio::test]
    async fn test_unknown_exchange_leaves_session_unchanged() {
        let engine = engine(MockMarketData::new());

        for input in ["kraken", "", "binance!", "coinbase"] {
            let mut session = OrderSession::new();
            let reply = engine.handle_turn(input, &mut session).await;
            assert_eq!(reply, REPLY_INVALID_EXCHANGE);
            assert!(session.exchange.is_none());
        }
    }

    #[tokio::test]
    async fn test_symbol_accepted_and_uppercased() {
        let mut mock = MockMarketData::new();
        mock.expect_list_symbols()
            .returning(|_| Ok(catalog(&["BTCUSDT", "ETHUSDT"])));
        mock.expect_last_price()
            .returning(|_, _| Ok("27000.5".to_string()));
        let engine = engine(mock);

        let mut session = session_at_symbol_step();
        let reply = engine.handle_turn("btcusdt", &mut session).await;

        assert_eq!(session.symbol.as_deref(), Some("BTCUSDT"));
        assert_eq!(session.price.as_deref(), Some("27000.5"));
        assert!(reply.contains("27000.5"), "reply: {reply}");
    }

    #[tokio::test]
    async fn test_unknown_symbol_rejected_naming_symbol_and_venue() {
        let mut mock = MockMarketData::new();
        mock.expect_list_symbols()
            .returning(|_| Ok(catalog(&["BTCUSDT", "ETHUSDT"])));
        let engine = engine(mock);

        let mut session = session_at_symbol_step();
        let reply = engine.handle_turn("DOGEUSDT", &mut session).await;

        assert!(reply.contains("DOGEUSDT"), "reply: {reply}");
        assert!(reply.contains("Binance"), "reply: {reply}");
        assert!(session.symbol.is_none());
        assert!(session.price.is_none());
    }

    #[tokio::test]
    async fn test_empty_catalog_rejects_every_symbol() {
        let mut mock = MockMarketData::new();
        mock.expect_list_symbols().returning(|_| Ok(HashSet::new()));
        let engine = engine(mock);

        let mut session = session_at_symbol_step();
        let reply = engine.handle_turn("btcusdt", &mut session).await;

        assert!(reply.contains("BTCUSDT"));
        assert!(session.symbol.is_none());
    }

    #[tokio::test]
    async fn test_catalog_fetch_error_yields_retry_reply() {
        let mut mock = MockMarketData::new();
        mock.expect_list_symbols()
            .returning(|_| Err(BotError::Other("boom".to_string())));
        let engine = engine(mock);

        let mut session = session_at_symbol_step();
        let reply = engine.handle_turn("btcusdt", &mut session).await;

        assert_eq!(reply, REPLY_SYMBOLS_FAILED);
        assert!(session.symbol.is_none());
        assert!(session.price.is_none());
    }

    #[tokio::test]
    async fn test_price_failure_records_unavailable() {
        let mut mock = MockMarketData::new();
        mock.expect_list_symbols()
            .returning(|_| Ok(catalog(&["BTCUSDT"])));
        mock.expect_last_price()
            .returning(|_, _| Err(BotError::Other("timeout".to_string())));
        let engine = engine(mock);

        let mut session = session_at_symbol_step();
        let reply = engine.handle_turn("btcusdt", &mut session).await;

        // The symbol is still accepted; only the price degrades.
        assert_eq!(session.symbol.as_deref(), Some("BTCUSDT"));
        assert_eq!(session.price.as_deref(), Some(PRICE_UNAVAILABLE));
        assert!(reply.contains(PRICE_UNAVAILABLE), "reply: {reply}");
    }

    #[tokio::test]
    async fn test_order_sets_quantity_and_overwrites_price() {
        let engine = engine(MockMarketData::new());

        let mut session = session_at_order_step();
        let reply = engine.handle_turn("1.5 at 27000", &mut session).await;

        assert_eq!(session.quantity.as_deref(), Some("1.5"));
        assert_eq!(session.price.as_deref(), Some("27000"));
        for expected in ["1.5", "BTCUSDT", "27000", "Binance"] {
            assert!(reply.contains(expected), "missing {expected} in: {reply}");
        }
    }

    #[tokio::test]
    async fn test_order_accepts_casing_and_extra_whitespace() {
        let engine = engine(MockMarketData::new());

        let mut session = session_at_order_step();
        let reply = engine.handle_turn("  2 AT   30000.25 ", &mut session).await;

        assert_eq!(session.quantity.as_deref(), Some("2"));
        assert_eq!(session.price.as_deref(), Some("30000.25"));
        assert!(reply.starts_with("Confirming order:"));
    }

    #[tokio::test]
    async fn test_malformed_order_rejected_with_hint() {
        let engine = engine(MockMarketData::new());

        for input in ["1.5at27000", "1.5 for 27000", "one at two", "at 27000"] {
            let mut session = session_at_order_step();
            let reply = engine.handle_turn(input, &mut session).await;

            assert_eq!(reply, REPLY_ORDER_FORMAT, "input: {input}");
            assert!(session.quantity.is_none(), "input: {input}");
            assert_eq!(session.price.as_deref(), Some("27000.5"));
        }
    }

    #[tokio::test]
    async fn test_terminal_state_is_idempotent() {
        let engine = engine(MockMarketData::new());

        let mut session = session_at_order_step();
        session.quantity = Some("1.5".to_string());
        session.price = Some("27000".to_string());
        let before = session.clone();

        for input in ["anything", "2 at 30000", "binance"] {
            let reply = engine.handle_turn(input, &mut session).await;
            assert_eq!(reply, REPLY_COMPLETED);
        }
        assert_eq!(session.exchange, before.exchange);
        assert_eq!(session.symbol, before.symbol);
        assert_eq!(session.price, before.price);
        assert_eq!(session.quantity, before.quantity);
    }

    #[tokio::test]
    async fn test_full_order_flow() {
        let mut mock = MockMarketData::new();
        mock.expect_list_symbols()
            .returning(|_| Ok(catalog(&["BTCUSDT"])));
        mock.expect_last_price()
            .returning(|_, _| Ok("29950".to_string()));
        let engine = engine(mock);

        let mut session = OrderSession::new();

        let reply = engine.handle_turn("binance", &mut session).await;
        assert!(reply.contains("Which symbol"));

        let reply = engine.handle_turn("btcusdt", &mut session).await;
        assert!(reply.contains("29950"));

        let reply = engine.handle_turn("2 at 30000", &mut session).await;
        assert!(reply.contains('2') && reply.contains("30000"));
        assert_eq!(session.quantity.as_deref(), Some("2"));
        assert_eq!(session.price.as_deref(), Some("30000"));

        let reply = engine.handle_turn("anything", &mut session).await;
        assert_eq!(reply, REPLY_COMPLETED);
    }
}
