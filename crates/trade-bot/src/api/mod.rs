//! Exchange gateway: public market-data endpoints for the supported venues
//!
//! Each venue module owns its endpoint URLs and response extraction. The
//! [`ExchangeGateway`] dispatches on [`Exchange`] so callers never branch on
//! the venue themselves.

pub mod binance;
pub mod bybit;
pub mod deribit;
pub mod gateway;
pub mod okx;

pub use gateway::ExchangeGateway;

use crate::error::{BotError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

#[cfg(test)]
use mockall::automock;

/// Sentinel price returned when a ticker lookup fails
pub const PRICE_UNAVAILABLE: &str = "Unavailable";

/// Supported trading venues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    Binance,
    Bybit,
    Okx,
    Deribit,
}

impl Exchange {
    /// All supported venues
    pub const ALL: [Exchange; 4] = [
        Exchange::Binance,
        Exchange::Bybit,
        Exchange::Okx,
        Exchange::Deribit,
    ];

    /// Canonical capitalized venue name
    pub fn name(self) -> &'static str {
        match self {
            Exchange::Binance => "Binance",
            Exchange::Bybit => "Bybit",
            Exchange::Okx => "Okx",
            Exchange::Deribit => "Deribit",
        }
    }

    /// Parse a venue from free-text user input, case-insensitively.
    ///
    /// Anything that is not one of the four canonical names is rejected.
    pub fn from_input(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|venue| venue.name().eq_ignore_ascii_case(input))
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Market-data lookups the conversation engine depends on.
///
/// Both operations are expected to complete quickly or fail outright; the
/// production implementation never returns `Err` (failures degrade to an
/// empty set or [`PRICE_UNAVAILABLE`]), but the engine also tolerates
/// `Err` from other implementations and degrades it the same way.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Tradable symbols currently listed on the venue
    async fn list_symbols(&self, exchange: Exchange) -> Result<HashSet<String>>;

    /// Last traded price for a symbol, as the venue reports it
    async fn last_price(&self, exchange: Exchange, symbol: &str) -> Result<String>;
}

/// Hook the gateway reports upstream failures to.
///
/// Injected by the caller so operators can route degraded fetches wherever
/// they need; the default implementation logs through `tracing`.
pub trait GatewayObserver: Send + Sync {
    fn fetch_failed(&self, exchange: Exchange, operation: &str, error: &BotError);
}

/// Default observer: structured warning per degraded fetch
#[derive(Debug, Default)]
pub struct TracingObserver;

impl GatewayObserver for TracingObserver {
    fn fetch_failed(&self, exchange: Exchange, operation: &str, error: &BotError) {
        warn!(venue = %exchange, operation, %error, "exchange fetch failed");
    }
}
