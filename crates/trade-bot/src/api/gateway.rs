//! Venue dispatch and the sentinel failure policy
//!
//! The gateway is total from the caller's point of view: a venue fetch that
//! fails for any reason (network, non-2xx, malformed body, missing field) is
//! reported to the injected observer and degraded to an empty symbol set or
//! the [`PRICE_UNAVAILABLE`] sentinel. The conversation engine must always be
//! able to produce a reply, so no upstream failure crosses this boundary as
//! an error.

use crate::api::binance::BinanceClient;
use crate::api::bybit::BybitClient;
use crate::api::deribit::DeribitClient;
use crate::api::okx::OkxClient;
use crate::api::{Exchange, GatewayObserver, MarketData, PRICE_UNAVAILABLE, TracingObserver};
use crate::config::BotConfig;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;

/// REST gateway over the four supported venues
pub struct ExchangeGateway {
    binance: BinanceClient,
    bybit: BybitClient,
    okx: OkxClient,
    deribit: DeribitClient,
    observer: Arc<dyn GatewayObserver>,
}

impl ExchangeGateway {
    /// Create a gateway with a request timeout taken from the config
    pub fn new(config: &BotConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(client))
    }

    /// Create a gateway around an existing HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            binance: BinanceClient::new(client.clone()),
            bybit: BybitClient::new(client.clone()),
            okx: OkxClient::new(client.clone()),
            deribit: DeribitClient::new(client),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the failure observer
    pub fn with_observer(mut self, observer: Arc<dyn GatewayObserver>) -> Self {
        self.observer = observer;
        self
    }
}

#[async_trait]
impl MarketData for ExchangeGateway {
    async fn list_symbols(&self, exchange: Exchange) -> Result<HashSet<String>> {
        let fetched = match exchange {
            Exchange::Binance => self.binance.symbols().await,
            Exchange::Bybit => self.bybit.symbols().await,
            Exchange::Okx => self.okx.symbols().await,
            Exchange::Deribit => self.deribit.symbols().await,
        };

        Ok(fetched.unwrap_or_else(|error| {
            self.observer.fetch_failed(exchange, "list_symbols", &error);
            HashSet::new()
        }))
    }

    async fn last_price(&self, exchange: Exchange, symbol: &str) -> Result<String> {
        let fetched = match exchange {
            Exchange::Binance => self.binance.last_price(symbol).await,
            Exchange::Bybit => self.bybit.last_price(symbol).await,
            Exchange::Okx => self.okx.last_price(symbol).await,
            Exchange::Deribit => self.deribit.last_price(symbol).await,
        };

        Ok(fetched.unwrap_or_else(|error| {
            self.observer.fetch_failed(exchange, "last_price", &error);
            PRICE_UNAVAILABLE.to_string()
        }))
    }
}
