//! Binance spot market endpoints

use crate::error::{BotError, Result};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;

const EXCHANGE_INFO_URL: &str = "https://api.binance.com/api/v3/exchangeInfo";
const TICKER_URL: &str = "https://api.binance.com/api/v3/ticker/price";

/// Binance public market-data client
#[derive(Debug, Clone)]
pub struct BinanceClient {
    client: Client,
}

impl BinanceClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// All spot symbols from the exchangeInfo endpoint
    pub async fn symbols(&self) -> Result<HashSet<String>> {
        let response = self
            .client
            .get(EXCHANGE_INFO_URL)
            .send()
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;
        parse_symbols(&body)
    }

    /// Last traded price for a symbol
    pub async fn last_price(&self, symbol: &str) -> Result<String> {
        let response = self
            .client
            .get(TICKER_URL)
            .query(&[("symbol", symbol)])
            .send()
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;
        parse_price(&body)
    }
}

fn parse_symbols(body: &Value) -> Result<HashSet<String>> {
    let entries = body
        .get("symbols")
        .and_then(Value::as_array)
        .ok_or_else(|| BotError::exchange("Binance", "missing symbols array"))?;

    Ok(entries
        .iter()
        .filter_map(|entry| entry.get("symbol").and_then(Value::as_str))
        .map(str::to_owned)
        .collect())
}

fn parse_price(body: &Value) -> Result<String> {
    body.get("price")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| BotError::exchange("Binance", "missing price field"))
}
