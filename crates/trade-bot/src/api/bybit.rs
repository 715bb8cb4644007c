//! Bybit v5 spot market endpoints

use crate::error::{BotError, Result};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;

const INSTRUMENTS_URL: &str = "https://api.bybit.com/v5/market/instruments-info";
const TICKERS_URL: &str = "https://api.bybit.com/v5/market/tickers";

/// Bybit public market-data client
#[derive(Debug, Clone)]
pub struct BybitClient {
    client: Client,
}

impl BybitClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// All spot instruments from the instruments-info endpoint
    pub async fn symbols(&self) -> Result<HashSet<String>> {
        let response = self
            .client
            .get(INSTRUMENTS_URL)
            .query(&[("category", "spot")])
            .send()
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;
        parse_symbols(&body)
    }

    /// Last traded price for a spot symbol
    pub async fn last_price(&self, symbol: &str) -> Result<String> {
        let response = self
            .client
            .get(TICKERS_URL)
            .query(&[("category", "spot"), ("symbol", symbol)])
            .send()
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;
        parse_price(&body)
    }
}

fn parse_symbols(body: &Value) -> Result<HashSet<String>> {
    let entries = body
        .pointer("/result/list")
        .and_then(Value::as_array)
        .ok_or_else(|| BotError::exchange("Bybit", "missing result.list array"))?;

    Ok(entries
        .iter()
        .filter_map(|entry| entry.get("symbol").and_then(Value::as_str))
        .map(str::to_owned)
        .collect())
}

fn parse_price(body: &Value) -> Result<String> {
    body.pointer("/result/list/0/lastPrice")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| BotError::exchange("Bybit", "missing lastPrice field"))
}
