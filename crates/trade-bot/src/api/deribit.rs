//! Deribit v2 public endpoints
//!
//! Deribit reports `last_price` as a JSON number rather than a string; it is
//! rendered as its decimal string so all venues expose the same price shape.

use crate::error::{BotError, Result};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;

const INSTRUMENTS_URL: &str = "https://www.deribit.com/api/v2/public/get_instruments";
const TICKER_URL: &str = "https://www.deribit.com/api/v2/public/ticker";

/// Deribit public market-data client
#[derive(Debug, Clone)]
pub struct DeribitClient {
    client: Client,
}

impl DeribitClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// BTC spot instrument names from the public instruments endpoint
    pub async fn symbols(&self) -> Result<HashSet<String>> {
        let response = self
            .client
            .get(INSTRUMENTS_URL)
            .query(&[("currency", "BTC"), ("kind", "spot")])
            .send()
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;
        parse_symbols(&body)
    }

    /// Last traded price for an instrument
    pub async fn last_price(&self, symbol: &str) -> Result<String> {
        let response = self
            .client
            .get(TICKER_URL)
            .query(&[("instrument_name", symbol)])
            .send()
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;
        parse_price(&body)
    }
}

fn parse_symbols(body: &Value) -> Result<HashSet<String>> {
    let entries = body
        .get("result")
        .and_then(Value::as_array)
        .ok_or_else(|| BotError::exchange("Deribit", "missing result array"))?;

    Ok(entries
        .iter()
        .filter_map(|entry| entry.get("instrument_name").and_then(Value::as_str))
        .map(str::to_owned)
        .collect())
}

fn parse_price(body: &Value) -> Result<String> {
    match body.pointer("/result/last_price") {
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(BotError::exchange("Deribit", "missing last_price field")),
    }
}
