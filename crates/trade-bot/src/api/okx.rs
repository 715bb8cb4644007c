//! OKX v5 spot market endpoints

use crate::error::{BotError, Result};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;

const INSTRUMENTS_URL: &str = "https://www.okx.com/api/v5/public/instruments";
const TICKER_URL: &str = "https://www.okx.com/api/v5/market/ticker";

/// OKX public market-data client
#[derive(Debug, Clone)]
pub struct OkxClient {
    client: Client,
}

impl OkxClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// All spot instrument ids from the public instruments endpoint
    pub async fn symbols(&self) -> Result<HashSet<String>> {
        let response = self
            .client
            .get(INSTRUMENTS_URL)
            .query(&[("instType", "SPOT")])
            .send()
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;
        parse_symbols(&body)
    }

    /// Last traded price for an instrument id
    pub async fn last_price(&self, symbol: &str) -> Result<String> {
        let response = self
            .client
            .get(TICKER_URL)
            .query(&[("instId", symbol)])
            .send()
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;
        parse_price(&body)
    }
}

fn parse_symbols(body: &Value) -> Result<HashSet<String>> {
    let entries = body
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| BotError::exchange("Okx", "missing data array"))?;

    Ok(entries
        .iter()
        .filter_map(|entry| entry.get("instId").and_then(Value::as_str))
        .map(str::to_owned)
        .collect())
}

fn parse_price(body: &Value) -> Result<String> {
    body.pointer("/data/0/last")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| BotError::exchange("Okx", "missing last field"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_symbols() {
        let body = json!({
            "code": "0",
            "data": [
                {"instId": "BTC-USDT", "instType": "SPOT"},
                {"instId": "ETH-USDT", "instType": "SPOT"}
            ]
        });

        let symbols = parse_symbols(&body).unwrap();
        assert!(symbols.contains("BTC-USDT"));
        assert!(symbols.contains("ETH-USDT"));
    }

    #[test]
    fn test_parse_symbols_missing_data() {
        let body = json!({"code": "50011", "msg": "rate limit"});
        assert!(parse_symbols(&body).is_err());
    }

    #[test]
    fn test_parse_price() {
        let body = json!({
            "code": "0",
            "data": [{"instId": "BTC-USDT", "last": "27000.5"}]
        });
        assert_eq!(parse_price(&body).unwrap(), "27000.5");
    }

    #[test]
    fn test_parse_price_empty_data() {
        let body = json!({"code": "0", "data": []});
        assert!(parse_price(&body).is_err());
    }
}
