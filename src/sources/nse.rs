use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{RawSnapshot, SnapshotSource, retry};
use crate::chain::schema::{COLUMNS, Field, LegField, RAW_WIDTH, label_rows};

const NSE_BASE_URL: &str = "https://www.nseindia.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// ── NSE API response types ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct OptionChainResponse {
    records: Records,
    filtered: Filtered,
}

#[derive(Debug, Deserialize)]
struct Records {
    #[serde(rename = "underlyingValue")]
    underlying_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Filtered {
    data: Vec<StrikeEntry>,
}

#[derive(Debug, Deserialize)]
struct StrikeEntry {
    #[serde(rename = "strikePrice")]
    strike_price: Option<f64>,
    #[serde(rename = "CE")]
    call: Option<LegEntry>,
    #[serde(rename = "PE")]
    put: Option<LegEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegEntry {
    open_interest: Option<f64>,
    #[serde(rename = "changeinOpenInterest")]
    change_in_oi: Option<f64>,
    total_traded_volume: Option<f64>,
    implied_volatility: Option<f64>,
    last_price: Option<f64>,
    change: Option<f64>,
    bid_qty: Option<f64>,
    #[serde(rename = "bidprice")]
    bid_price: Option<f64>,
    ask_price: Option<f64>,
    ask_qty: Option<f64>,
}

impl LegEntry {
    fn get(&self, field: LegField) -> Option<f64> {
        match field {
            LegField::OpenInterest => self.open_interest,
            LegField::ChangeInOi => self.change_in_oi,
            LegField::Volume => self.total_traded_volume,
            LegField::ImpliedVolatility => self.implied_volatility,
            LegField::Ltp => self.last_price,
            LegField::Change => self.change,
            LegField::BidQty => self.bid_qty,
            LegField::Bid => self.bid_price,
            LegField::Ask => self.ask_price,
            LegField::AskQty => self.ask_qty,
        }
    }
}

// ── Source ──────────────────────────────────────────────────────────

/// Pulls the nearest-expiry chain for an index from the NSE JSON API.
pub struct NseSource {
    client: reqwest::Client,
    symbol: String,
}

impl NseSource {
    pub fn new(symbol: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .context("creating NSE HTTP client")?;
        Ok(NseSource {
            client,
            symbol: symbol.to_uppercase(),
        })
    }

    async fn fetch_chain(&self) -> Result<OptionChainResponse> {
        // The API answers 401 until the session carries the page's cookies.
        self.client
            .get(format!("{NSE_BASE_URL}/option-chain"))
            .send()
            .await
            .context("priming NSE session")?
            .error_for_status()
            .context("NSE option-chain page")?;

        let url = format!("{NSE_BASE_URL}/api/option-chain-indices");
        retry(2, || {
            let request = self.client.get(&url).query(&[("symbol", &self.symbol)]);
            async move {
                let chain = request
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<OptionChainResponse>()
                    .await?;
                Ok(chain)
            }
        })
        .await
        .with_context(|| format!("fetching {} option chain", self.symbol))
    }
}

#[async_trait]
impl SnapshotSource for NseSource {
    fn mode_label(&self) -> &str {
        "NSE API"
    }

    async fn fetch(&mut self) -> Result<RawSnapshot> {
        let chain = self.fetch_chain().await?;
        Ok(to_snapshot(&chain))
    }
}

/// Lay the API response out as the page table: two label rows, then one row
/// per strike in [`COLUMNS`] order. Missing values become the `-` placeholder.
fn to_snapshot(chain: &OptionChainResponse) -> RawSnapshot {
    let mut table: Vec<Vec<String>> = label_rows().into_iter().collect();
    for entry in &chain.filtered.data {
        let mut row = vec![String::new(); RAW_WIDTH];
        for column in &COLUMNS {
            let value = match column.field {
                Field::Call(f) => entry.call.as_ref().and_then(|l| l.get(f)),
                Field::Strike => entry.strike_price,
                Field::Put(f) => entry.put.as_ref().and_then(|l| l.get(f)),
            };
            row[column.index] = value.map_or_else(|| "-".to_string(), |v| v.to_string());
        }
        table.push(row);
    }

    RawSnapshot {
        table,
        spot: chain.records.underlying_value.unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::parse_snapshot;

    const RESPONSE: &str = r#"{
        "records": { "underlyingValue": 22050.35, "timestamp": "19-Oct-2026 15:30:00" },
        "filtered": {
            "data": [
                {
                    "strikePrice": 22000,
                    "CE": {
                        "openInterest": 12500, "changeinOpenInterest": -50,
                        "totalTradedVolume": 300, "impliedVolatility": 15.2,
                        "lastPrice": 120.5, "change": -5, "bidQty": 50,
                        "bidprice": 120, "askPrice": 121, "askQty": 60
                    },
                    "PE": {
                        "openInterest": 7000, "changeinOpenInterest": 30,
                        "totalTradedVolume": 500, "impliedVolatility": 16.1,
                        "lastPrice": 88, "change": 3, "bidQty": 40,
                        "bidprice": 85, "askPrice": 86, "askQty": 70
                    }
                },
                { "strikePrice": 22100, "PE": { "openInterest": 10 } }
            ],
            "CE": { "totOI": 12500 },
            "PE": { "totOI": 7010 }
        }
    }"#;

    #[test]
    fn test_response_renders_as_page_table() {
        let chain: OptionChainResponse = serde_json::from_str(RESPONSE).unwrap();
        let snap = to_snapshot(&chain);

        assert_eq!(snap.spot, 22050.35);
        assert_eq!(snap.table.len(), 4);
        assert_eq!(
            snap.table[2],
            vec![
                "", "12500", "-50", "300", "15.2", "120.5", "-5", "50", "120", "121", "60",
                "22000", "40", "85", "86", "70", "3", "88", "16.1", "500", "30", "7000",
            ]
        );
        assert_eq!(snap.table[3][1], "-");
        assert_eq!(snap.table[3][21], "10");
    }

    #[test]
    fn test_rendered_table_parses_back() {
        let chain: OptionChainResponse = serde_json::from_str(RESPONSE).unwrap();
        let snap = to_snapshot(&chain);
        let parsed = parse_snapshot(&snap.table, 2);

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].call.implied_volatility, 15.2);
        assert_eq!(parsed.rows[1].strike, 22100.0);
        assert_eq!(parsed.rows[1].put.open_interest, 10.0);
        assert_eq!(parsed.rows[1].call.open_interest, 0.0);
    }
}
