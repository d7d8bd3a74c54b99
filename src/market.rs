//! Live BTC/ETH market data for prompt and export context.
//!
//! Quotes come from Yahoo's v8 chart endpoint (one request per symbol).
//! Strictly best-effort: a failure for either symbol drops the whole
//! snapshot with a warning, and the pipeline continues without market
//! context.

use crate::error::PipelineError;
use crate::models::{AssetQuote, MarketSnapshot};
use serde::Deserialize;
use tracing::{info, instrument, warn};

const QUOTE_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Vec<ChartResult>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: f64,
    chart_previous_close: f64,
}

/// Fetch a BTC/ETH snapshot, or `None` when the quote service is down.
#[instrument(level = "info", skip_all)]
pub async fn fetch_market_snapshot(http: &reqwest::Client) -> Option<MarketSnapshot> {
    match snapshot(http).await {
        Ok(snapshot) => {
            info!(
                btc_price = snapshot.bitcoin.price,
                eth_price = snapshot.ethereum.price,
                "Retrieved live market data"
            );
            Some(snapshot)
        }
        Err(e) => {
            warn!(error = %e, "Market data retrieval failed");
            None
        }
    }
}

async fn snapshot(http: &reqwest::Client) -> Result<MarketSnapshot, PipelineError> {
    let bitcoin = quote(http, "BTC-USD").await?;
    let ethereum = quote(http, "ETH-USD").await?;
    Ok(MarketSnapshot { bitcoin, ethereum })
}

async fn quote(http: &reqwest::Client, symbol: &str) -> Result<AssetQuote, PipelineError> {
    let url = format!("{QUOTE_BASE}/{symbol}?range=1d&interval=1d");
    let envelope: ChartEnvelope = http
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let meta = envelope
        .chart
        .result
        .into_iter()
        .next()
        .map(|r| r.meta)
        .ok_or_else(|| PipelineError::MarketData(format!("empty chart result for {symbol}")))?;

    Ok(AssetQuote {
        price: meta.regular_market_price,
        change_24h: percent_change(meta.regular_market_price, meta.chart_previous_close),
    })
}

/// 24-hour percent change against the previous close; zero when the
/// previous close is unusable.
pub fn percent_change(price: f64, previous_close: f64) -> f64 {
    if previous_close == 0.0 || !previous_close.is_finite() {
        0.0
    } else {
        (price - previous_close) / previous_close * 100.0
    }
}
