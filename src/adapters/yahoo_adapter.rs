//! Yahoo Finance price adapter.
//!
//! Daily closes from the v8 chart API, one request per symbol within the
//! batch. Transient failures are retried with exponential backoff. Symbols
//! the API does not know are omitted; the batch fails only when the API is
//! unreachable for every symbol.

use crate::domain::error::RrgError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart/";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

/// Timestamps mark the session open; `gmtoffset` is the exchange's UTC
/// offset in seconds at the time of the request.
#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug)]
enum SymbolError {
    NotFound,
    Unreachable(String),
    Other(String),
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooAdapter {
    pub fn new() -> Result<Self, RrgError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, RrgError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| RrgError::Fetch {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    pub fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<reqwest::Url, RrgError> {
        let invalid = |reason: String| RrgError::Fetch { reason };
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("invalid base url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("base url {} cannot have a path", self.base_url)))?
            .pop_if_empty()
            .push(symbol);

        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = (end + chrono::Duration::days(1))
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .timestamp();
        url.query_pairs_mut()
            .append_pair("period1", &start_ts.to_string())
            .append_pair("period2", &end_ts.to_string())
            .append_pair("interval", "1d")
            .append_pair("includeAdjustedClose", "true");
        Ok(url)
    }

    fn fetch_with_retry(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, SymbolError> {
        let url = self
            .chart_url(symbol, start, end)
            .map_err(|e| SymbolError::Other(e.to_string()))?;
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                tracing::debug!(%symbol, attempt, ?delay, "retrying chart request");
                std::thread::sleep(delay);
            }

            match self.client.get(url.clone()).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(SymbolError::NotFound);
                    }
                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                        last_error = Some(SymbolError::Other(format!("HTTP {status} for {symbol}")));
                        continue;
                    }
                    if !status.is_success() {
                        return Err(SymbolError::Other(format!("HTTP {status} for {symbol}")));
                    }

                    let chart: ChartResponse = resp.json().map_err(|e| {
                        SymbolError::Other(format!("failed to parse response for {symbol}: {e}"))
                    })?;
                    return parse_response(symbol, start, end, chart);
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(SymbolError::Unreachable(e.to_string()));
                }
                Err(e) => return Err(SymbolError::Unreachable(e.to_string())),
            }
        }

        Err(last_error.unwrap_or_else(|| SymbolError::Other("max retries exceeded".into())))
    }
}

impl PricePort for YahooAdapter {
    fn fetch(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<String, PriceSeries>, RrgError> {
        let mut out = HashMap::new();
        let mut unreachable = Vec::new();

        for symbol in symbols {
            match self.fetch_with_retry(symbol, start, end) {
                Ok(series) => {
                    tracing::debug!(%symbol, points = series.len(), "fetched chart");
                    out.insert(symbol.clone(), series);
                }
                Err(SymbolError::NotFound) => tracing::debug!(%symbol, "symbol not found"),
                Err(SymbolError::Unreachable(reason)) => {
                    tracing::warn!(%symbol, %reason, "chart API unreachable");
                    unreachable.push(reason);
                }
                Err(SymbolError::Other(reason)) => tracing::warn!(%symbol, %reason, "chart request failed"),
            }
        }

        if !symbols.is_empty() && unreachable.len() == symbols.len() {
            return Err(RrgError::Fetch {
                reason: unreachable.swap_remove(0),
            });
        }
        Ok(out)
    }
}

fn parse_response(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    resp: ChartResponse,
) -> Result<PriceSeries, SymbolError> {
    let Some(data) = resp.chart.result.and_then(|r| r.into_iter().next()) else {
        return match resp.chart.error {
            Some(err) if err.code == "Not Found" => Err(SymbolError::NotFound),
            Some(err) => Err(SymbolError::Other(format!("{}: {}", err.code, err.description))),
            None => Err(SymbolError::Other("empty result with no error".into())),
        };
    };

    let gmtoffset = data.meta.as_ref().map_or(0, |m| m.gmtoffset);
    let timestamps = data.timestamp.unwrap_or_default();
    let closes = data
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();
    let adj_closes = data
        .indicators
        .adjclose
        .and_then(|v| v.into_iter().next())
        .map(|a| a.adjclose);

    let points: Vec<PricePoint> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let date = exchange_date(ts, gmtoffset)?;
            let adj = adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten());
            let close = adj.or_else(|| closes.get(i).copied().flatten())?;
            (close.is_finite() && date >= start && date <= end).then_some(PricePoint { date, close })
        })
        .collect();

    if points.is_empty() {
        return Err(SymbolError::NotFound);
    }
    Ok(PriceSeries::new(symbol, points))
}

/// Calendar date of a bar in the exchange's local time.
fn exchange_date(ts: i64, gmtoffset: i64) -> Option<NaiveDate> {
    let local = ts.checked_add(gmtoffset)?;
    Some(chrono::DateTime::from_timestamp(local, 0)?.date_naive())
}
