//! Plain-text ticker lists over HTTP.

use crate::domain::error::RrgError;
use crate::domain::ticker::parse_ticker_list;
use crate::ports::ticker_list_port::TickerListPort;
use std::time::Duration;

pub struct HttpTickerListAdapter {
    client: reqwest::blocking::Client,
}

impl HttpTickerListAdapter {
    pub fn new() -> Result<Self, RrgError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| RrgError::Fetch {
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

impl TickerListPort for HttpTickerListAdapter {
    fn fetch(&self, url: &str) -> Result<Vec<String>, RrgError> {
        let err = |reason: String| RrgError::TickerList {
            url: url.to_string(),
            reason,
        };

        let resp = self.client.get(url).send().map_err(|e| err(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(err(format!("HTTP {}", status)));
        }
        let body = resp.text().map_err(|e| err(e.to_string()))?;
        let tickers = parse_ticker_list(&body);
        tracing::debug!(%url, count = tickers.len(), "fetched ticker list");
        Ok(tickers)
    }
}
