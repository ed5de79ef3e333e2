//! Fetch boundary between the price provider and the engine.
//!
//! Requests the whole universe in one batch, retries absent symbols through
//! the proxy table and fills whatever is still absent with an empty series,
//! so every requested symbol is present in the result.

use crate::domain::catalog::proxy_for;
use crate::domain::price::PriceSeries;
use crate::domain::universe::Universe;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// One entry per requested symbol; missing ones are empty.
    pub prices: HashMap<String, PriceSeries>,
    /// Requested symbols with no data after proxy substitution, in request order.
    pub missing: Vec<String>,
    /// (original, proxy) pairs whose data now stands in for the original.
    pub substituted: Vec<(String, String)>,
}

impl FetchReport {
    pub fn is_missing(&self, symbol: &str) -> bool {
        self.missing.iter().any(|m| m == symbol)
    }

    pub fn series(&self, symbol: &str) -> Option<&PriceSeries> {
        self.prices.get(symbol)
    }
}

pub fn fetch_universe(
    port: &dyn PricePort,
    universe: &Universe,
    start: NaiveDate,
    end: NaiveDate,
) -> FetchReport {
    fetch_symbols(port, &universe.all_symbols(), start, end)
}

pub fn fetch_symbols(
    port: &dyn PricePort,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> FetchReport {
    tracing::debug!(count = symbols.len(), %start, %end, "fetching price batch");
    let mut fetched = batch(port, symbols, start, end);

    let mut prices = HashMap::with_capacity(symbols.len());
    let mut absent = Vec::new();
    for symbol in symbols {
        match fetched.remove(symbol).filter(|s| !s.is_empty()) {
            Some(series) => {
                prices.insert(symbol.clone(), series);
            }
            None => absent.push(symbol.clone()),
        }
    }

    let wanted: Vec<(String, String)> = absent
        .iter()
        .filter_map(|s| proxy_for(s).map(|p| (s.clone(), p.to_string())))
        .collect();

    let mut substituted = Vec::new();
    if !wanted.is_empty() {
        let proxies: Vec<String> = wanted.iter().map(|(_, p)| p.clone()).collect();
        let mut proxy_data = batch(port, &proxies, start, end);
        for (original, proxy) in wanted {
            if let Some(series) = proxy_data.remove(&proxy).filter(|s| !s.is_empty()) {
                tracing::warn!(%original, %proxy, "substituting proxy data");
                prices.insert(
                    original.clone(),
                    PriceSeries {
                        symbol: original.clone(),
                        points: series.points,
                    },
                );
                substituted.push((original, proxy));
            }
        }
    }

    let missing: Vec<String> = absent
        .into_iter()
        .filter(|s| !prices.contains_key(s))
        .collect();
    for symbol in &missing {
        tracing::warn!(%symbol, "no price data");
        prices.insert(symbol.clone(), PriceSeries::empty(symbol.clone()));
    }

    FetchReport {
        prices,
        missing,
        substituted,
    }
}

fn batch(
    port: &dyn PricePort,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> HashMap<String, PriceSeries> {
    port.fetch(symbols, start, end).unwrap_or_else(|e| {
        tracing::warn!(error = %e, count = symbols.len(), "price provider failed, treating batch as missing");
        HashMap::new()
    })
}
