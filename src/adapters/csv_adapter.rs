//! CSV file price adapter.
//!
//! One file per symbol at `<base>/<FILE_SAFE_SYMBOL>.csv` with a header row.
//! Symbols without a readable file or without a usable price column are
//! omitted from the result.

use crate::domain::error::RrgError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

const PRICE_COLUMNS: &[&str] = &["adj close", "adj_close", "adjclose", "close"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", file_safe_symbol(symbol)))
    }

    fn read_symbol(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<PriceSeries>, String> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| format!("CSV header error in {}: {}", path.display(), e))?
            .clone();

        let date_idx = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("date"))
            .unwrap_or(0);
        let Some(price_idx) = price_column(&headers) else {
            tracing::warn!(%symbol, path = %path.display(), "no close column, treating as missing");
            return Ok(None);
        };

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| format!("CSV parse error in {}: {}", path.display(), e))?;

            let Some(date) = record.get(date_idx).and_then(parse_date) else {
                continue;
            };
            if date < start || date > end {
                continue;
            }
            let close = record
                .get(price_idx)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite());
            if let Some(close) = close {
                points.push(PricePoint { date, close });
            }
        }

        Ok(Some(PriceSeries::new(symbol, points)))
    }
}

impl PricePort for CsvAdapter {
    fn fetch(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<String, PriceSeries>, RrgError> {
        if !self.base_path.is_dir() {
            return Err(RrgError::Fetch {
                reason: format!("data directory {} does not exist", self.base_path.display()),
            });
        }

        let mut out = HashMap::new();
        for symbol in symbols {
            match self.read_symbol(symbol, start, end) {
                Ok(Some(series)) => {
                    tracing::debug!(%symbol, points = series.len(), "read price file");
                    out.insert(symbol.clone(), series);
                }
                Ok(None) => tracing::debug!(%symbol, "no price file"),
                Err(reason) => tracing::warn!(%symbol, %reason, "skipping unreadable price file"),
            }
        }
        Ok(out)
    }
}

/// `^GSPC` -> `_GSPC`, `EURUSD=X` -> `EURUSD_X`.
pub fn file_safe_symbol(symbol: &str) -> String {
    symbol
        .chars()
        .map(|c| match c {
            '^' | '=' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

fn price_column(headers: &csv::StringRecord) -> Option<usize> {
    PRICE_COLUMNS.iter().find_map(|wanted| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    })
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
