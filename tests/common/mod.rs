#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use rrgchart::domain::error::RrgError;
use rrgchart::domain::price::{PricePoint, PriceSeries};
use rrgchart::ports::price_port::PricePort;
use rrgchart::ports::ticker_list_port::TickerListPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockPricePort {
    pub data: HashMap<String, PriceSeries>,
    pub error: Option<String>,
    pub requests: RefCell<Vec<Vec<String>>>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            error: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.data.insert(series.symbol.clone(), series);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl PricePort for MockPricePort {
    fn fetch(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<String, PriceSeries>, RrgError> {
        self.requests.borrow_mut().push(symbols.to_vec());
        if let Some(reason) = &self.error {
            return Err(RrgError::Fetch {
                reason: reason.clone(),
            });
        }
        Ok(symbols
            .iter()
            .filter_map(|s| {
                let series = self.data.get(s)?;
                let points = series
                    .points
                    .iter()
                    .filter(|p| p.date >= start && p.date <= end)
                    .copied()
                    .collect();
                Some((s.clone(), PriceSeries::new(s.clone(), points)))
            })
            .collect())
    }
}

pub struct MockTickerListPort {
    pub lists: HashMap<String, Vec<String>>,
}

impl MockTickerListPort {
    pub fn new() -> Self {
        Self {
            lists: HashMap::new(),
        }
    }

    pub fn with_list(mut self, url: &str, tickers: &[&str]) -> Self {
        self.lists
            .insert(url.to_string(), tickers.iter().map(|t| t.to_string()).collect());
        self
    }
}

impl TickerListPort for MockTickerListPort {
    fn fetch(&self, url: &str) -> Result<Vec<String>, RrgError> {
        self.lists.get(url).cloned().ok_or_else(|| RrgError::TickerList {
            url: url.to_string(),
            reason: "HTTP 404 Not Found".to_string(),
        })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `count` consecutive calendar days starting at `start`, closes from `price`.
pub fn daily_series(
    symbol: &str,
    start: NaiveDate,
    count: usize,
    price: impl Fn(usize) -> f64,
) -> PriceSeries {
    let points = (0..count)
        .map(|i| PricePoint {
            date: start + Duration::days(i as i64),
            close: price(i),
        })
        .collect();
    PriceSeries::new(symbol, points)
}

/// Weekday-only series ending on `end`, oldest first.
pub fn trading_days(
    symbol: &str,
    end: NaiveDate,
    count: usize,
    price: impl Fn(usize) -> f64,
) -> PriceSeries {
    use chrono::Datelike;
    let mut dates = Vec::with_capacity(count);
    let mut d = end;
    while dates.len() < count {
        if d.weekday().num_days_from_monday() < 5 {
            dates.push(d);
        }
        d -= Duration::days(1);
    }
    dates.reverse();
    let points = dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| PricePoint {
            date,
            close: price(i),
        })
        .collect();
    PriceSeries::new(symbol, points)
}

pub fn growth(rate: f64) -> impl Fn(usize) -> f64 {
    move |i| 100.0 * (1.0 + rate).powi(i as i32)
}

pub fn flat(value: f64) -> impl Fn(usize) -> f64 {
    move |_| value
}

/// CSV text in the layout the CSV adapter reads.
pub fn to_csv(series: &PriceSeries) -> String {
    let mut out = String::from("Date,Close\n");
    for p in &series.points {
        out.push_str(&format!("{},{}\n", p.date, p.close));
    }
    out
}
