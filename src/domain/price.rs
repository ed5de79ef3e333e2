//! Price series, timeframe resampling and multi-symbol alignment.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Chronologically ordered closes for one symbol. Gaps are absent entries.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series, sorting by date and keeping the last point for a
    /// repeated date.
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        Self {
            symbol: symbol.into(),
            points: deduped,
        }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    Daily,
    #[default]
    Weekly,
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Daily => write!(f, "daily"),
            Timeframe::Weekly => write!(f, "weekly"),
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "d" | "1d" => Ok(Timeframe::Daily),
            "weekly" | "w" | "1wk" => Ok(Timeframe::Weekly),
            other => Err(format!("unknown timeframe '{}' (expected daily or weekly)", other)),
        }
    }
}

/// The Friday that closes the week containing `date`. Saturday and Sunday
/// roll forward into the following week.
pub fn week_ending_friday(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_monday() as i64;
    let days_to_friday = (4 - weekday).rem_euclid(7);
    date + Duration::days(days_to_friday)
}

/// Keeps the last observation of each week, labeled with the week's Friday.
pub fn resample_weekly(series: &PriceSeries) -> PriceSeries {
    let mut weeks: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for point in &series.points {
        weeks.insert(week_ending_friday(point.date), point.close);
    }
    PriceSeries {
        symbol: series.symbol.clone(),
        points: weeks
            .into_iter()
            .map(|(date, close)| PricePoint { date, close })
            .collect(),
    }
}

pub fn resample(series: &PriceSeries, timeframe: Timeframe) -> PriceSeries {
    match timeframe {
        Timeframe::Daily => series.clone(),
        Timeframe::Weekly => resample_weekly(series),
    }
}

/// Many symbols on one shared date axis. Every value vector has the length
/// of `dates`.
#[derive(Debug, Clone)]
pub struct AlignedPrices {
    pub dates: Vec<NaiveDate>,
    pub values: HashMap<String, Vec<Option<f64>>>,
}

impl AlignedPrices {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&[Option<f64>]> {
        self.values.get(symbol).map(|v| v.as_slice())
    }
}

pub fn build_unified_timeline(series: &[PriceSeries]) -> Vec<NaiveDate> {
    let unique_dates: BTreeSet<NaiveDate> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.date))
        .collect();
    unique_dates.into_iter().collect()
}

/// Aligns every series onto the union of their dates. Dates a series does
/// not cover become `None`, as do non-finite closes.
pub fn align_series(series: &[PriceSeries]) -> AlignedPrices {
    let dates = build_unified_timeline(series);
    let index: HashMap<NaiveDate, usize> = dates.iter().enumerate().map(|(i, &d)| (d, i)).collect();

    let values = series
        .iter()
        .map(|s| {
            let mut aligned = vec![None; dates.len()];
            for point in &s.points {
                if let Some(&i) = index.get(&point.date) {
                    aligned[i] = Some(point.close).filter(|c| c.is_finite());
                }
            }
            (s.symbol.clone(), aligned)
        })
        .collect();

    AlignedPrices { dates, values }
}
