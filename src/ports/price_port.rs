//! Time-series provider port.

use crate::domain::error::RrgError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;
use std::collections::HashMap;

pub trait PricePort {
    /// Closes for every requested symbol in `[start, end]`, keyed by symbol.
    ///
    /// Symbols the provider has no data for are simply absent from the map.
    /// `Err` means the provider itself failed.
    fn fetch(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<String, PriceSeries>, RrgError>;
}
