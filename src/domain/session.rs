//! Caller-owned state carried between render passes.
//!
//! The core never stores this itself; the caller keeps a `SessionState`,
//! mutates it on each interaction and hands it to [`crate::domain::render`].

use crate::domain::catalog::{self, MAX_CUSTOM_TICKERS};
use crate::domain::error::RrgError;
use crate::domain::preset::{PresetLoad, load_preset};
use crate::domain::price::Timeframe;
use crate::domain::ticker::normalize_all;
use crate::domain::universe::UniverseSelection;
use crate::ports::ticker_list_port::TickerListPort;

pub const MIN_TAIL_LENGTH: usize = 1;
pub const MAX_TAIL_LENGTH: usize = 52;
pub const DEFAULT_TAIL_LENGTH: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct CustomPortfolio {
    pub preset_key: String,
    pub tickers: Vec<String>,
    pub benchmark: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub universe: String,
    pub sector: Option<String>,
    pub timeframe: Timeframe,
    tail_length: usize,
    pub custom: CustomPortfolio,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            universe: "US Sectors".to_string(),
            sector: None,
            timeframe: Timeframe::Weekly,
            tail_length: DEFAULT_TAIL_LENGTH,
            custom: CustomPortfolio {
                preset_key: "US".to_string(),
                tickers: Vec::new(),
                benchmark: None,
            },
        }
    }
}

impl SessionState {
    pub fn tail_length(&self) -> usize {
        self.tail_length
    }

    pub fn set_tail_length(&mut self, n: usize) -> Result<(), RrgError> {
        if !(MIN_TAIL_LENGTH..=MAX_TAIL_LENGTH).contains(&n) {
            return Err(RrgError::ConfigInvalid {
                section: "chart".to_string(),
                key: "tail_length".to_string(),
                reason: format!(
                    "tail_length must be between {} and {}",
                    MIN_TAIL_LENGTH, MAX_TAIL_LENGTH
                ),
            });
        }
        self.tail_length = n;
        Ok(())
    }

    /// Replaces the custom tickers with the normalized form of raw inputs.
    /// Blank inputs are dropped and at most `MAX_CUSTOM_TICKERS` are kept.
    pub fn set_custom_tickers<'a, I>(&mut self, inputs: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tickers = normalize_all(inputs);
        tickers.truncate(MAX_CUSTOM_TICKERS);
        self.custom.tickers = tickers;
    }

    /// Restores the custom tickers from the current preset.
    pub fn reset_to_preset(
        &mut self,
        url: Option<&str>,
        port: Option<&dyn TickerListPort>,
    ) -> Result<PresetLoad, RrgError> {
        let preset =
            catalog::find_preset(&self.custom.preset_key).ok_or_else(|| RrgError::Resolution {
                reason: format!("unknown preset '{}'", self.custom.preset_key),
            })?;
        let load = load_preset(preset, url, port);
        self.custom.tickers = load.tickers.clone();
        Ok(load)
    }

    pub fn selection(&self) -> UniverseSelection<'_> {
        UniverseSelection {
            universe: &self.universe,
            sector: self.sector.as_deref(),
            custom_tickers: &self.custom.tickers,
            custom_benchmark: self.custom.benchmark.as_deref(),
        }
    }
}
