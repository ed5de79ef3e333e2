//! Preset portfolios for the custom universe.
//!
//! A preset may point at a remote ticker list. Any failure to obtain a usable
//! list falls back to the preset's built-in tickers, so a preset always
//! yields tickers.

use crate::domain::catalog::{MAX_CUSTOM_TICKERS, Preset};
use crate::domain::ticker::normalize_all;
use crate::ports::ticker_list_port::TickerListPort;

#[derive(Debug, Clone, PartialEq)]
pub struct PresetLoad {
    pub tickers: Vec<String>,
    /// Set when the remote list was requested but not used.
    pub warning: Option<String>,
}

pub fn builtin_tickers(preset: &Preset) -> Vec<String> {
    preset.tickers.iter().map(|t| t.to_string()).collect()
}

pub fn load_preset(
    preset: &Preset,
    url: Option<&str>,
    port: Option<&dyn TickerListPort>,
) -> PresetLoad {
    let url = match url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(u) => u,
        None => {
            return PresetLoad {
                tickers: builtin_tickers(preset),
                warning: None,
            };
        }
    };

    let fallback = |reason: String| {
        let warning = format!(
            "preset {} list from {} unavailable ({}), using built-in list",
            preset.key, url, reason
        );
        tracing::warn!(preset = preset.key, url, %reason, "falling back to built-in preset");
        PresetLoad {
            tickers: builtin_tickers(preset),
            warning: Some(warning),
        }
    };

    let Some(port) = port else {
        return fallback("no remote ticker-list provider configured".to_string());
    };

    match port.fetch(url) {
        Ok(list) => {
            let mut tickers = normalize_all(list.iter().map(String::as_str));
            if tickers.is_empty() {
                return fallback("list is empty".to_string());
            }
            tickers.truncate(MAX_CUSTOM_TICKERS);
            tracing::debug!(preset = preset.key, count = tickers.len(), "loaded remote preset");
            PresetLoad {
                tickers,
                warning: None,
            }
        }
        Err(e) => fallback(e.to_string()),
    }
}
