//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
#[cfg(feature = "remote")]
pub mod http_ticker_list_adapter;
pub mod svg_chart_adapter;
#[cfg(feature = "remote")]
pub mod yahoo_adapter;
