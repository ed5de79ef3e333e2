//! Port traits the domain depends on; adapters implement them.

pub mod chart_port;
pub mod config_port;
pub mod price_port;
pub mod ticker_list_port;
