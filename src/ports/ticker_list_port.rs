//! Remote ticker-list port.

use crate::domain::error::RrgError;

/// Fetches a newline-delimited ticker list. Implementations return the
/// trimmed, non-blank lines in order.
pub trait TickerListPort {
    fn fetch(&self, url: &str) -> Result<Vec<String>, RrgError>;
}
