//! Smoothing filters over sparse numeric series.
//!
//! Series entries are `Option<f64>`: `None` marks an undefined value (a gap in
//! the source data or a warmup entry) and propagates through every filter.

pub mod sma;

use std::fmt;

/// A moving-average lookback, always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Window(usize);

impl Window {
    /// Window for a compile-time constant period.
    pub const fn fixed(period: usize) -> Self {
        assert!(period > 0, "moving-average window must be >= 1");
        Self(period)
    }

    pub const fn new(period: usize) -> Option<Self> {
        if period == 0 { None } else { Some(Self(period)) }
    }

    pub const fn get(self) -> usize {
        self.0
    }

    /// Number of leading entries left undefined by this window.
    pub const fn warmup(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Values that are defined, paired with their index.
pub fn defined(values: &[Option<f64>]) -> impl Iterator<Item = (usize, f64)> + '_ {
    values.iter().enumerate().filter_map(|(i, v)| v.map(|x| (i, x)))
}
