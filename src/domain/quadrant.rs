//! Quadrant classification around the (100, 100) pivot.

use crate::domain::rrg::PIVOT;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    Lagging,
    Weakening,
    Improving,
    Leading,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Lagging,
        Quadrant::Weakening,
        Quadrant::Improving,
        Quadrant::Leading,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Quadrant::Lagging => "Lagging",
            Quadrant::Weakening => "Weakening",
            Quadrant::Improving => "Improving",
            Quadrant::Leading => "Leading",
        }
    }

    /// Trace and marker color for assets currently in this quadrant.
    pub fn color(self) -> &'static str {
        match self {
            Quadrant::Lagging => "#d62728",
            Quadrant::Weakening => "#ff9f1c",
            Quadrant::Improving => "#1f77b4",
            Quadrant::Leading => "#2ca02c",
        }
    }

    /// Background shading for the quadrant region.
    pub fn shade(self) -> &'static str {
        match self {
            Quadrant::Lagging => "rgba(214,39,40,0.08)",
            Quadrant::Weakening => "rgba(255,159,28,0.10)",
            Quadrant::Improving => "rgba(31,119,180,0.08)",
            Quadrant::Leading => "rgba(44,160,44,0.08)",
        }
    }

    /// Whether the quadrant lies right of the pivot on the ratio axis.
    pub fn is_strong(self) -> bool {
        matches!(self, Quadrant::Weakening | Quadrant::Leading)
    }

    /// Whether the quadrant lies above the pivot on the momentum axis.
    pub fn is_rising(self) -> bool {
        matches!(self, Quadrant::Improving | Quadrant::Leading)
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ties at exactly 100 fall on the upper side of each axis.
pub fn classify(ratio: f64, momentum: f64) -> Quadrant {
    match (ratio >= PIVOT, momentum >= PIVOT) {
        (false, false) => Quadrant::Lagging,
        (true, false) => Quadrant::Weakening,
        (false, true) => Quadrant::Improving,
        (true, true) => Quadrant::Leading,
    }
}
