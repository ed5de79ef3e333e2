//! Axis range derivation for the rotation chart.
//!
//! Bounds come from the trailing `BOUNDS_WINDOW` entries of every series,
//! padded by 10% of each axis' range, widened to include the pivot and then
//! clamped to configured limits so both cross-lines stay on the plot.

use crate::domain::rrg::{PIVOT, RrgSeries};

pub const BOUNDS_WINDOW: usize = 10;
pub const PADDING_FRACTION: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl AxisBounds {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x_min <= x && x <= self.x_max && self.y_min <= y && y <= self.y_max
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Outer limits for the plot range. Floors sit below the pivot and
/// ceilings above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisClamp {
    pub x_floor: f64,
    pub x_ceiling: f64,
    pub y_floor: f64,
    pub y_ceiling: f64,
}

impl Default for AxisClamp {
    fn default() -> Self {
        Self {
            x_floor: 60.0,
            x_ceiling: 140.0,
            y_floor: 70.0,
            y_ceiling: 130.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Extent {
    min: f64,
    max: f64,
}

impl Extent {
    fn include(extent: Option<Extent>, v: f64) -> Extent {
        match extent {
            None => Extent { min: v, max: v },
            Some(e) => Extent {
                min: e.min.min(v),
                max: e.max.max(v),
            },
        }
    }

    fn padded(self, floor: f64, ceiling: f64) -> (f64, f64) {
        let pad = (self.max - self.min) * PADDING_FRACTION;
        let lo = (self.min - pad).min(PIVOT).max(floor);
        let hi = (self.max + pad).max(PIVOT).min(ceiling);
        (lo, hi)
    }
}

/// `None` when no trailing entry has both coordinates defined.
pub fn compute_axis_bounds<'a, I>(series: I, clamp: &AxisClamp) -> Option<AxisBounds>
where
    I: IntoIterator<Item = &'a RrgSeries>,
{
    let mut x: Option<Extent> = None;
    let mut y: Option<Extent> = None;

    for s in series {
        for (ratio, momentum) in s.tail(BOUNDS_WINDOW).filter_map(|p| p.coords()) {
            x = Some(Extent::include(x, ratio));
            y = Some(Extent::include(y, momentum));
        }
    }

    let (x_min, x_max) = x?.padded(clamp.x_floor, clamp.x_ceiling);
    let (y_min, y_max) = y?.padded(clamp.y_floor, clamp.y_ceiling);

    Some(AxisBounds {
        x_min,
        x_max,
        y_min,
        y_max,
    })
}
