//! RS-Ratio and RS-Momentum.
//!
//! relative    = asset / benchmark
//! RS-Ratio    = 100 * ((SMA(relative, 10) - SMA(relative, 26)) / SMA(relative, 26) + 1)
//! RS-Momentum = 100 * ((SMA(ratio, 1) - SMA(ratio, 4)) / SMA(ratio, 4) + 1)
//!
//! Both stages keep their own smoothing; the momentum stage runs on the
//! output of the ratio stage. Undefined inputs and zero divisors yield
//! undefined entries.

use crate::domain::indicator::Window;
use crate::domain::indicator::sma::moving_average;
use crate::domain::quadrant::{Quadrant, classify};

/// Both axes are centered on this value.
pub const PIVOT: f64 = 100.0;

const RATIO_FAST: Window = Window::fixed(10);
const RATIO_SLOW: Window = Window::fixed(26);
const MOMENTUM_FAST: Window = Window::fixed(1);
const MOMENTUM_SLOW: Window = Window::fixed(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RrgParams {
    pub ratio_fast: Window,
    pub ratio_slow: Window,
    pub momentum_fast: Window,
    pub momentum_slow: Window,
}

impl RrgParams {
    /// Leading entries of the momentum series that are always undefined.
    pub fn warmup(&self) -> usize {
        let ratio = self.ratio_fast.warmup().max(self.ratio_slow.warmup());
        let momentum = self.momentum_fast.warmup().max(self.momentum_slow.warmup());
        ratio + momentum
    }
}

impl Default for RrgParams {
    fn default() -> Self {
        Self {
            ratio_fast: RATIO_FAST,
            ratio_slow: RATIO_SLOW,
            momentum_fast: MOMENTUM_FAST,
            momentum_slow: MOMENTUM_SLOW,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RrgPoint {
    pub ratio: Option<f64>,
    pub momentum: Option<f64>,
}

impl RrgPoint {
    /// Both coordinates, when both are defined.
    pub fn coords(&self) -> Option<(f64, f64)> {
        Some((self.ratio?, self.momentum?))
    }

    pub fn quadrant(&self) -> Option<Quadrant> {
        self.coords().map(|(x, y)| classify(x, y))
    }
}

/// RS-Ratio and RS-Momentum aligned to the input timeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RrgSeries {
    pub ratio: Vec<Option<f64>>,
    pub momentum: Vec<Option<f64>>,
}

impl RrgSeries {
    pub fn len(&self) -> usize {
        self.ratio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratio.is_empty()
    }

    pub fn point(&self, i: usize) -> RrgPoint {
        RrgPoint {
            ratio: self.ratio.get(i).copied().flatten(),
            momentum: self.momentum.get(i).copied().flatten(),
        }
    }

    /// Points for the last `n` aligned entries, undefined ones included.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = RrgPoint> + '_ {
        let start = self.len().saturating_sub(n);
        (start..self.len()).map(|i| self.point(i))
    }

    /// The most recent point with both coordinates defined.
    pub fn latest(&self) -> Option<(f64, f64)> {
        (0..self.len()).rev().find_map(|i| self.point(i).coords())
    }
}

pub fn relative_strength(asset: &[Option<f64>], benchmark: &[Option<f64>]) -> Vec<Option<f64>> {
    asset
        .iter()
        .zip(benchmark)
        .map(|(&a, &b)| safe_div(a?, b?))
        .collect()
}

/// 100 * ((fast - slow) / slow + 1), entrywise.
fn normalized_spread(fast: &[Option<f64>], slow: &[Option<f64>]) -> Vec<Option<f64>> {
    fast.iter()
        .zip(slow)
        .map(|(&f, &s)| {
            let (f, s) = (f?, s?);
            safe_div(f - s, s).map(|spread| PIVOT * (spread + 1.0))
        })
        .collect()
}

fn safe_div(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator).filter(|v| v.is_finite())
}

pub fn compute_rrg(asset: &[Option<f64>], benchmark: &[Option<f64>], params: &RrgParams) -> RrgSeries {
    let relative = relative_strength(asset, benchmark);

    let rs_fast = moving_average(&relative, params.ratio_fast);
    let rs_slow = moving_average(&relative, params.ratio_slow);
    let ratio = normalized_spread(&rs_fast, &rs_slow);

    let rm_fast = moving_average(&ratio, params.momentum_fast);
    let rm_slow = moving_average(&ratio, params.momentum_slow);
    let momentum = normalized_spread(&rm_fast, &rm_slow);

    RrgSeries { ratio, momentum }
}
