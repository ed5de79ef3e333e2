//! Chart assembly: turns engine output into a renderer-neutral description.

use crate::domain::bounds::AxisBounds;
use crate::domain::quadrant::{Quadrant, classify};
use crate::domain::rrg::{PIVOT, RrgSeries};

/// One constituent as handed to the assembler.
#[derive(Debug, Clone, Copy)]
pub struct ChartInput<'a> {
    pub symbol: &'a str,
    pub label: &'a str,
    pub series: &'a RrgSeries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPosition {
    Above,
    Below,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TailTrace {
    pub symbol: String,
    pub label: String,
    /// Quadrant of the latest point; drives the color of the whole tail.
    pub quadrant: Quadrant,
    pub color: &'static str,
    /// Chronological (ratio, momentum) pairs, oldest first.
    pub points: Vec<(f64, f64)>,
    pub label_position: LabelPosition,
}

impl TailTrace {
    pub fn head(&self) -> Option<(f64, f64)> {
        self.points.last().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadrantRegion {
    pub quadrant: Quadrant,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub fill: &'static str,
}

/// Axis-parallel line across the full plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crosshair {
    Vertical { x: f64 },
    Horizontal { y: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub bounds: AxisBounds,
    pub regions: [QuadrantRegion; 4],
    pub crosshairs: [Crosshair; 2],
    pub traces: Vec<TailTrace>,
}

pub fn assemble_chart(
    entries: &[ChartInput<'_>],
    bounds: AxisBounds,
    tail_length: usize,
    title: &str,
) -> ChartSpec {
    let traces = entries
        .iter()
        .filter_map(|entry| build_trace(entry, tail_length))
        .collect();

    ChartSpec {
        title: title.to_string(),
        bounds,
        regions: quadrant_regions(&bounds),
        crosshairs: [Crosshair::Vertical { x: PIVOT }, Crosshair::Horizontal { y: PIVOT }],
        traces,
    }
}

fn build_trace(entry: &ChartInput<'_>, tail_length: usize) -> Option<TailTrace> {
    let points: Vec<(f64, f64)> = entry
        .series
        .tail(tail_length)
        .filter_map(|p| p.coords())
        .collect();

    let &(x, y) = points.last()?;
    let quadrant = classify(x, y);

    Some(TailTrace {
        symbol: entry.symbol.to_string(),
        label: entry.label.to_string(),
        quadrant,
        color: quadrant.color(),
        label_position: label_position(&points),
        points,
    })
}

/// Above when momentum rose into the last point, below otherwise.
pub fn label_position(points: &[(f64, f64)]) -> LabelPosition {
    match points {
        [.., (_, prev), (_, last)] if last <= prev => LabelPosition::Below,
        _ => LabelPosition::Above,
    }
}

fn quadrant_regions(b: &AxisBounds) -> [QuadrantRegion; 4] {
    let region = |quadrant: Quadrant, (x0, x1): (f64, f64), (y0, y1): (f64, f64)| QuadrantRegion {
        quadrant,
        x0,
        x1,
        y0,
        y1,
        fill: quadrant.shade(),
    };
    let left = (b.x_min, PIVOT);
    let right = (PIVOT, b.x_max);
    let lower = (b.y_min, PIVOT);
    let upper = (PIVOT, b.y_max);

    [
        region(Quadrant::Lagging, left, lower),
        region(Quadrant::Weakening, right, lower),
        region(Quadrant::Improving, left, upper),
        region(Quadrant::Leading, right, upper),
    ]
}
