//! Standalone SVG rendering of a rotation chart.

use crate::domain::chart::{ChartSpec, Crosshair, LabelPosition, QuadrantRegion, TailTrace};
use crate::domain::error::RrgError;
use crate::ports::chart_port::ChartPort;
use std::fmt;
use std::fs;
use std::path::Path;

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 720.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 60.0;
const LABEL_OFFSET_ABOVE: f64 = -10.0;
const LABEL_OFFSET_BELOW: f64 = 18.0;

#[derive(Debug, Default)]
pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ChartPort for SvgChartAdapter {
    fn render(&self, chart: &ChartSpec, output_path: &Path) -> Result<(), RrgError> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RrgError::Render {
                reason: format!("cannot create {}: {}", parent.display(), e),
            })?;
        }
        fs::write(output_path, render_svg(chart)).map_err(|e| RrgError::Render {
            reason: format!("cannot write {}: {}", output_path.display(), e),
        })?;
        tracing::info!(path = %output_path.display(), traces = chart.traces.len(), "wrote chart");
        Ok(())
    }
}

pub fn render_svg(chart: &ChartSpec) -> String {
    SvgChart::new(chart).to_string()
}

/// Data-to-pixel mapping for one chart.
struct SvgChart<'a> {
    chart: &'a ChartSpec,
    plot_w: f64,
    plot_h: f64,
}

impl<'a> SvgChart<'a> {
    fn new(chart: &'a ChartSpec) -> Self {
        Self {
            chart,
            plot_w: WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
            plot_h: HEIGHT - MARGIN_TOP - MARGIN_BOTTOM,
        }
    }

    fn px(&self, x: f64) -> f64 {
        let b = &self.chart.bounds;
        let span = if b.width() > 0.0 { b.width() } else { 1.0 };
        MARGIN_LEFT + (x - b.x_min) / span * self.plot_w
    }

    fn py(&self, y: f64) -> f64 {
        let b = &self.chart.bounds;
        let span = if b.height() > 0.0 { b.height() } else { 1.0 };
        MARGIN_TOP + (b.y_max - y) / span * self.plot_h
    }

    fn write_region(&self, f: &mut fmt::Formatter<'_>, r: &QuadrantRegion) -> fmt::Result {
        let (left, right) = (self.px(r.x0), self.px(r.x1));
        let (top, bottom) = (self.py(r.y1), self.py(r.y0));
        writeln!(
            f,
            r#"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            left,
            top,
            (right - left).max(0.0),
            (bottom - top).max(0.0),
            r.fill
        )?;

        let strong = r.quadrant.is_strong();
        let rising = r.quadrant.is_rising();
        let x = if strong { right - 8.0 } else { left + 8.0 };
        let y = if rising { top + 18.0 } else { bottom - 8.0 };
        let anchor = if strong { "end" } else { "start" };
        writeln!(
            f,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="{}" font-size="14" font-weight="bold" fill="{}" opacity="0.7">{}</text>"#,
            x,
            y,
            anchor,
            r.quadrant.color(),
            r.quadrant.name()
        )
    }

    fn write_crosshair(&self, f: &mut fmt::Formatter<'_>, c: &Crosshair) -> fmt::Result {
        let b = &self.chart.bounds;
        let (x1, y1, x2, y2) = match *c {
            Crosshair::Vertical { x } => (self.px(x), self.py(b.y_min), self.px(x), self.py(b.y_max)),
            Crosshair::Horizontal { y } => (self.px(b.x_min), self.py(y), self.px(b.x_max), self.py(y)),
        };
        writeln!(
            f,
            r##"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#555" stroke-width="1" stroke-dasharray="6 4"/>"##,
            x1, y1, x2, y2
        )
    }

    fn write_trace(&self, f: &mut fmt::Formatter<'_>, t: &TailTrace) -> fmt::Result {
        let Some((hx, hy)) = t.head() else {
            return Ok(());
        };
        writeln!(f, r#"  <g class="trace" data-symbol="{}">"#, escape_xml(&t.symbol))?;

        if t.points.len() > 1 {
            let points: Vec<String> = t
                .points
                .iter()
                .map(|&(x, y)| format!("{:.1},{:.1}", self.px(x), self.py(y)))
                .collect();
            writeln!(
                f,
                r#"    <polyline points="{}" fill="none" stroke="{}" stroke-width="2" stroke-opacity="0.8"/>"#,
                points.join(" "),
                t.color
            )?;
        }
        for &(x, y) in &t.points[..t.points.len() - 1] {
            writeln!(
                f,
                r#"    <circle cx="{:.1}" cy="{:.1}" r="2.5" fill="{}" fill-opacity="0.6"/>"#,
                self.px(x),
                self.py(y),
                t.color
            )?;
        }

        let (cx, cy) = (self.px(hx), self.py(hy));
        writeln!(
            f,
            r##"    <circle cx="{:.1}" cy="{:.1}" r="6" fill="{}" stroke="#fff" stroke-width="1.5"/>"##,
            cx, cy, t.color
        )?;
        let dy = match t.label_position {
            LabelPosition::Above => LABEL_OFFSET_ABOVE,
            LabelPosition::Below => LABEL_OFFSET_BELOW,
        };
        writeln!(
            f,
            r#"    <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12" fill="{}">{}</text>"#,
            cx,
            cy + dy,
            t.color,
            escape_xml(&t.label)
        )?;
        writeln!(
            f,
            "    <title>{}: RS-Ratio {:.2}, RS-Momentum {:.2} ({})</title>",
            escape_xml(&t.label),
            hx,
            hy,
            t.quadrant
        )?;
        writeln!(f, "  </g>")
    }

    fn write_axes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.chart.bounds;
        let (left, right) = (self.px(b.x_min), self.px(b.x_max));
        let (top, bottom) = (self.py(b.y_max), self.py(b.y_min));
        writeln!(
            f,
            r##"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="#333"/>"##,
            left,
            top,
            right - left,
            bottom - top
        )?;

        for x in [b.x_min, 100.0, b.x_max] {
            writeln!(
                f,
                r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="11">{:.1}</text>"#,
                self.px(x),
                bottom + 16.0,
                x
            )?;
        }
        for y in [b.y_min, 100.0, b.y_max] {
            writeln!(
                f,
                r#"  <text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{:.1}</text>"#,
                left - 6.0,
                self.py(y) + 4.0,
                y
            )?;
        }
        writeln!(
            f,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13">RS-Ratio</text>"#,
            (left + right) / 2.0,
            HEIGHT - 15.0
        )?;
        writeln!(
            f,
            r#"  <text x="18" y="{:.1}" text-anchor="middle" font-size="13" transform="rotate(-90 18 {:.1})">RS-Momentum</text>"#,
            (top + bottom) / 2.0,
            (top + bottom) / 2.0
        )
    }
}

impl fmt::Display for SvgChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = WIDTH,
            h = HEIGHT
        )?;
        writeln!(f, r#"  <rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            f,
            r#"  <text x="{:.1}" y="32" text-anchor="middle" font-size="18">{}</text>"#,
            WIDTH / 2.0,
            escape_xml(&self.chart.title)
        )?;

        for region in &self.chart.regions {
            self.write_region(f, region)?;
        }
        for crosshair in &self.chart.crosshairs {
            self.write_crosshair(f, crosshair)?;
        }
        self.write_axes(f)?;
        for trace in &self.chart.traces {
            self.write_trace(f, trace)?;
        }
        writeln!(f, "</svg>")
    }
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
