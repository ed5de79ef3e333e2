//! One render pass, from caller-owned session state to a chart description.
//!
//! resolve -> fetch -> resample -> align -> engine per asset -> bounds -> assemble

use crate::domain::bounds::{AxisBounds, AxisClamp, compute_axis_bounds};
use crate::domain::chart::{ChartInput, ChartSpec, assemble_chart};
use crate::domain::error::RrgError;
use crate::domain::fetch::fetch_universe;
use crate::domain::price::{PriceSeries, Timeframe, align_series, resample};
use crate::domain::quadrant::{Quadrant, classify};
use crate::domain::rrg::{RrgParams, RrgSeries, compute_rrg};
use crate::domain::session::SessionState;
use crate::domain::universe::{Universe, resolve_universe};
use crate::ports::price_port::PricePort;
use chrono::{NaiveDate, TimeDelta};

pub const DEFAULT_LOOKBACK_DAYS_DAILY: i64 = 365;
pub const DEFAULT_LOOKBACK_DAYS_WEEKLY: i64 = 1095;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub params: RrgParams,
    pub clamp: AxisClamp,
    pub end_date: NaiveDate,
    pub lookback_days_daily: i64,
    pub lookback_days_weekly: i64,
}

impl RenderSettings {
    pub fn new(end_date: NaiveDate) -> Self {
        Self {
            params: RrgParams::default(),
            clamp: AxisClamp::default(),
            end_date,
            lookback_days_daily: DEFAULT_LOOKBACK_DAYS_DAILY,
            lookback_days_weekly: DEFAULT_LOOKBACK_DAYS_WEEKLY,
        }
    }

    /// Errors when the lookback does not fit in the calendar range.
    pub fn start_date(&self, timeframe: Timeframe) -> Result<NaiveDate, RrgError> {
        let (key, days) = match timeframe {
            Timeframe::Daily => ("lookback_days_daily", self.lookback_days_daily),
            Timeframe::Weekly => ("lookback_days_weekly", self.lookback_days_weekly),
        };
        TimeDelta::try_days(days)
            .and_then(|delta| self.end_date.checked_sub_signed(delta))
            .ok_or_else(|| RrgError::ConfigInvalid {
                section: "data".to_string(),
                key: key.to_string(),
                reason: format!("{} of {} reaches outside the calendar", key, days),
            })
    }
}

/// Most recent defined reading for one constituent.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestReading {
    pub symbol: String,
    pub label: String,
    pub ratio: f64,
    pub momentum: f64,
    pub quadrant: Quadrant,
}

#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub universe: Universe,
    pub timeframe: Timeframe,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub chart: ChartSpec,
    /// Constituent order; constituents with no defined reading are absent.
    pub latest: Vec<LatestReading>,
    pub missing: Vec<String>,
    pub substituted: Vec<(String, String)>,
}

impl RenderOutcome {
    pub fn bounds(&self) -> AxisBounds {
        self.chart.bounds
    }
}

struct Computed {
    symbol: String,
    label: String,
    series: RrgSeries,
}

pub fn run_render_pass(
    port: &dyn PricePort,
    state: &SessionState,
    settings: &RenderSettings,
) -> Result<RenderOutcome, RrgError> {
    let universe = resolve_universe(&state.selection())?;
    let timeframe = state.timeframe;
    let start_date = settings.start_date(timeframe)?;
    tracing::info!(
        universe = %universe.name,
        benchmark = %universe.benchmark,
        constituents = universe.count(),
        %timeframe,
        "starting render pass"
    );

    let report = fetch_universe(port, &universe, start_date, settings.end_date);

    if report.is_missing(&universe.benchmark) {
        return Err(RrgError::BenchmarkMissing {
            symbol: universe.benchmark.clone(),
        });
    }
    let available: Vec<&String> = universe
        .constituents
        .iter()
        .filter(|s| !report.is_missing(s))
        .collect();
    if available.is_empty() {
        return Err(RrgError::NoValidSymbols);
    }

    let resampled: Vec<PriceSeries> = universe
        .all_symbols()
        .iter()
        .filter_map(|s| report.series(s))
        .filter(|s| !s.is_empty())
        .map(|s| resample(s, timeframe))
        .collect();
    let aligned = align_series(&resampled);
    tracing::debug!(entries = aligned.len(), "aligned price timeline");

    let benchmark = aligned
        .get(&universe.benchmark)
        .ok_or_else(|| RrgError::BenchmarkMissing {
            symbol: universe.benchmark.clone(),
        })?;

    let computed: Vec<Computed> = available
        .into_iter()
        .filter_map(|symbol| {
            let asset = aligned.get(symbol)?;
            Some(Computed {
                symbol: symbol.clone(),
                label: universe.display_name(symbol),
                series: compute_rrg(asset, benchmark, &settings.params),
            })
        })
        .collect();

    let bounds = compute_axis_bounds(computed.iter().map(|c| &c.series), &settings.clamp)
        .ok_or_else(|| RrgError::InsufficientData {
            reason: format!(
                "no constituent has a defined reading within {} {} entries (need more than {})",
                aligned.len(),
                timeframe,
                settings.params.warmup()
            ),
        })?;

    let inputs: Vec<ChartInput<'_>> = computed
        .iter()
        .map(|c| ChartInput {
            symbol: &c.symbol,
            label: &c.label,
            series: &c.series,
        })
        .collect();
    let title = chart_title(&universe, timeframe);
    let chart = assemble_chart(&inputs, bounds, state.tail_length(), &title);

    let latest = computed
        .iter()
        .filter_map(|c| {
            let (ratio, momentum) = c.series.latest()?;
            Some(LatestReading {
                symbol: c.symbol.clone(),
                label: c.label.clone(),
                ratio,
                momentum,
                quadrant: classify(ratio, momentum),
            })
        })
        .collect();

    tracing::info!(traces = chart.traces.len(), missing = report.missing.len(), "render pass complete");

    Ok(RenderOutcome {
        universe,
        timeframe,
        start_date,
        end_date: settings.end_date,
        chart,
        latest,
        missing: report.missing,
        substituted: report.substituted,
    })
}

pub fn chart_title(universe: &Universe, timeframe: Timeframe) -> String {
    format!(
        "Relative Rotation Graph: {} vs {} ({})",
        universe.name, universe.benchmark, timeframe
    )
}
