//! Render-pass tests through mock ports.
//!
//! Tests cover:
//! - Fixed, sub-sector and custom universes end to end
//! - Proxy substitution and partially missing constituents
//! - Benchmark, empty-universe and short-history failures
//! - Preset fallback when the remote list is unavailable
//! - Quadrant, tail and axis-bound properties of the produced chart

mod common;

use approx::assert_relative_eq;
use common::*;
use proptest::prelude::*;
use rrgchart::adapters::svg_chart_adapter::render_svg;
use rrgchart::domain::bounds::AxisClamp;
use rrgchart::domain::error::RrgError;
use rrgchart::domain::price::{PriceSeries, Timeframe};
use rrgchart::domain::quadrant::{Quadrant, classify};
use rrgchart::domain::render::{RenderSettings, run_render_pass};
use rrgchart::domain::rrg::PIVOT;
use rrgchart::domain::session::SessionState;

const US_SECTORS: [&str; 11] = [
    "XLB", "XLC", "XLE", "XLF", "XLI", "XLK", "XLP", "XLRE", "XLU", "XLV", "XLY",
];

fn end() -> chrono::NaiveDate {
    date(2024, 6, 28)
}

fn settings() -> RenderSettings {
    RenderSettings::new(end())
}

fn series(symbol: &str, price: impl Fn(usize) -> f64) -> PriceSeries {
    trading_days(symbol, end(), 600, price)
}

fn us_sectors_port() -> MockPricePort {
    let mut port = MockPricePort::new().with_series(series("^GSPC", flat(4000.0)));
    for (i, symbol) in US_SECTORS.iter().enumerate() {
        let rate = (i as f64 - 5.0) * 0.0004;
        port = port.with_series(series(symbol, growth(rate)));
    }
    port
}

fn state(universe: &str) -> SessionState {
    let mut state = SessionState::default();
    state.universe = universe.to_string();
    state
}

mod fixed_universes {
    use super::*;

    #[test]
    fn us_sectors_plots_every_sector() {
        let port = us_sectors_port();
        let outcome = run_render_pass(&port, &state("US Sectors"), &settings()).unwrap();

        assert_eq!(outcome.universe.benchmark, "^GSPC");
        assert_eq!(outcome.timeframe, Timeframe::Weekly);
        assert_eq!(outcome.chart.traces.len(), 11);
        assert_eq!(outcome.latest.len(), 11);
        assert!(outcome.missing.is_empty());
        assert!(outcome.substituted.is_empty());
        assert_eq!(port.request_count(), 1);

        let labels: Vec<&str> = outcome.chart.traces.iter().map(|t| t.label.as_str()).collect();
        assert!(labels.contains(&"Technology"));
        assert!(labels.contains(&"Real Estate"));
    }

    #[test]
    fn outperformers_sit_right_of_the_pivot() {
        let outcome = run_render_pass(&us_sectors_port(), &state("US Sectors"), &settings()).unwrap();
        // XLB declines against a flat benchmark, XLY rises.
        let reading = |s: &str| outcome.latest.iter().find(|r| r.symbol == s).unwrap();
        assert!(reading("XLB").ratio < PIVOT);
        assert!(!reading("XLB").quadrant.is_strong());
        assert!(reading("XLY").ratio > PIVOT);
        assert!(reading("XLY").quadrant.is_strong());
    }

    #[test]
    fn trace_quadrant_matches_head_coordinates() {
        let outcome = run_render_pass(&us_sectors_port(), &state("US Sectors"), &settings()).unwrap();
        for trace in &outcome.chart.traces {
            let (x, y) = trace.head().unwrap();
            assert_eq!(trace.quadrant, classify(x, y));
            assert_eq!(trace.color, trace.quadrant.color());
        }
    }

    #[test]
    fn tail_length_limits_points() {
        let mut state = state("US Sectors");
        state.set_tail_length(5).unwrap();
        let outcome = run_render_pass(&us_sectors_port(), &state, &settings()).unwrap();
        assert!(outcome.chart.traces.iter().all(|t| t.points.len() == 5));
    }

    #[test]
    fn bounds_contain_pivot_and_respect_clamp() {
        let outcome = run_render_pass(&us_sectors_port(), &state("US Sectors"), &settings()).unwrap();
        let bounds = outcome.bounds();
        let clamp = AxisClamp::default();
        assert!(bounds.contains(PIVOT, PIVOT));
        assert!(bounds.x_min >= clamp.x_floor && bounds.x_max <= clamp.x_ceiling);
        assert!(bounds.y_min >= clamp.y_floor && bounds.y_max <= clamp.y_ceiling);
    }

    #[test]
    fn daily_timeframe_uses_daily_lookback() {
        let mut state = state("US Sectors");
        state.timeframe = Timeframe::Daily;
        let outcome = run_render_pass(&us_sectors_port(), &state, &settings()).unwrap();
        assert_eq!(outcome.start_date, end() - chrono::Duration::days(365));
        assert_eq!(outcome.chart.traces.len(), 11);
        assert!(outcome.chart.title.contains("daily"));
    }

    #[test]
    fn missing_constituents_are_reported_not_fatal() {
        let port = MockPricePort::new()
            .with_series(series("^GSPC", flat(4000.0)))
            .with_series(series("XLK", growth(0.001)))
            .with_series(series("XLE", growth(-0.001)));
        let outcome = run_render_pass(&port, &state("US Sectors"), &settings()).unwrap();

        assert_eq!(outcome.chart.traces.len(), 2);
        assert_eq!(outcome.missing.len(), 9);
        assert!(outcome.missing.contains(&"XLB".to_string()));
        assert!(!outcome.missing.contains(&"XLK".to_string()));
    }

    #[test]
    fn svg_contains_every_plotted_label() {
        let outcome = run_render_pass(&us_sectors_port(), &state("US Sectors"), &settings()).unwrap();
        let svg = render_svg(&outcome.chart);
        assert!(svg.starts_with("<svg"));
        for trace in &outcome.chart.traces {
            assert!(svg.contains(&trace.label), "missing label {}", trace.label);
        }
        for quadrant in Quadrant::ALL {
            assert!(svg.contains(quadrant.name()));
        }
    }
}

mod sub_sectors_and_proxies {
    use super::*;

    fn hk_state(sector: &str) -> SessionState {
        let mut state = state("HK Sectors");
        state.sector = Some(sector.to_string());
        state
    }

    #[test]
    fn unavailable_benchmark_uses_proxy_series() {
        let port = MockPricePort::new()
            .with_series(series("2800.HK", flat(20.0)))
            .with_series(series("0700.HK", growth(0.001)))
            .with_series(series("9988.HK", growth(-0.0005)));
        let outcome = run_render_pass(&port, &hk_state("Technology"), &settings()).unwrap();

        assert_eq!(outcome.universe.benchmark, "^HSI");
        assert_eq!(
            outcome.substituted,
            vec![("^HSI".to_string(), "2800.HK".to_string())]
        );
        assert_eq!(port.request_count(), 2);
        assert_eq!(outcome.chart.traces.len(), 2);

        let tencent = outcome.chart.traces.iter().find(|t| t.symbol == "0700.HK").unwrap();
        assert_eq!(tencent.label, "騰訊控股");
    }

    #[test]
    fn sector_lookup_is_case_insensitive() {
        let port = MockPricePort::new()
            .with_series(series("^HSI", flat(18000.0)))
            .with_series(series("0016.HK", growth(0.0002)));
        let outcome = run_render_pass(&port, &hk_state("properties"), &settings()).unwrap();
        assert_eq!(outcome.chart.traces.len(), 1);
        assert!(outcome.substituted.is_empty());
    }

    #[test]
    fn blank_label_falls_back_to_stripped_symbol() {
        let port = MockPricePort::new()
            .with_series(series("^HSI", flat(18000.0)))
            .with_series(series("0101.HK", growth(0.0002)));
        let outcome = run_render_pass(&port, &hk_state("Properties"), &settings()).unwrap();
        assert_eq!(outcome.chart.traces[0].label, "0101");
    }

    #[test]
    fn missing_sub_sector_is_resolution_error() {
        let result = run_render_pass(&MockPricePort::new(), &state("HK Sectors"), &settings());
        assert!(matches!(result, Err(RrgError::Resolution { .. })));
    }

    #[test]
    fn index_constituent_proxy_is_substituted_too() {
        let port = MockPricePort::new()
            .with_series(series("ACWI", flat(100.0)))
            .with_series(series("2828.HK", growth(0.0003)));
        let outcome = run_render_pass(&port, &state("World Indices"), &settings()).unwrap();
        assert!(outcome.substituted.contains(&("^HSCE".to_string(), "2828.HK".to_string())));
        let trace = outcome.chart.traces.iter().find(|t| t.symbol == "^HSCE").unwrap();
        assert_eq!(trace.label, "國企指數");
    }
}

mod custom_portfolios {
    use super::*;

    #[test]
    fn normalized_tickers_against_chosen_benchmark() {
        let mut state = state("Custom");
        state.set_custom_tickers(["aapl", "700", " msft "]);
        state.custom.benchmark = Some("ACWI".to_string());
        let port = MockPricePort::new()
            .with_series(series("ACWI", flat(100.0)))
            .with_series(series("AAPL", growth(0.001)))
            .with_series(series("0700.HK", growth(0.0005)))
            .with_series(series("MSFT", growth(-0.0002)));
        let outcome = run_render_pass(&port, &state, &settings()).unwrap();

        assert_eq!(outcome.universe.benchmark, "ACWI");
        assert_eq!(
            outcome.universe.constituents,
            vec!["AAPL".to_string(), "0700.HK".to_string(), "MSFT".to_string()]
        );
        let hk = outcome.chart.traces.iter().find(|t| t.symbol == "0700.HK").unwrap();
        assert_eq!(hk.label, "0700");
    }

    #[test]
    fn benchmark_outside_choices_is_rejected() {
        let mut state = state("Custom");
        state.set_custom_tickers(["AAPL"]);
        state.custom.benchmark = Some("QQQ".to_string());
        let result = run_render_pass(&MockPricePort::new(), &state, &settings());
        assert!(matches!(result, Err(RrgError::Resolution { .. })));
    }

    #[test]
    fn empty_portfolio_is_empty_universe_error() {
        let state = state("Custom");
        let result = run_render_pass(&MockPricePort::new(), &state, &settings());
        assert!(matches!(result, Err(RrgError::EmptyUniverse { .. })));
    }

    #[test]
    fn unreachable_preset_list_falls_back_to_builtin() {
        let mut state = state("Custom");
        let lists = MockTickerListPort::new();
        let load = state
            .reset_to_preset(Some("http://lists.invalid/us.txt"), Some(&lists))
            .unwrap();
        assert!(load.warning.unwrap().contains("built-in"));
        assert_eq!(state.custom.tickers.len(), 15);
        assert_eq!(state.custom.tickers[0], "AAPL");

        let port = MockPricePort::new()
            .with_series(series("^GSPC", flat(4000.0)))
            .with_series(series("AAPL", growth(0.001)))
            .with_series(series("NVDA", growth(0.002)));
        let outcome = run_render_pass(&port, &state, &settings()).unwrap();
        assert_eq!(outcome.chart.traces.len(), 2);
        assert_eq!(outcome.missing.len(), 13);
    }

    #[test]
    fn remote_preset_list_is_normalized_and_capped() {
        let mut state = state("Custom");
        state.custom.preset_key = "HK".to_string();
        let many: Vec<String> = (1..=20).map(|n| n.to_string()).collect();
        let refs: Vec<&str> = many.iter().map(String::as_str).collect();
        let lists = MockTickerListPort::new().with_list("http://lists/hk.txt", &refs);

        let load = state.reset_to_preset(Some("http://lists/hk.txt"), Some(&lists)).unwrap();
        assert!(load.warning.is_none());
        assert_eq!(state.custom.tickers.len(), 15);
        assert_eq!(state.custom.tickers[0], "0001.HK");
    }
}

mod failures {
    use super::*;

    #[test]
    fn missing_benchmark_aborts() {
        let port = MockPricePort::new().with_series(series("XLK", growth(0.001)));
        let result = run_render_pass(&port, &state("US Sectors"), &settings());
        assert!(matches!(result, Err(RrgError::BenchmarkMissing { symbol }) if symbol == "^GSPC"));
    }

    #[test]
    fn provider_failure_is_treated_as_missing_data() {
        let port = MockPricePort::new().with_error("connection refused");
        let result = run_render_pass(&port, &state("US Sectors"), &settings());
        assert!(matches!(result, Err(RrgError::BenchmarkMissing { .. })));
    }

    #[test]
    fn no_constituent_data_aborts() {
        let port = MockPricePort::new().with_series(series("^GSPC", flat(4000.0)));
        let result = run_render_pass(&port, &state("US Sectors"), &settings());
        assert!(matches!(result, Err(RrgError::NoValidSymbols)));
    }

    #[test]
    fn short_history_is_insufficient() {
        let port = MockPricePort::new()
            .with_series(trading_days("^GSPC", end(), 100, flat(4000.0)))
            .with_series(trading_days("XLK", end(), 100, growth(0.001)));
        let result = run_render_pass(&port, &state("US Sectors"), &settings());
        assert!(matches!(result, Err(RrgError::InsufficientData { .. })));
    }

    #[test]
    fn zero_benchmark_leaves_nothing_to_plot() {
        let port = MockPricePort::new()
            .with_series(series("^GSPC", flat(0.0)))
            .with_series(series("XLK", growth(0.001)));
        let result = run_render_pass(&port, &state("US Sectors"), &settings());
        assert!(matches!(result, Err(RrgError::InsufficientData { .. })));
    }

    #[test]
    fn unknown_universe_is_resolution_error() {
        let result = run_render_pass(&MockPricePort::new(), &state("Crypto"), &settings());
        assert!(matches!(result, Err(RrgError::Resolution { .. })));
    }
}

mod gaps {
    use super::*;

    // Index counted from the oldest of the 600 trading days; 599 is the end date.
    fn benchmark_with_zero_at(index: usize) -> PriceSeries {
        series("^GSPC", move |i| if i == index { 0.0 } else { 4000.0 })
    }

    fn daily_state() -> SessionState {
        let mut state = state("US Sectors");
        state.timeframe = Timeframe::Daily;
        state
    }

    #[test]
    fn early_zero_benchmark_value_keeps_full_tail() {
        let port = MockPricePort::new()
            .with_series(benchmark_with_zero_at(400))
            .with_series(series("XLK", growth(0.0005)));
        let outcome = run_render_pass(&port, &daily_state(), &settings()).unwrap();

        assert_eq!(outcome.chart.traces.len(), 1);
        let trace = &outcome.chart.traces[0];
        assert_eq!(trace.points.len(), 10);
        let bounds = outcome.bounds();
        for &(x, y) in &trace.points {
            assert!(x.is_finite() && y.is_finite());
            assert!(bounds.contains(x, y));
        }
    }

    #[test]
    fn zero_inside_warmup_of_tail_drops_only_undefined_entries() {
        // The zero poisons 26 ratio entries and 3 more momentum entries,
        // leaving the final 6 entries defined.
        let port = MockPricePort::new()
            .with_series(benchmark_with_zero_at(599 - 34))
            .with_series(series("XLK", growth(0.0005)));
        let outcome = run_render_pass(&port, &daily_state(), &settings()).unwrap();

        let trace = &outcome.chart.traces[0];
        assert_eq!(trace.points.len(), 6);
        let bounds = outcome.bounds();
        assert!(trace.points.iter().all(|&(x, y)| bounds.contains(x, y)));
        let reading = &outcome.latest[0];
        assert_eq!(trace.head(), Some((reading.ratio, reading.momentum)));
    }
}

mod steady_state {
    use super::*;

    #[test]
    fn constant_outperformance_settles_at_pivot() {
        let port = MockPricePort::new()
            .with_series(series("^GSPC", flat(100.0)))
            .with_series(series("XLK", flat(110.0)));
        let outcome = run_render_pass(&port, &state("US Sectors"), &settings()).unwrap();
        let reading = &outcome.latest[0];
        assert_relative_eq!(reading.ratio, 100.0, epsilon = 1e-9);
        assert_relative_eq!(reading.momentum, 100.0, epsilon = 1e-9);
    }
}

proptest! {
    #[test]
    fn classify_agrees_with_axis_sides(ratio in 50.0f64..150.0, momentum in 50.0f64..150.0) {
        let q = classify(ratio, momentum);
        prop_assert_eq!(q.is_strong(), ratio >= PIVOT);
        prop_assert_eq!(q.is_rising(), momentum >= PIVOT);
    }
}
