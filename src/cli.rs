//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::catalog::{self, Members, UniverseKind};
use crate::domain::config_validation::{
    axis_clamp, lookback_days, non_blank, parse_end_date, parse_timeframe, validate_rrg_config,
};
use crate::domain::error::RrgError;
use crate::domain::render::{
    DEFAULT_LOOKBACK_DAYS_DAILY, DEFAULT_LOOKBACK_DAYS_WEEKLY, LatestReading, RenderOutcome,
    RenderSettings, run_render_pass,
};
use crate::domain::session::{DEFAULT_TAIL_LENGTH, SessionState};
use crate::domain::ticker::parse_ticker_inputs;
use crate::domain::universe::resolve_universe;
use crate::ports::chart_port::ChartPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::ticker_list_port::TickerListPort;

pub const DEFAULT_OUTPUT: &str = "rrg.svg";
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(name = "rrgchart", about = "Relative Rotation Graph charts")]
pub struct Cli {
    /// Increase diagnostic output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a rotation chart to SVG
    Render(RenderArgs),
    /// List built-in universes and their sub-sectors
    Universes,
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the normalized form of each ticker
    Normalize {
        #[arg(required = true)]
        tickers: Vec<String>,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct RenderArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long)]
    pub universe: Option<String>,
    #[arg(short, long)]
    pub sector: Option<String>,
    #[arg(short, long)]
    pub timeframe: Option<String>,
    /// Tail length in periods (1-52)
    #[arg(long)]
    pub tail: Option<usize>,
    /// Comma-separated custom tickers, e.g. "aapl,msft,700"
    #[arg(long)]
    pub tickers: Option<String>,
    /// Preset used when no custom tickers are given (US, HK)
    #[arg(long)]
    pub preset: Option<String>,
    #[arg(short, long)]
    pub benchmark: Option<String>,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// csv or yahoo
    #[arg(long)]
    pub provider: Option<String>,
    /// Last date of the window (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Csv,
    Yahoo,
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Provider::Csv),
            "yahoo" => Ok(Provider::Yahoo),
            other => Err(format!("unknown provider '{}' (expected csv or yahoo)", other)),
        }
    }
}

/// Everything a render needs, after config and flags are merged.
#[derive(Debug, Clone)]
pub struct RenderPlan {
    pub state: SessionState,
    pub settings: RenderSettings,
    pub provider: Provider,
    pub data_dir: PathBuf,
    pub output: PathBuf,
    pub preset_url: Option<String>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Render(args) => run_render(&args),
        Command::Universes => {
            print!("{}", format_universes());
            ExitCode::SUCCESS
        }
        Command::Validate { config } => run_validate(&config),
        Command::Normalize { tickers } => run_normalize(&tickers),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn empty_config() -> Result<FileConfigAdapter, RrgError> {
    FileConfigAdapter::from_string("").map_err(|reason| RrgError::ConfigParse {
        file: "<defaults>".to_string(),
        reason,
    })
}

fn run_render(args: &RenderArgs) -> ExitCode {
    // Stage 1: Load config
    let adapter = match &args.config {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(a) => a,
                Err(code) => return code,
            }
        }
        None => match empty_config() {
            Ok(a) => a,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
    };

    // Stage 2: Validate config and merge flags
    if let Err(e) = validate_rrg_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let today = chrono::Local::now().date_naive();
    let ticker_lists = match ticker_list_port() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let (plan, warnings) = match build_render_plan(&adapter, args, today, ticker_lists.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    // Stage 3: Build price provider
    let price_port = match make_price_port(&plan) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Rendering {} ({}, tail {}) through {}",
        plan.state.universe,
        plan.state.timeframe,
        plan.state.tail_length(),
        plan.settings.end_date
    );

    // Stage 4: Render pass
    let outcome = match run_render_pass(price_port.as_ref(), &plan.state, &plan.settings) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Write chart and report
    if let Err(e) = SvgChartAdapter::new().render(&outcome.chart, &plan.output) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    report_outcome(&outcome);
    print!("{}", format_latest_table(&outcome.latest));
    eprintln!("Chart written to {}", plan.output.display());
    ExitCode::SUCCESS
}

fn report_outcome(outcome: &RenderOutcome) {
    for (original, proxy) in &outcome.substituted {
        eprintln!("note: {original} unavailable, using {proxy} data");
    }
    if !outcome.missing.is_empty() {
        eprintln!(
            "warning: no data for {} symbol(s): {}",
            outcome.missing.len(),
            outcome.missing.join(", ")
        );
    }
    eprintln!(
        "{} of {} constituents plotted ({} to {})",
        outcome.chart.traces.len(),
        outcome.universe.count(),
        outcome.start_date,
        outcome.end_date
    );
}

/// Merges `[data]`, `[chart]` and `[custom]` with command-line overrides.
/// Returns the plan and any non-fatal warnings raised while loading presets.
pub fn build_render_plan(
    config: &dyn ConfigPort,
    args: &RenderArgs,
    today: NaiveDate,
    ticker_lists: Option<&dyn TickerListPort>,
) -> Result<(RenderPlan, Vec<String>), RrgError> {
    let invalid = |key: &str, reason: String| RrgError::ConfigInvalid {
        section: "chart".to_string(),
        key: key.to_string(),
        reason,
    };

    let mut state = SessionState::default();
    if let Some(universe) = pick(args.universe.as_deref(), non_blank(config, "chart", "universe")) {
        state.universe = universe;
    }
    state.sector = pick(args.sector.as_deref(), non_blank(config, "chart", "sector"));
    state.timeframe = match args.timeframe.as_deref() {
        Some(s) => s.parse().map_err(|reason| invalid("timeframe", reason))?,
        None => parse_timeframe(config)?,
    };
    let tail = match args.tail {
        Some(t) => t,
        None => usize::try_from(config.get_int("chart", "tail_length", DEFAULT_TAIL_LENGTH as i64))
            .map_err(|_| invalid("tail_length", "tail_length must be positive".to_string()))?,
    };
    state.set_tail_length(tail)?;

    state.custom.benchmark = pick(args.benchmark.as_deref(), non_blank(config, "custom", "benchmark"));
    if let Some(preset) = pick(args.preset.as_deref(), non_blank(config, "custom", "preset")) {
        state.custom.preset_key = preset;
    }
    let raw_tickers = pick(args.tickers.as_deref(), non_blank(config, "custom", "tickers"))
        .map(|t| parse_ticker_inputs(&t))
        .unwrap_or_default();
    state.set_custom_tickers(raw_tickers.iter().map(String::as_str));

    let preset_url = non_blank(
        config,
        "custom",
        &format!("preset_url_{}", state.custom.preset_key.to_lowercase()),
    );

    let mut warnings = Vec::new();
    let is_custom = catalog::find_universe(&state.universe)
        .is_some_and(|u| u.kind == UniverseKind::Custom);
    if is_custom && state.custom.tickers.is_empty() {
        let load = state.reset_to_preset(preset_url.as_deref(), ticker_lists)?;
        warnings.extend(load.warning);
    }

    let end_date = match args.end_date.as_deref() {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| RrgError::ConfigInvalid {
            section: "data".to_string(),
            key: "end_date".to_string(),
            reason: "invalid end_date format, expected YYYY-MM-DD".to_string(),
        })?,
        None => parse_end_date(config)?.unwrap_or(today),
    };
    let settings = RenderSettings {
        clamp: axis_clamp(config)?,
        lookback_days_daily: lookback_days(config, "lookback_days_daily", DEFAULT_LOOKBACK_DAYS_DAILY)?,
        lookback_days_weekly: lookback_days(config, "lookback_days_weekly", DEFAULT_LOOKBACK_DAYS_WEEKLY)?,
        ..RenderSettings::new(end_date)
    };

    let provider_name = pick(args.provider.as_deref(), non_blank(config, "data", "provider"))
        .unwrap_or_else(|| "csv".to_string());
    let provider = provider_name.parse().map_err(|reason| RrgError::ConfigInvalid {
        section: "data".to_string(),
        key: "provider".to_string(),
        reason,
    })?;

    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| non_blank(config, "data", "data_dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let output = args
        .output
        .clone()
        .or_else(|| non_blank(config, "chart", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    Ok((
        RenderPlan {
            state,
            settings,
            provider,
            data_dir,
            output,
            preset_url,
        },
        warnings,
    ))
}

/// Flag value when given and non-blank, otherwise the config value.
fn pick(flag: Option<&str>, config: Option<String>) -> Option<String> {
    flag.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or(config)
}

pub fn make_price_port(plan: &RenderPlan) -> Result<Box<dyn PricePort>, RrgError> {
    match plan.provider {
        Provider::Csv => Ok(Box::new(CsvAdapter::new(plan.data_dir.clone()))),
        #[cfg(feature = "remote")]
        Provider::Yahoo => Ok(Box::new(crate::adapters::yahoo_adapter::YahooAdapter::new()?)),
        #[cfg(not(feature = "remote"))]
        Provider::Yahoo => Err(RrgError::ConfigInvalid {
            section: "data".to_string(),
            key: "provider".to_string(),
            reason: "remote feature is required for the yahoo provider".to_string(),
        }),
    }
}

#[cfg(feature = "remote")]
fn ticker_list_port() -> Result<Option<Box<dyn TickerListPort>>, RrgError> {
    use crate::adapters::http_ticker_list_adapter::HttpTickerListAdapter;
    Ok(Some(Box::new(HttpTickerListAdapter::new()?)))
}

#[cfg(not(feature = "remote"))]
fn ticker_list_port() -> Result<Option<Box<dyn TickerListPort>>, RrgError> {
    Ok(None)
}

pub fn format_latest_table(latest: &[LatestReading]) -> String {
    let header = format!(
        "{:<12} {:<20} {:>9} {:>9}  {}\n",
        "SYMBOL", "NAME", "RS-RATIO", "RS-MOM", "QUADRANT"
    );
    latest.iter().fold(header, |mut out, r| {
        out.push_str(&format!(
            "{:<12} {:<20} {:>9.2} {:>9.2}  {}\n",
            r.symbol, r.label, r.ratio, r.momentum, r.quadrant
        ));
        out
    })
}

pub fn format_universes() -> String {
    let mut lines = Vec::new();
    for u in catalog::UNIVERSES {
        let members = match u.members {
            Members::Fixed(list) => format!("{} constituents", list.len()),
            Members::BySector(sectors) => format!("{} sub-sectors", sectors.len()),
            Members::Custom => format!("up to {} tickers", catalog::MAX_CUSTOM_TICKERS),
        };
        lines.push(format!("{} (benchmark {}, {})", u.name, u.benchmark, members));
        lines.extend(u.sector_keys().into_iter().map(|key| format!("  sector: {}", key)));
        if !u.benchmark_choices.is_empty() {
            lines.push(format!("  benchmarks: {}", u.benchmark_choices.join(", ")));
        }
    }
    for preset in catalog::PRESETS {
        lines.push(format!("preset {}: {}", preset.key, preset.tickers.join(", ")));
    }
    lines.push(String::new());
    lines.join("\n")
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_rrg_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Preset URLs are not fetched while validating.
    let today = chrono::Local::now().date_naive();
    let (plan, _) = match build_render_plan(&adapter, &RenderArgs::default(), today, None) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match resolve_universe(&plan.state.selection()) {
        Ok(universe) => {
            eprintln!(
                "  Universe:  {} ({} constituents vs {})",
                universe.name,
                universe.count(),
                universe.benchmark
            );
        }
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }
    eprintln!("  Timeframe: {}", plan.state.timeframe);
    eprintln!("  Tail:      {}", plan.state.tail_length());
    match plan.settings.start_date(plan.state.timeframe) {
        Ok(start) => eprintln!("  Window:    {} to {}", start, plan.settings.end_date),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }
    eprintln!("  Provider:  {:?}", plan.provider);
    eprintln!("  Output:    {}", plan.output.display());

    eprintln!("\nConfiguration is valid");
    ExitCode::SUCCESS
}

/// Each argument may itself be a comma-separated list.
pub fn normalize_inputs(inputs: &[String]) -> Vec<String> {
    parse_ticker_inputs(&inputs.join(","))
}

fn run_normalize(inputs: &[String]) -> ExitCode {
    let tickers = normalize_inputs(inputs);
    if tickers.is_empty() {
        eprintln!("error: no tickers given");
        return ExitCode::from(2);
    }
    for ticker in &tickers {
        println!("{}", ticker);
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::Timeframe;
    use crate::domain::quadrant::Quadrant;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    #[test]
    fn plan_defaults_without_config() {
        let (plan, warnings) = build_render_plan(&config(""), &RenderArgs::default(), today(), None).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(plan.state.universe, "US Sectors");
        assert_eq!(plan.state.timeframe, Timeframe::Weekly);
        assert_eq!(plan.state.tail_length(), DEFAULT_TAIL_LENGTH);
        assert_eq!(plan.settings.end_date, today());
        assert_eq!(plan.provider, Provider::Csv);
        assert_eq!(plan.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(plan.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    }

    #[test]
    fn flags_override_config() {
        let cfg = config("[chart]\nuniverse = FX\ntail_length = 5\ntimeframe = weekly\n[data]\nend_date = 2024-01-31\n");
        let args = RenderArgs {
            universe: Some("HK Sectors".into()),
            sector: Some("Technology".into()),
            timeframe: Some("daily".into()),
            tail: Some(20),
            end_date: Some("2024-03-29".into()),
            ..Default::default()
        };
        let (plan, _) = build_render_plan(&cfg, &args, today(), None).unwrap();
        assert_eq!(plan.state.universe, "HK Sectors");
        assert_eq!(plan.state.sector.as_deref(), Some("Technology"));
        assert_eq!(plan.state.timeframe, Timeframe::Daily);
        assert_eq!(plan.state.tail_length(), 20);
        assert_eq!(plan.settings.end_date, NaiveDate::from_ymd_opt(2024, 3, 29).unwrap());
    }

    #[test]
    fn config_end_date_and_clamp_are_used() {
        let cfg = config("[data]\nend_date = 2024-01-31\n[chart]\nx_floor = 80\n");
        let (plan, _) = build_render_plan(&cfg, &RenderArgs::default(), today(), None).unwrap();
        assert_eq!(plan.settings.end_date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(plan.settings.clamp.x_floor, 80.0);
    }

    #[test]
    fn custom_tickers_are_normalized() {
        let cfg = config("[chart]\nuniverse = Custom\n[custom]\ntickers = aapl, 700\nbenchmark = ^HSI\n");
        let (plan, warnings) = build_render_plan(&cfg, &RenderArgs::default(), today(), None).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(plan.state.custom.tickers, vec!["AAPL", "0700.HK"]);
        assert_eq!(plan.state.custom.benchmark.as_deref(), Some("^HSI"));
    }

    #[test]
    fn empty_custom_falls_back_to_preset() {
        let cfg = config("[chart]\nuniverse = Custom\n[custom]\npreset = HK\npreset_url_HK = http://lists/hk.txt\n");
        let (plan, warnings) = build_render_plan(&cfg, &RenderArgs::default(), today(), None).unwrap();
        assert_eq!(plan.preset_url.as_deref(), Some("http://lists/hk.txt"));
        assert_eq!(plan.state.custom.tickers[0], "0700.HK");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn bad_overrides_are_config_errors() {
        let args = RenderArgs {
            tail: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            build_render_plan(&config(""), &args, today(), None),
            Err(RrgError::ConfigInvalid { key, .. }) if key == "tail_length"
        ));

        let args = RenderArgs {
            timeframe: Some("hourly".into()),
            ..Default::default()
        };
        assert!(build_render_plan(&config(""), &args, today(), None).is_err());

        let args = RenderArgs {
            provider: Some("ftp".into()),
            ..Default::default()
        };
        assert!(matches!(
            build_render_plan(&config(""), &args, today(), None),
            Err(RrgError::ConfigInvalid { key, .. }) if key == "provider"
        ));
    }

    #[test]
    fn latest_table_lists_every_reading() {
        let table = format_latest_table(&[LatestReading {
            symbol: "XLK".into(),
            label: "Technology".into(),
            ratio: 101.234,
            momentum: 99.5,
            quadrant: Quadrant::Weakening,
        }]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("SYMBOL"));
        assert!(lines[1].contains("101.23"));
        assert!(lines[1].contains("99.50"));
        assert!(lines[1].ends_with("Weakening"));
    }

    #[test]
    fn universes_listing_includes_sub_sectors() {
        let listing = format_universes();
        assert!(listing.contains("US Sectors (benchmark ^GSPC, 11 constituents)"));
        assert!(listing.contains("  sector: Energy & Utilities"));
        assert!(listing.contains("  benchmarks: ACWI, ^GSPC, ^HSI"));
        assert!(listing.contains("preset HK:"));
    }

    #[test]
    fn provider_parses() {
        assert_eq!("Yahoo".parse::<Provider>().unwrap(), Provider::Yahoo);
        assert!("sqlite".parse::<Provider>().is_err());
    }

    #[test]
    fn normalize_inputs_splits_and_normalizes_once() {
        let inputs = vec!["aapl, 700".to_string(), "0700.HK".to_string(), "brk.b".to_string()];
        assert_eq!(normalize_inputs(&inputs), vec!["AAPL", "0700.HK", "brk.b"]);
        assert!(normalize_inputs(&[" , ".to_string()]).is_empty());
    }

    #[test]
    fn oversized_lookback_is_rejected_when_planning() {
        let result = build_render_plan(
            &config("[data]\nlookback_days_daily = 99999999\n"),
            &RenderArgs::default(),
            today(),
            None,
        );
        assert!(matches!(result, Err(RrgError::ConfigInvalid { key, .. }) if key == "lookback_days_daily"));
    }
}
