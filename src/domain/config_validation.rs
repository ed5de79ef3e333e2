//! Configuration validation.
//!
//! Validates every config field before a render pass runs.

use crate::domain::bounds::AxisClamp;
use crate::domain::catalog;
use crate::domain::error::RrgError;
use crate::domain::price::Timeframe;
use crate::domain::render::{DEFAULT_LOOKBACK_DAYS_DAILY, DEFAULT_LOOKBACK_DAYS_WEEKLY};
use crate::domain::rrg::PIVOT;
use crate::domain::session::{DEFAULT_TAIL_LENGTH, MAX_TAIL_LENGTH, MIN_TAIL_LENGTH};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const PROVIDERS: &[&str] = &["csv", "yahoo"];
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

pub fn validate_rrg_config(config: &dyn ConfigPort) -> Result<(), RrgError> {
    validate_data_config(config)?;
    validate_chart_config(config)?;
    validate_custom_config(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), RrgError> {
    validate_provider(config)?;
    parse_end_date(config)?;
    validate_lookback(config, "lookback_days_daily", DEFAULT_LOOKBACK_DAYS_DAILY)?;
    validate_lookback(config, "lookback_days_weekly", DEFAULT_LOOKBACK_DAYS_WEEKLY)?;
    Ok(())
}

pub fn validate_chart_config(config: &dyn ConfigPort) -> Result<(), RrgError> {
    parse_timeframe(config)?;
    validate_tail_length(config)?;
    axis_clamp(config)?;
    Ok(())
}

pub fn validate_custom_config(config: &dyn ConfigPort) -> Result<(), RrgError> {
    if let Some(preset) = non_blank(config, "custom", "preset") {
        if catalog::find_preset(&preset).is_none() {
            return Err(invalid(
                "custom",
                "preset",
                format!("unknown preset '{}'", preset),
            ));
        }
    }
    if let Some(benchmark) = non_blank(config, "custom", "benchmark") {
        if !catalog::CUSTOM_BENCHMARKS.contains(&benchmark.as_str()) {
            return Err(invalid(
                "custom",
                "benchmark",
                format!(
                    "benchmark must be one of {}",
                    catalog::CUSTOM_BENCHMARKS.join(", ")
                ),
            ));
        }
    }
    Ok(())
}

/// Trimmed value, `None` when absent or blank.
pub fn non_blank(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, reason: String) -> RrgError {
    RrgError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}

fn validate_provider(config: &dyn ConfigPort) -> Result<(), RrgError> {
    let provider = non_blank(config, "data", "provider").unwrap_or_else(|| "csv".to_string());
    if !PROVIDERS.contains(&provider.to_lowercase().as_str()) {
        return Err(invalid(
            "data",
            "provider",
            format!("unknown provider '{}' (expected csv or yahoo)", provider),
        ));
    }
    Ok(())
}

fn validate_lookback(config: &dyn ConfigPort, key: &str, default: i64) -> Result<(), RrgError> {
    lookback_days(config, key, default).map(|_| ())
}

/// `[data] <key>` in days, between 1 and `MAX_LOOKBACK_DAYS`.
pub fn lookback_days(config: &dyn ConfigPort, key: &str, default: i64) -> Result<i64, RrgError> {
    let value = config.get_int("data", key, default);
    if !(1..=MAX_LOOKBACK_DAYS).contains(&value) {
        return Err(invalid(
            "data",
            key,
            format!("{} must be between 1 and {}", key, MAX_LOOKBACK_DAYS),
        ));
    }
    Ok(value)
}

fn validate_tail_length(config: &dyn ConfigPort) -> Result<(), RrgError> {
    let value = config.get_int("chart", "tail_length", DEFAULT_TAIL_LENGTH as i64);
    if value < MIN_TAIL_LENGTH as i64 || value > MAX_TAIL_LENGTH as i64 {
        return Err(invalid(
            "chart",
            "tail_length",
            format!(
                "tail_length must be between {} and {}",
                MIN_TAIL_LENGTH, MAX_TAIL_LENGTH
            ),
        ));
    }
    Ok(())
}

/// `end_date` when set; `None` means "today".
pub fn parse_end_date(config: &dyn ConfigPort) -> Result<Option<NaiveDate>, RrgError> {
    match non_blank(config, "data", "end_date") {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d").map(Some).map_err(|_| {
            invalid(
                "data",
                "end_date",
                "invalid end_date format, expected YYYY-MM-DD".to_string(),
            )
        }),
    }
}

pub fn parse_timeframe(config: &dyn ConfigPort) -> Result<Timeframe, RrgError> {
    match non_blank(config, "chart", "timeframe") {
        None => Ok(Timeframe::default()),
        Some(s) => s.parse().map_err(|reason| invalid("chart", "timeframe", reason)),
    }
}

/// Axis limits from `[chart]`, each floor strictly below the pivot and each
/// ceiling strictly above it.
pub fn axis_clamp(config: &dyn ConfigPort) -> Result<AxisClamp, RrgError> {
    let defaults = AxisClamp::default();
    let clamp = AxisClamp {
        x_floor: config.get_double("chart", "x_floor", defaults.x_floor),
        x_ceiling: config.get_double("chart", "x_ceiling", defaults.x_ceiling),
        y_floor: config.get_double("chart", "y_floor", defaults.y_floor),
        y_ceiling: config.get_double("chart", "y_ceiling", defaults.y_ceiling),
    };

    for (key, value) in [("x_floor", clamp.x_floor), ("y_floor", clamp.y_floor)] {
        if !value.is_finite() || value >= PIVOT {
            return Err(invalid("chart", key, format!("{} must be below 100", key)));
        }
    }
    for (key, value) in [("x_ceiling", clamp.x_ceiling), ("y_ceiling", clamp.y_ceiling)] {
        if !value.is_finite() || value <= PIVOT {
            return Err(invalid("chart", key, format!("{} must be above 100", key)));
        }
    }
    Ok(clamp)
}
