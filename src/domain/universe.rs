//! Universe resolution.
//!
//! Turns a selection (universe name, optional sub-sector, custom tickers and
//! benchmark) into a concrete benchmark, an ordered constituent list and a
//! display-name map, driven entirely by the catalog table.

use crate::domain::catalog::{self, Constituent, MAX_CUSTOM_TICKERS, Members, UniverseDef};
use crate::domain::error::RrgError;
use crate::domain::ticker::{normalize_all, strip_venue_suffix};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    pub name: String,
    pub benchmark: String,
    pub constituents: Vec<String>,
    pub display_names: HashMap<String, String>,
    pub strip_suffix: bool,
}

impl Universe {
    pub fn count(&self) -> usize {
        self.constituents.len()
    }

    /// Explicit label when non-empty, otherwise the raw symbol (without its
    /// venue suffix for space-constrained universes).
    pub fn display_name(&self, symbol: &str) -> String {
        match self.display_names.get(symbol) {
            Some(label) if !label.trim().is_empty() => label.clone(),
            _ if self.strip_suffix => strip_venue_suffix(symbol).to_string(),
            _ => symbol.to_string(),
        }
    }

    /// Benchmark first, then constituents, without repeats.
    pub fn all_symbols(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        std::iter::once(&self.benchmark)
            .chain(&self.constituents)
            .filter(|s| seen.insert(s.as_str()))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UniverseSelection<'a> {
    pub universe: &'a str,
    pub sector: Option<&'a str>,
    pub custom_tickers: &'a [String],
    pub custom_benchmark: Option<&'a str>,
}

pub fn resolve_universe(selection: &UniverseSelection<'_>) -> Result<Universe, RrgError> {
    let def = catalog::find_universe(selection.universe).ok_or_else(|| RrgError::Resolution {
        reason: format!("unknown universe '{}'", selection.universe),
    })?;
    resolve_def(def, selection)
}

pub fn resolve_def(def: &UniverseDef, selection: &UniverseSelection<'_>) -> Result<Universe, RrgError> {
    let (constituents, display_names) = match def.members {
        Members::Fixed(members) => from_constituents(members),
        Members::BySector(sectors) => {
            let key = selection
                .sector
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| RrgError::Resolution {
                    reason: format!("universe '{}' requires a sub-sector", def.name),
                })?;
            let (_, members) = sectors
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(key))
                .ok_or_else(|| RrgError::Resolution {
                    reason: format!("unknown sub-sector '{}' for universe '{}'", key, def.name),
                })?;
            from_constituents(members)
        }
        Members::Custom => {
            let mut tickers = normalize_all(selection.custom_tickers.iter().map(String::as_str));
            if tickers.len() > MAX_CUSTOM_TICKERS {
                tracing::warn!(
                    count = tickers.len(),
                    limit = MAX_CUSTOM_TICKERS,
                    "custom portfolio truncated"
                );
                tickers.truncate(MAX_CUSTOM_TICKERS);
            }
            (tickers, HashMap::new())
        }
    };

    if constituents.is_empty() {
        return Err(RrgError::EmptyUniverse {
            universe: def.name.to_string(),
        });
    }

    Ok(Universe {
        name: def.name.to_string(),
        benchmark: resolve_benchmark(def, selection.custom_benchmark)?,
        constituents,
        display_names,
        strip_suffix: def.strip_suffix,
    })
}

fn resolve_benchmark(def: &UniverseDef, requested: Option<&str>) -> Result<String, RrgError> {
    let requested = requested.map(str::trim).filter(|s| !s.is_empty());
    match requested {
        None => Ok(def.benchmark.to_string()),
        Some(b) if b == def.benchmark || def.benchmark_choices.contains(&b) => Ok(b.to_string()),
        Some(b) => Err(RrgError::Resolution {
            reason: format!("benchmark '{}' is not available for universe '{}'", b, def.name),
        }),
    }
}

fn from_constituents(members: &[Constituent]) -> (Vec<String>, HashMap<String, String>) {
    let mut seen = HashSet::new();
    let mut symbols = Vec::with_capacity(members.len());
    let mut names = HashMap::new();
    for m in members {
        if seen.insert(m.symbol) {
            symbols.push(m.symbol.to_string());
            names.insert(m.symbol.to_string(), m.label.to_string());
        }
    }
    (symbols, names)
}
