//! Domain error types.

/// Top-level error type for rrgchart.
///
/// Terminal variants end a render pass; `Fetch` and `TickerList` are absorbed
/// at their boundaries and only surface when a caller asks for them directly.
#[derive(Debug, thiserror::Error)]
pub enum RrgError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("cannot resolve universe: {reason}")]
    Resolution { reason: String },

    #[error("universe {universe} has no constituents")]
    EmptyUniverse { universe: String },

    #[error("benchmark {symbol} is missing from fetched data")]
    BenchmarkMissing { symbol: String },

    #[error("no valid symbols remain after fetch")]
    NoValidSymbols,

    #[error("insufficient data: {reason}")]
    InsufficientData { reason: String },

    #[error("price fetch failed: {reason}")]
    Fetch { reason: String },

    #[error("ticker list fetch from {url} failed: {reason}")]
    TickerList { url: String, reason: String },

    #[error("chart render failed: {reason}")]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&RrgError> for std::process::ExitCode {
    fn from(err: &RrgError) -> Self {
        let code: u8 = match err {
            RrgError::Io(_) | RrgError::Render { .. } => 1,
            RrgError::ConfigParse { .. }
            | RrgError::ConfigMissing { .. }
            | RrgError::ConfigInvalid { .. } => 2,
            RrgError::Resolution { .. } | RrgError::EmptyUniverse { .. } => 3,
            RrgError::BenchmarkMissing { .. }
            | RrgError::NoValidSymbols
            | RrgError::InsufficientData { .. } => 4,
            RrgError::Fetch { .. } | RrgError::TickerList { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
