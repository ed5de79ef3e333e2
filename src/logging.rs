//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr so stdout stays reserved for command output.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub log_level: String,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            ansi: true,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("RUST_LOG").ok(),
            std::env::var_os("NO_COLOR").is_some(),
        )
    }

    fn from_vars(rust_log: Option<String>, no_color: bool) -> Self {
        Self {
            log_level: rust_log
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            ansi: !no_color,
        }
    }

    /// With `-v` flags given, raises the level unless `RUST_LOG` was explicit.
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        if self.log_level == DEFAULT_LOG_LEVEL {
            self.log_level = match verbose {
                0 => DEFAULT_LOG_LEVEL,
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
            .to_string();
        }
        self
    }
}

pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_new(&config.log_level)?;
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.ansi)
                .with_target(false),
        )
        .try_init()?;
    Ok(())
}
