//! Logging setup for Relink.
//!
//! Relink emits `tracing` events everywhere; this module only decides
//! whether and how a subscriber is installed. Settings come from:
//!
//! - `RELINK_DEBUG` (`true`, `1` or `yes`) turns debug output on
//! - `RELINK_LOG_LEVEL` picks `error`, `warn`, `info`, `debug` or `trace`
//! - `RELINK_LOG_FORMAT` picks `json` (default), `pretty` or `compact`
//!
//! ```rust,no_run
//! use relink_query::logging::{self, LogFormat, LogSettings};
//!
//! let settings = LogSettings::from_env();
//! assert!(matches!(settings.format, LogFormat::Json | LogFormat::Pretty | LogFormat::Compact));
//!
//! logging::init();
//! ```
//!
//! Installing a subscriber needs the `tracing-subscriber` feature; without it
//! the application brings its own.

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `RELINK_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("RELINK_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line, human readable.
    Pretty,
    /// Single line per event.
    Compact,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "compact" => Self::Compact,
            _ => Self::Json,
        }
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Maximum level for Relink's own targets, `None` when logging is off.
    pub level: Option<&'static str>,
    /// Output format.
    pub format: LogFormat,
}

impl LogSettings {
    /// Read the settings from the environment.
    pub fn from_env() -> Self {
        let requested = env::var("RELINK_LOG_LEVEL").ok();
        let level = match requested.as_deref().and_then(parse_level) {
            Some(level) => Some(level),
            None if is_debug_enabled() => Some("debug"),
            // an unrecognized level still asks for output
            None if requested.is_some() => Some("warn"),
            None => None,
        };

        Self {
            level,
            format: env::var("RELINK_LOG_FORMAT")
                .map(|f| LogFormat::parse(&f))
                .unwrap_or_default(),
        }
    }

    /// Override the level.
    pub fn with_level(mut self, level: &str) -> Self {
        self.level = Some(parse_level(level).unwrap_or("warn"));
        self
    }

    /// The `EnvFilter` directive covering the Relink crates.
    pub fn filter_directive(&self) -> Option<String> {
        self.level.map(|level| {
            ["relink", "relink_query", "relink_memory"]
                .iter()
                .map(|target| format!("{}={}", target, level))
                .collect::<Vec<_>>()
                .join(",")
        })
    }
}

fn parse_level(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Install a subscriber configured from the environment.
///
/// Does nothing unless `RELINK_DEBUG` or `RELINK_LOG_LEVEL` is set. Only the
/// first call of `init`, `init_with_level` or `init_debug` has an effect.
pub fn init() {
    install(LogSettings::from_env());
}

/// Install a subscriber at the given level, whatever the environment says.
pub fn init_with_level(level: &str) {
    install(LogSettings::from_env().with_level(level));
}

/// Install a subscriber at debug level.
pub fn init_debug() {
    init_with_level("debug");
}

fn install(settings: LogSettings) {
    INIT.call_once(|| {
        let Some(directive) = settings.filter_directive() else {
            return;
        };

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
            let registry = tracing_subscriber::registry().with(filter);
            match settings.format {
                LogFormat::Json => registry.with(fmt::layer().json()).init(),
                LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
                LogFormat::Compact => registry.with(fmt::layer().compact()).init(),
            }
        }

        tracing::info!(filter = %directive, format = ?settings.format, "Relink logging initialized");
    });
}

/// Debug logging that only fires when `RELINK_DEBUG` is enabled at runtime.
#[macro_export]
macro_rules! relink_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::debug!($($arg)*);
        }
    };
}

/// Trace logging that only fires when `RELINK_DEBUG` is enabled at runtime.
#[macro_export]
macro_rules! relink_trace {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::trace!($($arg)*);
        }
    };
}
