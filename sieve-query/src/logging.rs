//! Logging for Sieve.
//!
//! Sieve emits `tracing` events everywhere and never installs a subscriber
//! on its own. Applications that want Sieve's output without wiring their
//! own subscriber can call [`init`] with the `tracing-subscriber` feature
//! enabled.
//!
//! # Environment Variables
//!
//! - `SIEVE_DEBUG=true|1|yes` - Enable debug logging
//! - `SIEVE_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific level
//! - `SIEVE_LOG_FORMAT=json|pretty|compact` - Output format (default: json)
//!
//! ```rust,no_run
//! use sieve_query::logging;
//!
//! logging::init();
//! ```

use std::env;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

static INIT: Once = Once::new();
static FORCE_DEBUG: AtomicBool = AtomicBool::new(false);

/// Serializes tests that flip the process-wide debug flag.
#[cfg(test)]
pub(crate) static DEBUG_FLAG_LOCK: parking_lot::Mutex<()> = parking_lot::Mutex::new(());

/// Output format of the bundled subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Multi-line, human readable.
    Pretty,
    /// Single-line, human readable.
    Compact,
}

impl LogFormat {
    /// Parse a format name; unknown names fall back to JSON.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "compact" => Self::Compact,
            _ => Self::Json,
        }
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Whether debug logging is on.
    pub debug: bool,
    /// Explicitly requested level, if any.
    pub level: Option<&'static str>,
    /// Output format.
    pub format: LogFormat,
}

impl LogSettings {
    /// Read settings from the `SIEVE_*` environment variables.
    pub fn from_env() -> Self {
        Self::resolve(
            env::var("SIEVE_DEBUG").ok().as_deref(),
            env::var("SIEVE_LOG_LEVEL").ok().as_deref(),
            env::var("SIEVE_LOG_FORMAT").ok().as_deref(),
        )
    }

    /// Resolve settings from raw variable values.
    pub fn resolve(debug: Option<&str>, level: Option<&str>, format: Option<&str>) -> Self {
        Self {
            debug: debug.is_some_and(is_truthy),
            level: level.and_then(parse_level),
            format: format.map(LogFormat::parse).unwrap_or(LogFormat::Json),
        }
    }

    /// The effective level: the explicit one, else `debug` when debugging,
    /// else `warn`.
    pub fn effective_level(&self) -> &'static str {
        match self.level {
            Some(level) => level,
            None if self.debug => "debug",
            None => "warn",
        }
    }

    /// Check if any logging was requested.
    pub fn is_requested(&self) -> bool {
        self.debug || self.level.is_some()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

fn parse_level(value: &str) -> Option<&'static str> {
    match value.trim().to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Check if debug logging is enabled, via `SIEVE_DEBUG` or [`set_debug`].
#[inline]
pub fn is_debug_enabled() -> bool {
    FORCE_DEBUG.load(Ordering::Relaxed)
        || env::var("SIEVE_DEBUG").is_ok_and(|v| is_truthy(&v))
}

/// Turn debug logging on or off regardless of the environment.
///
/// Used by configuration (`[debug] log_filters`).
pub fn set_debug(enabled: bool) {
    FORCE_DEBUG.store(enabled, Ordering::Relaxed);
}

/// Install the bundled subscriber using environment settings.
///
/// Subsequent calls are no-ops. Without the `tracing-subscriber` feature
/// this does nothing and events go to whatever subscriber the application
/// installed.
pub fn init() {
    let mut settings = LogSettings::from_env();
    settings.debug |= FORCE_DEBUG.load(Ordering::Relaxed);
    init_with(settings);
}

/// Install the bundled subscriber with explicit settings.
pub fn init_with(settings: LogSettings) {
    INIT.call_once(|| {
        if !settings.is_requested() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = settings.effective_level();
            let directives = format!("sieve={level},sieve_query={level},sieve_crud={level}");
            let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"));

            let installed = match settings.format {
                LogFormat::Json => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json())
                    .try_init(),
                LogFormat::Compact => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact())
                    .try_init(),
                LogFormat::Pretty => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty())
                    .try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level = level,
                    format = ?settings.format,
                    "sieve logging initialized"
                );
            }
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        let _ = settings;
    });
}

/// Debug event, emitted only when debug logging is enabled.
#[macro_export]
macro_rules! sieve_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            ::tracing::debug!($($arg)*);
        }
    };
}

/// Trace event, emitted only when debug logging is enabled.
#[macro_export]
macro_rules! sieve_trace {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            ::tracing::trace!($($arg)*);
        }
    };
}
