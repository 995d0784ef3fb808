//! Logging integration for stmt-rs.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`] and for creating per-statement spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug", "info",
/// "`stmt_rs_template=trace`"); an unparseable filter falls back to "info".
/// In debug mode a pretty, human-readable format is used; otherwise a
/// structured JSON format is used.
///
/// Calling this more than once is harmless: if a subscriber is already
/// installed the call does nothing.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for preparing a named statement.
///
/// # Examples
///
/// ```
/// use stmt_rs_core::logging::statement_span;
///
/// let span = statement_span("select-users");
/// let _guard = span.enter();
/// tracing::info!("applying templates");
/// ```
pub fn statement_span(name: &str) -> tracing::Span {
    tracing::info_span!("statement", name = name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_twice_is_harmless() {
        let settings = Settings {
            log_level: "not a [valid filter".to_string(),
            ..Settings::default()
        };
        setup_logging(&settings);
        setup_logging(&Settings::default());
    }

    #[test]
    fn test_statement_span_enter() {
        let span = statement_span("test");
        let _guard = span.enter();
        tracing::debug!("inside statement span");
    }
}
