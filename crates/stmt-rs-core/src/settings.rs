//! Settings for the stmt-rs engine.
//!
//! [`Settings`] holds logging configuration and the [`TemplateSettings`] used
//! to build an engine. There is no process-wide settings instance: callers
//! load a value (see [`settings_loader`](crate::settings_loader)) and pass it
//! to whatever needs it.

use serde::{Deserialize, Serialize};

/// Template engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Whether parsed templates are cached by their source text.
    pub cache_enabled: bool,
    /// Maximum number of cached templates. `0` means unbounded.
    pub cache_capacity: usize,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_capacity: 0,
        }
    }
}

/// Top-level configuration.
///
/// # Examples
///
/// ```
/// use stmt_rs_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.log_level, "info");
/// assert!(settings.template.cache_enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether debug mode is enabled. Selects human-readable log output.
    pub debug: bool,
    /// Tracing filter directive (e.g. "info", "`stmt_rs_template=trace`").
    pub log_level: String,
    /// Template engine configuration.
    pub template: TemplateSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
            template: TemplateSettings::default(),
        }
    }
}
