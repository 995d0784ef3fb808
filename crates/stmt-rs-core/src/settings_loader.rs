//! Settings loading from configuration files.
//!
//! Provides functions to load [`Settings`] from TOML files, JSON files, and to
//! apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `STMT_DEBUG` | `debug` |
//! | `STMT_LOG_LEVEL` | `log_level` |
//! | `STMT_TEMPLATE_CACHE_ENABLED` | `template.cache_enabled` |
//! | `STMT_TEMPLATE_CACHE_CAPACITY` | `template.cache_capacity` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use stmt_rs_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/stmt.toml").unwrap();
//! let settings = settings_loader::from_json_file_with_env("config/stmt.json").unwrap();
//! ```

use std::path::Path;

use crate::error::StatementError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Keys not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns a `ConfigurationError` if the TOML is malformed or does not match
/// the settings schema.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, StatementError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| StatementError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, StatementError> {
    from_toml_str(&read_config(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, StatementError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns a `ConfigurationError` if the JSON is malformed or does not match
/// the settings schema.
pub fn from_json_str(json_str: &str) -> Result<Settings, StatementError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| StatementError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, StatementError> {
    from_json_str(&read_config(path.as_ref(), "JSON")?)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, StatementError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// Boolean variables accept "true", "1" or "yes" (case-insensitive) as true.
/// Unparseable numeric values are ignored.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

fn apply_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("STMT_DEBUG") {
        settings.debug = parse_flag(&val);
    }

    if let Some(val) = var("STMT_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = var("STMT_TEMPLATE_CACHE_ENABLED") {
        settings.template.cache_enabled = parse_flag(&val);
    }

    if let Some(val) = var("STMT_TEMPLATE_CACHE_CAPACITY") {
        if let Ok(capacity) = val.trim().parse::<usize>() {
            settings.template.cache_capacity = capacity;
        }
    }
}

fn parse_flag(val: &str) -> bool {
    matches!(val.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

// ============================================================
// Helpers
// ============================================================

fn read_config(path: &Path, format: &str) -> Result<String, StatementError> {
    std::fs::read_to_string(path).map_err(|e| {
        StatementError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(
    value: serde_json::Value,
    format: &str,
) -> Result<Settings, StatementError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        StatementError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        StatementError::ConfigurationError(format!(
            "Failed to deserialize settings from {format}: {e}"
        ))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = true
            log_level = "debug"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(settings.debug);
        assert_eq!(settings.log_level, "debug");
        // Defaults preserved
        assert!(settings.template.cache_enabled);
    }

    #[test]
    fn test_from_toml_str_template_table() {
        let toml = r"
            [template]
            cache_capacity = 128
        ";

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.template.cache_capacity, 128);
        assert!(settings.template.cache_enabled);
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("[[invalid toml content");
        assert!(matches!(result, Err(StatementError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("debug = \"sometimes\"");
        assert!(result.is_err());
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_nested() {
        let json = r#"{"template": {"cache_enabled": false}}"#;
        let settings = from_json_str(json).unwrap();
        assert!(!settings.template.cache_enabled);
        assert_eq!(settings.template.cache_capacity, 0);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{not json").is_err());
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = from_json_file("/definitely/not/here/stmt.json");
        assert!(matches!(result, Err(StatementError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_toml_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("stmt-rs-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("stmt.toml");
        std::fs::write(&path, "log_level = \"warn\"\n").unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert_eq!(settings.log_level, "warn");

        std::fs::remove_dir_all(&dir).ok();
    }

    // ── Environment overrides ───────────────────────────────────────

    #[test]
    fn test_apply_overrides() {
        let vars: HashMap<&str, &str> = [
            ("STMT_DEBUG", "YES"),
            ("STMT_LOG_LEVEL", "trace"),
            ("STMT_TEMPLATE_CACHE_ENABLED", "0"),
            ("STMT_TEMPLATE_CACHE_CAPACITY", " 16 "),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        apply_overrides(&mut settings, |key| vars.get(key).map(ToString::to_string));

        assert!(settings.debug);
        assert_eq!(settings.log_level, "trace");
        assert!(!settings.template.cache_enabled);
        assert_eq!(settings.template.cache_capacity, 16);
    }

    #[test]
    fn test_apply_overrides_ignores_bad_capacity() {
        let mut settings = Settings::default();
        settings.template.cache_capacity = 8;
        apply_overrides(&mut settings, |key| {
            (key == "STMT_TEMPLATE_CACHE_CAPACITY").then(|| "lots".to_string())
        });
        assert_eq!(settings.template.cache_capacity, 8);
    }

    // ── Helpers ─────────────────────────────────────────────────────

    #[test]
    fn test_merge_json_deep() {
        let base = serde_json::json!({"a": {"b": 1, "c": 2}, "d": 3});
        let over = serde_json::json!({"a": {"c": 5}});
        let merged = merge_json(base, over);
        assert_eq!(merged, serde_json::json!({"a": {"b": 1, "c": 5}, "d": 3}));
    }

    #[test]
    fn test_toml_to_json_array() {
        let value: toml::Value = toml::from_str("xs = [1, 2]").unwrap();
        assert_eq!(toml_to_json(value), serde_json::json!({"xs": [1, 2]}));
    }
}
