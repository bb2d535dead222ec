//! SettingsManager: environment-backed settings with defaults and validation.

use std::collections::HashMap;

use super::defaults::DEFAULT_SETTINGS;
use super::validation::validate_setting;

/// Resolved setting values for every known key.
pub struct SettingsManager {
    values: HashMap<String, String>,
}

impl SettingsManager {
    /// Snapshot every known setting from the process environment.
    pub fn from_env() -> Self {
        Self::from_pairs(
            DEFAULT_SETTINGS
                .keys()
                .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v))),
        )
    }

    /// Build from explicit key/value pairs; empty values count as unset.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v): &(String, String)| !v.is_empty())
            .collect();
        Self { values }
    }

    /// Get a setting value. Falls back to the default if unset.
    pub fn get_setting(&self, key: &str) -> Result<String, anyhow::Error> {
        if let Some(val) = self.values.get(key) {
            return Ok(val.clone());
        }
        if let Some(def) = DEFAULT_SETTINGS.get(key) {
            return Ok(def.default.to_string());
        }
        anyhow::bail!("setting not found: {key}");
    }

    /// Required settings that have no value.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing: Vec<_> = DEFAULT_SETTINGS
            .values()
            .filter(|def| def.required && !self.values.contains_key(def.key))
            .map(|def| def.key)
            .collect();
        missing.sort_unstable();
        missing
    }

    /// Validate every resolved value, returning `key: message` per failure.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors: Vec<_> = DEFAULT_SETTINGS
            .keys()
            .filter_map(|key| {
                let value = self.get_setting(key).ok()?;
                if value.is_empty() {
                    return None;
                }
                validate_setting(key, &value).err().map(|e| format!("{key}: {e}"))
            })
            .collect();
        errors.sort();
        errors
    }

    /// Value for logging: secrets are masked.
    pub fn display_value(&self, key: &str) -> String {
        let value = self.get_setting(key).unwrap_or_default();
        match DEFAULT_SETTINGS.get(key) {
            Some(def) if def.secret && !value.is_empty() => "********".into(),
            _ => value,
        }
    }
}
