use crate::errors::{HabitError, HabitResult};
use reqwest::Url;
use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitConfig {
    /// Base address of the remote service, without a trailing slash.
    pub api_url: String,
    /// Run controller operations one at a time.
    pub serialize_operations: bool,
}

impl Default for HabitConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            serialize_operations: false,
        }
    }
}

impl HabitConfig {
    pub fn from_env() -> HabitResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> HabitResult<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("HABITS_API_URL") {
            config.api_url = normalize_api_url(&url)?;
        }
        if let Some(flag) = lookup("HABITS_SERIALIZE_OPS") {
            config.serialize_operations = parse_flag(&flag)?;
        }

        Ok(config)
    }

    pub fn with_api_url(mut self, url: &str) -> HabitResult<Self> {
        self.api_url = normalize_api_url(url)?;
        Ok(self)
    }
}

pub fn normalize_api_url(raw: &str) -> HabitResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|err| HabitError::Config(format!("invalid api url `{raw}`: {err}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(HabitError::Config(format!(
            "api url `{raw}` must use http or https"
        )));
    }
    Ok(trimmed.to_string())
}

fn parse_flag(value: &str) -> HabitResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(HabitError::Config(format!(
            "HABITS_SERIALIZE_OPS must be a boolean, got `{other}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = HabitConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, HabitConfig::default());
        assert_eq!(config.api_url, "http://localhost:3000");
        assert!(!config.serialize_operations);
    }

    #[test]
    fn reads_overrides() {
        let config = HabitConfig::from_lookup(lookup(&[
            ("HABITS_API_URL", "https://habits.example.com/api/"),
            ("HABITS_SERIALIZE_OPS", "true"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://habits.example.com/api");
        assert!(config.serialize_operations);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            HabitConfig::from_lookup(lookup(&[("HABITS_API_URL", "not a url")])),
            Err(HabitError::Config(_))
        ));
        assert!(HabitConfig::from_lookup(lookup(&[("HABITS_API_URL", "ftp://host")])).is_err());
        assert!(HabitConfig::from_lookup(lookup(&[("HABITS_SERIALIZE_OPS", "maybe")])).is_err());
    }
}
