use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Serialize;
use shared::domain::DemoRole;
use url::Url;

use crate::identity::DEFAULT_DEMO_USER;

pub const API_V1_PREFIX: &str = "/api/v1";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const SETTINGS_FILE: &str = "oversight.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSettings {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub demo_role: DemoRole,
    pub demo_user: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            request_timeout_secs: 30,
            demo_role: DemoRole::default(),
            demo_user: DEFAULT_DEMO_USER.into(),
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Upstream origin with any trailing slash or versioned prefix stripped.
    pub fn base_url(&self) -> anyhow::Result<Url> {
        normalize_api_url(&self.api_url)
    }
}

/// Loads `oversight.toml` from the working directory, then applies environment overrides.
pub fn load_settings() -> ClientSettings {
    let mut settings = load_settings_from(Path::new(SETTINGS_FILE));
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub fn load_settings_from(path: &Path) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            apply_overrides(&mut settings, |key| {
                file_cfg.get(key).map(|value| match value {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
            });
        }
    }

    settings
}

pub fn apply_env_overrides(
    settings: &mut ClientSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = lookup("API_URL") {
        settings.api_url = v;
    }
    apply_overrides(settings, |key| {
        lookup(&format!("APP__{}", key.to_ascii_uppercase()))
    });
}

fn apply_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("api_url") {
        settings.api_url = v;
    }
    if let Some(v) = lookup("request_timeout_secs") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
    if let Some(v) = lookup("demo_role") {
        if let Ok(role) = v.parse::<DemoRole>() {
            settings.demo_role = role;
        }
    }
    if let Some(v) = lookup("demo_user") {
        if !v.trim().is_empty() {
            settings.demo_user = v;
        }
    }
}

/// Normalizes the configured upstream so that `/api/v1` can be appended exactly once.
pub fn normalize_api_url(raw: &str) -> anyhow::Result<Url> {
    let raw = raw.trim();
    let raw = if raw.is_empty() { DEFAULT_API_URL } else { raw };

    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        bail!("api url must start with http:// or https://: {raw}");
    }

    let trimmed = raw.trim_end_matches('/');
    let trimmed = trimmed
        .strip_suffix(API_V1_PREFIX)
        .unwrap_or(trimmed)
        .trim_end_matches('/');

    let mut url = Url::parse(trimmed).with_context(|| format!("invalid api url '{raw}'"))?;
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
