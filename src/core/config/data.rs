use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::constants::{BACKEND_URL_ENV, DEFAULT_SAMPLE_LATENCY_MS};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the question-answering service. Unset means the
    /// built-in sample answer is served instead.
    pub backend_url: Option<String>,
    /// Simulated latency of the sample backend, in milliseconds
    pub sample_latency_ms: Option<u64>,
    /// File that receives diagnostic logs
    pub log_file: Option<String>,
    /// UI theme name ("dark" or "light")
    pub theme: Option<String>,
}

/// Keys accepted by `lexi set` and `lexi unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    BackendUrl,
    SampleLatencyMs,
    LogFile,
    Theme,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::BackendUrl,
        ConfigKey::SampleLatencyMs,
        ConfigKey::LogFile,
        ConfigKey::Theme,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::BackendUrl => "backend-url",
            ConfigKey::SampleLatencyMs => "sample-latency-ms",
            ConfigKey::LogFile => "log-file",
            ConfigKey::Theme => "theme",
        }
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = ConfigKey::ALL.iter().map(|key| key.as_str()).collect();
                format!("Unknown config key: {value} (expected one of: {})", known.join(", "))
            })
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Pick the backend URL, letting a non-blank environment override win.
pub fn resolve_backend_url(configured: Option<&str>, env_override: Option<&str>) -> Option<String> {
    non_blank(env_override).or_else(|| non_blank(configured))
}

/// Check that `value` is an absolute http(s) URL usable as a backend base.
pub fn validate_backend_url(value: &str) -> Result<(), String> {
    let url = reqwest::Url::parse(value.trim())
        .map_err(|err| format!("Invalid backend URL {value}: {err}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("Backend URL must use http or https: {value}"));
    }
    Ok(())
}

impl Config {
    pub fn effective_backend_url(&self) -> Option<String> {
        let env_override = std::env::var(BACKEND_URL_ENV).ok();
        resolve_backend_url(self.backend_url.as_deref(), env_override.as_deref())
    }

    pub fn sample_latency_ms(&self) -> u64 {
        self.sample_latency_ms.unwrap_or(DEFAULT_SAMPLE_LATENCY_MS)
    }

    pub fn set_value(&mut self, key: ConfigKey, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("A value is required for {}", key.as_str()));
        }
        match key {
            ConfigKey::BackendUrl => {
                validate_backend_url(value)?;
                self.backend_url = Some(value.to_string());
            }
            ConfigKey::SampleLatencyMs => {
                let millis = value
                    .parse::<u64>()
                    .map_err(|_| format!("sample-latency-ms must be a whole number: {value}"))?;
                self.sample_latency_ms = Some(millis);
            }
            ConfigKey::LogFile => self.log_file = Some(value.to_string()),
            ConfigKey::Theme => {
                let theme = value.to_ascii_lowercase();
                if !matches!(theme.as_str(), "dark" | "light") {
                    return Err(format!("Unknown theme: {value} (expected dark or light)"));
                }
                self.theme = Some(theme);
            }
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::BackendUrl => self.backend_url = None,
            ConfigKey::SampleLatencyMs => self.sample_latency_ms = None,
            ConfigKey::LogFile => self.log_file = None,
            ConfigKey::Theme => self.theme = None,
        }
    }
}
