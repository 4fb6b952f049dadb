use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the transit backend, including any API prefix
    /// (e.g. "https://host/api/v1"). The dashboard only appends
    /// endpoint paths to it.
    pub api_base_url: String,
    /// Dashboard tuning knobs
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Configuration for the tracking & ETA engine
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Maximum number of arrivals requested and displayed per stop query (default: 10)
    #[serde(default = "DashboardConfig::default_arrivals_limit")]
    pub arrivals_limit: u32,
    /// Countdown tick interval in seconds (default: 1)
    #[serde(default = "DashboardConfig::default_tick_interval_secs")]
    pub tick_interval_secs: u64,
    /// HTTP request timeout in seconds (default: 30)
    #[serde(default = "DashboardConfig::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// HTTP connect timeout in seconds (default: 10)
    #[serde(default = "DashboardConfig::default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            arrivals_limit: Self::default_arrivals_limit(),
            tick_interval_secs: Self::default_tick_interval_secs(),
            request_timeout_secs: Self::default_request_timeout_secs(),
            connect_timeout_secs: Self::default_connect_timeout_secs(),
        }
    }
}

impl DashboardConfig {
    fn default_arrivals_limit() -> u32 {
        10
    }
    fn default_tick_interval_secs() -> u64 {
        1
    }
    fn default_request_timeout_secs() -> u64 {
        30
    }
    fn default_connect_timeout_secs() -> u64 {
        10
    }

    pub fn validate(&self) {
        if self.arrivals_limit == 0 {
            panic!("Configuration error: dashboard.arrivals_limit must be at least 1");
        }
        if self.tick_interval_secs == 0 {
            panic!("Configuration error: dashboard.tick_interval_secs must be at least 1");
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            panic!("Configuration error: dashboard timeouts must be at least 1 second");
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_defaults_apply_when_section_missing() {
        let config: Config = serde_yaml::from_str("api_base_url: \"http://localhost:8080/api/v1\"")
            .expect("minimal config should parse");

        assert_eq!(config.api_base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.dashboard.arrivals_limit, 10);
        assert_eq!(config.dashboard.tick_interval_secs, 1);
        assert_eq!(config.dashboard.request_timeout_secs, 30);
        assert_eq!(config.dashboard.connect_timeout_secs, 10);
    }

    #[test]
    fn partial_dashboard_section_keeps_other_defaults() {
        let yaml = r#"
api_base_url: "http://localhost:8080/api/v1"
dashboard:
  arrivals_limit: 5
"#;
        let config: Config = serde_yaml::from_str(yaml).expect("config should parse");

        assert_eq!(config.dashboard.arrivals_limit, 5);
        assert_eq!(config.dashboard.tick_interval_secs, 1);
    }
}
