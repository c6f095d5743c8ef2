use std::env;
use std::time::Duration;

use crate::plot::WindowPolicy;

#[derive(Debug, Clone)]
pub enum Deployment {
    Local,
    Dev,
    Lab,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "lab" | "production" | "prod" => Self::Lab,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Rig backend
    pub rig_backend_url: String,
    pub request_timeout_ms: u64,

    // Refresh loop
    pub refresh_interval_ms: u64,
    pub discard_stale_ticks: bool,

    // Charts
    pub plot_window: WindowPolicy,

    // API settings
    pub api_host: String,
    pub api_port: u16,

    // Rate limiting
    pub disable_rate_limiting: bool,
    pub rate_limit_commands_per_second: u64,
    pub rate_limit_commands_burst: u32,

    // Application metadata
    pub deployment: Deployment,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `RIG_BACKEND_URL` is not set and
    /// `ConfigError::Invalid` if `PLOT_WINDOW_POLICY` names an unknown policy.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let max_points: usize = parse_or("PLOT_MAX_POINTS", 100);
        let max_time_window_ms: i64 = parse_or("PLOT_MAX_TIME_WINDOW_MS", 60_000);
        let y_range = match (
            env::var("PLOT_Y_MIN").ok().and_then(|v| v.parse::<f64>().ok()),
            env::var("PLOT_Y_MAX").ok().and_then(|v| v.parse::<f64>().ok()),
        ) {
            (Some(min), Some(max)) if min < max => Some((min, max)),
            _ => None,
        };

        let policy = env::var("PLOT_WINDOW_POLICY").unwrap_or_else(|_| "points".to_string());
        let plot_window = match policy.to_lowercase().as_str() {
            "points" | "point_count" => WindowPolicy::PointCount { max_points },
            "time" | "time_window" => WindowPolicy::TimeWindow {
                max_time_window_ms,
                y_range,
            },
            _ => return Err(ConfigError::Invalid("PLOT_WINDOW_POLICY", policy)),
        };

        Ok(Self {
            // Rig backend
            rig_backend_url: env::var("RIG_BACKEND_URL")
                .map_err(|_| ConfigError::Missing("RIG_BACKEND_URL"))?
                .trim_end_matches('/')
                .to_string(),
            request_timeout_ms: parse_or("REQUEST_TIMEOUT_MS", 1000),

            // Refresh loop
            refresh_interval_ms: parse_or("REFRESH_INTERVAL_MS", 1500),
            discard_stale_ticks: parse_or("DISCARD_STALE_TICKS", true),

            plot_window,

            // API settings
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: parse_or("API_PORT", 4000),

            // Rate limiting
            disable_rate_limiting: parse_or("DISABLE_RATE_LIMITING", false),
            rate_limit_commands_per_second: parse_or("RATE_LIMIT_COMMANDS_PER_SECOND", 2),
            rate_limit_commands_burst: parse_or("RATE_LIMIT_COMMANDS_BURST", 10),

            // Application metadata
            deployment: Deployment::from_str(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
        })
    }

    /// Configuration pointing at `backend_url` with every other value at its default.
    #[must_use]
    pub fn with_backend(backend_url: &str) -> Self {
        Self {
            rig_backend_url: backend_url.trim_end_matches('/').to_string(),
            request_timeout_ms: 1000,
            refresh_interval_ms: 1500,
            discard_stale_ticks: true,
            plot_window: WindowPolicy::PointCount { max_points: 100 },
            api_host: "0.0.0.0".to_string(),
            api_port: 4000,
            disable_rate_limiting: true,
            rate_limit_commands_per_second: 2,
            rate_limit_commands_burst: 10,
            deployment: Deployment::Local,
        }
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(1))
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
