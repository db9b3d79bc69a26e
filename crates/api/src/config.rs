use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on post-shutdown cleanup in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Per-session alarm simulator settings.
    pub simulator: SimulatorConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    ///
    /// Panics on unparsable values; misconfiguration should fail at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            simulator: SimulatorConfig::from_env(),
        }
    }
}

/// Settings for the bounded alarm simulator started on each WebSocket session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Start a simulator for every new session (default: `true`).
    pub enabled: bool,
    /// Wait before each iteration (default: 30 s).
    pub interval: Duration,
    /// Number of synthetic readings per session (default: `5`).
    pub iterations: u32,
}

impl SimulatorConfig {
    pub const DEFAULT_INTERVAL_SECS: u64 = 30;
    pub const DEFAULT_ITERATIONS: u32 = 5;

    /// | Env Var                         | Default |
    /// |---------------------------------|---------|
    /// | `ALARM_SIMULATOR_ENABLED`       | `true`  |
    /// | `ALARM_SIMULATOR_INTERVAL_SECS` | `30`    |
    /// | `ALARM_SIMULATOR_ITERATIONS`    | `5`     |
    pub fn from_env() -> Self {
        let enabled: bool = std::env::var("ALARM_SIMULATOR_ENABLED")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("ALARM_SIMULATOR_ENABLED must be true or false");

        let interval_secs: u64 = std::env::var("ALARM_SIMULATOR_INTERVAL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_INTERVAL_SECS.to_string())
            .parse()
            .expect("ALARM_SIMULATOR_INTERVAL_SECS must be a valid u64");

        let iterations: u32 = std::env::var("ALARM_SIMULATOR_ITERATIONS")
            .unwrap_or_else(|_| Self::DEFAULT_ITERATIONS.to_string())
            .parse()
            .expect("ALARM_SIMULATOR_ITERATIONS must be a valid u32");

        Self {
            enabled,
            interval: Duration::from_secs(interval_secs),
            iterations,
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(Self::DEFAULT_INTERVAL_SECS),
            iterations: Self::DEFAULT_ITERATIONS,
        }
    }
}
