/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Per-connection push send deadline in seconds (default: `3`).
    pub push_timeout_secs: u64,
    /// How often the connection reaper runs, in seconds (default: `300`).
    pub reaper_interval_secs: u64,
    /// Age after which a connection with no live socket is reaped, in
    /// seconds. Unset disables age-based reaping (virtual entries are always
    /// reaped).
    pub reaper_stale_after_secs: Option<u64>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `PUSH_TIMEOUT_SECS`       | `3`                     |
    /// | `REAPER_INTERVAL_SECS`    | `300`                   |
    /// | `REAPER_STALE_AFTER_SECS` | unset                   |
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

        let push_timeout_secs: u64 = std::env::var("PUSH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("PUSH_TIMEOUT_SECS must be a valid u64");

        let reaper_interval_secs: u64 = std::env::var("REAPER_INTERVAL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REAPER_INTERVAL_SECS must be a valid u64");

        let reaper_stale_after_secs: Option<u64> = std::env::var("REAPER_STALE_AFTER_SECS")
            .ok()
            .map(|v| v.parse().expect("REAPER_STALE_AFTER_SECS must be a valid u64"));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            push_timeout_secs,
            reaper_interval_secs,
            reaper_stale_after_secs,
        }
    }
}
