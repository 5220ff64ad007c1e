use url::Url;

/// Server configuration loaded from environment variables.
///
/// Local-development defaults apply to the listener settings. The two remote
/// URLs have no sensible default and must be set.
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
    /// Time allowed for background tasks to stop after shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Remote REST API root, without trailing slash.
    pub api_url: String,
    /// Externally reachable root of this service; webhook callbacks are
    /// delivered to `{root}/api/event`.
    pub webhook_callback_root_url: String,
    /// Age after which correlation records are purged (default: `24`).
    pub correlation_retention_hours: i64,
}

/// Every problem found while loading configuration.
#[derive(Debug, thiserror::Error)]
#[error("Invalid configuration: {}", .0.join("; "))]
pub struct ConfigError(pub Vec<String>);

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                       | Default                    |
    /// |-------------------------------|----------------------------|
    /// | `HOST`                        | `0.0.0.0`                  |
    /// | `PORT`                        | `3000`                     |
    /// | `CORS_ORIGINS`                | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`       | `30`                       |
    /// | `API_URL`                     | required                   |
    /// | `WEBHOOK_CALLBACK_ROOT_URL`   | required                   |
    /// | `CORRELATION_RETENTION_HOURS` | `24`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, collecting every invalid or
    /// missing value before failing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors = Vec::new();

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port = parse_or(&lookup, "PORT", 3000u16, &mut errors);

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30u64, &mut errors);
        let shutdown_timeout_secs = parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30u64, &mut errors);

        let api_url = required_url(&lookup, "API_URL", &mut errors);
        let webhook_callback_root_url =
            required_url(&lookup, "WEBHOOK_CALLBACK_ROOT_URL", &mut errors);

        let correlation_retention_hours =
            parse_or(&lookup, "CORRELATION_RETENTION_HOURS", 24i64, &mut errors);
        if correlation_retention_hours <= 0 {
            errors.push(format!(
                "CORRELATION_RETENTION_HOURS must be positive, got {correlation_retention_hours}"
            ));
        }

        if !errors.is_empty() {
            return Err(ConfigError(errors));
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            api_url,
            webhook_callback_root_url,
            correlation_retention_hours,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T, errors: &mut Vec<String>) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            errors.push(format!("{key} is not a valid number: '{raw}'"));
            default
        }),
    }
}

fn required_url<F>(lookup: &F, key: &str, errors: &mut Vec<String>) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
        errors.push(format!("{key} must be set"));
        return String::new();
    };

    match Url::parse(&raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {
            raw.trim_end_matches('/').to_string()
        }
        Ok(_) => {
            errors.push(format!("{key} must be an http(s) URL, got '{raw}'"));
            String::new()
        }
        Err(e) => {
            errors.push(format!("{key} is not a valid URL ({e}): '{raw}'"));
            String::new()
        }
    }
}
