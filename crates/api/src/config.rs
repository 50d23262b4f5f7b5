use std::time::Duration;

use tutor_llm::GeminiConfig;

/// Errors raised while loading [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Shared secret expected in the `X-Admin-Key` header.
    pub admin_key: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_max_output_tokens: u32,
    /// Bound on a single gateway call in seconds (default: `20`).
    pub gateway_timeout_secs: u64,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                    | Default                                            |
    /// |----------------------------|----------------------------------------------------|
    /// | `DATABASE_URL`             | required                                           |
    /// | `GEMINI_API_KEY`           | required                                           |
    /// | `ADMIN_KEY`                | required                                           |
    /// | `GEMINI_MODEL`             | `gemini-2.0-flash`                                 |
    /// | `GEMINI_BASE_URL`          | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `GEMINI_MAX_OUTPUT_TOKENS` | `256`                                              |
    /// | `GATEWAY_TIMEOUT_SECS`     | `20`                                               |
    /// | `HOST`                     | `0.0.0.0`                                          |
    /// | `PORT`                     | `3000`                                             |
    /// | `CORS_ORIGINS`             | `*`                                                |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                                               |
    /// | `LOG_FORMAT`               | `pretty`                                           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| -> Result<String, ConfigError> {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };
        let or_default = |var: &str, default: &str| -> String {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let database_url = required("DATABASE_URL")?;
        let gemini_api_key = required("GEMINI_API_KEY")?;
        let admin_key = required("ADMIN_KEY")?;

        let cors_origins: Vec<String> = or_default("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match or_default("LOG_FORMAT", "pretty").to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    value: other.to_string(),
                    reason: "expected 'pretty' or 'json'".into(),
                })
            }
        };

        let request_timeout_secs: u64 = parse_var(
            "REQUEST_TIMEOUT_SECS",
            &or_default("REQUEST_TIMEOUT_SECS", "30"),
        )?;
        let gateway_timeout_secs: u64 = parse_var(
            "GATEWAY_TIMEOUT_SECS",
            &or_default("GATEWAY_TIMEOUT_SECS", "20"),
        )?;
        // The request timeout layer answers 408 with no body, so the gateway
        // bound has to expire first for a 504 to reach the client.
        if gateway_timeout_secs == 0 || gateway_timeout_secs >= request_timeout_secs {
            return Err(ConfigError::Invalid {
                var: "GATEWAY_TIMEOUT_SECS",
                value: gateway_timeout_secs.to_string(),
                reason: format!(
                    "must be between 1 and REQUEST_TIMEOUT_SECS ({request_timeout_secs}) exclusive"
                ),
            });
        }

        Ok(Self {
            host: or_default("HOST", "0.0.0.0"),
            port: parse_var("PORT", &or_default("PORT", "3000"))?,
            cors_origins,
            request_timeout_secs,
            database_url,
            admin_key,
            gemini_api_key,
            gemini_model: or_default("GEMINI_MODEL", "gemini-2.0-flash"),
            gemini_base_url: or_default(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            gemini_max_output_tokens: parse_var(
                "GEMINI_MAX_OUTPUT_TOKENS",
                &or_default("GEMINI_MAX_OUTPUT_TOKENS", "256"),
            )?,
            gateway_timeout_secs,
            log_format,
        })
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }

    /// Settings for the Gemini client.
    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.gemini_api_key.clone(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.clone(),
            max_output_tokens: self.gemini_max_output_tokens,
            timeout: self.gateway_timeout(),
        }
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
