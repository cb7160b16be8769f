use crate::error::ConfigError;
use common::RoleQuery;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Settings for one digest run, read from the environment at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub serpapi_api_key: String,
    pub resend_api_key: String,
    pub email_from: String,
    pub email_to: String,
    pub roles: Vec<RoleQuery>,
    pub http_timeout: Duration,
    /// Log outgoing emails instead of delivering them.
    pub dry_run: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any name -> value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let serpapi_api_key = required("SERPAPI_API_KEY")?;
        let resend_api_key = required("RESEND_API_KEY")?;
        let email_from = required("EMAIL_FROM")?;
        let email_to = required("EMAIL_TO")?;

        let roles = RoleQuery::parse_list(&required("ROLE_QUERIES")?);
        if roles.is_empty() {
            return Err(ConfigError::NoRoles);
        }

        let http_timeout = match lookup("HTTP_TIMEOUT_SECS").filter(|v| !v.trim().is_empty()) {
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "HTTP_TIMEOUT_SECS",
                        reason: format!("expected a positive number of seconds, got {:?}", raw),
                    })
                }
            },
        };

        let dry_run = lookup("DIGEST_DRY_RUN")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            serpapi_api_key,
            resend_api_key,
            email_from,
            email_to,
            roles,
            http_timeout,
            dry_run,
        })
    }
}
