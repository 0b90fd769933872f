//! Server configuration, loaded from environment variables.

use std::env;

use moneta_ai::ProviderConfig;

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub listen_addr: String,
    /// Path to the SQLite database file.
    pub db_path: String,
    /// Redis connection URL; when absent the in-memory cache is used.
    pub redis_url: Option<String>,
    /// JWT signing secret (base64 or raw).
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiry_secs: u64,
    /// OTP mail delivery; OTP endpoints fail when absent.
    pub mail: Option<MailConfig>,
    /// Generative insight provider; rule-based fallback when absent.
    pub insights: Option<ProviderConfig>,
    /// Rate limit applied to the auth routes; disabled when absent.
    pub auth_rate_limit: Option<RateLimitConfig>,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst: u32,
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Loads configuration from the environment.
    ///
    /// Environment variables:
    /// - `MONETA_LISTEN_ADDR` - bind address (default `0.0.0.0:5000`)
    /// - `MONETA_DB_PATH` - SQLite path (default `moneta.db`)
    /// - `REDIS_URL` - Redis URL; in-memory cache when unset
    /// - `MONETA_JWT_SECRET` - token signing secret
    /// - `MONETA_JWT_EXPIRY_SECS` - token lifetime (default 86400)
    /// - `MAIL_API_URL` / `MAIL_API_KEY` / `MAIL_FROM` - OTP mail delivery
    /// - `INSIGHTS_PROVIDER` / `INSIGHTS_MODEL` / `INSIGHTS_API_KEY` /
    ///   `INSIGHTS_BASE_URL` - generative insight provider
    /// - `MONETA_AUTH_RATE_LIMIT_BURST` / `MONETA_AUTH_RATE_LIMIT_PER_SECOND`
    ///   - per-client burst/replenish for the auth routes
    pub fn from_env() -> Self {
        let mail = match (
            env_opt("MAIL_API_URL"),
            env_opt("MAIL_API_KEY"),
            env_opt("MAIL_FROM"),
        ) {
            (Some(api_url), Some(api_key), Some(from)) => Some(MailConfig {
                api_url,
                api_key,
                from,
            }),
            _ => None,
        };

        let insights = match (env_opt("INSIGHTS_PROVIDER"), env_opt("INSIGHTS_MODEL")) {
            (Some(provider_id), Some(model)) => Some(ProviderConfig {
                provider_id,
                model,
                api_key: env_opt("INSIGHTS_API_KEY"),
                base_url: env_opt("INSIGHTS_BASE_URL"),
            }),
            _ => None,
        };

        let auth_rate_limit = env_opt("MONETA_AUTH_RATE_LIMIT_BURST")
            .and_then(|v| v.parse().ok())
            .map(|burst| RateLimitConfig {
                per_second: env_opt("MONETA_AUTH_RATE_LIMIT_PER_SECOND")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(2),
                burst,
            });

        Self {
            listen_addr: env_opt("MONETA_LISTEN_ADDR")
                .unwrap_or_else(|| "0.0.0.0:5000".to_string()),
            db_path: env_opt("MONETA_DB_PATH").unwrap_or_else(|| "moneta.db".to_string()),
            redis_url: env_opt("REDIS_URL"),
            jwt_secret: env_opt("MONETA_JWT_SECRET").unwrap_or_default(),
            jwt_expiry_secs: env_opt("MONETA_JWT_EXPIRY_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400),
            mail,
            insights,
            auth_rate_limit,
        }
    }
}
