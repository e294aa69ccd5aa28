use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables already in the process.
///
/// Does not load `.env` files; the binary does that before parsing arguments
/// so `.env` values also reach clap's `env` fallbacks.
///
/// # Errors
///
/// Returns `ConfigError` if any value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_base_url = or_default("SCOUT_API_BASE_URL", "http://localhost:8000");
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "SCOUT_API_BASE_URL".to_string(),
            reason: format!("expected an http(s) origin, got '{api_base_url}'"),
        });
    }

    let log_level = or_default("SCOUT_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("SCOUT_REQUEST_TIMEOUT_SECS", "600")?;
    let connect_timeout_secs = parse_u64("SCOUT_CONNECT_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("SCOUT_USER_AGENT", "scout/0.1 (job-search-client)");
    let rate_limit_cooldown_secs = parse_u64("SCOUT_RATE_LIMIT_COOLDOWN_SECS", "60")?;

    Ok(AppConfig {
        api_base_url,
        log_level,
        request_timeout_secs,
        connect_timeout_secs,
        user_agent,
        rate_limit_cooldown_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
