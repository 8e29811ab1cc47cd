use crate::app_config::{AppConfig, DEFAULT_ENDPOINT_URL};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a working
/// config pointed at the production endpoint.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("INSOMNIA_LOG_LEVEL", "info");
    let endpoint_url =
        parse_endpoint_url(&or_default("INSOMNIA_ENDPOINT_URL", DEFAULT_ENDPOINT_URL))?;
    let request_timeout_secs = parse_u64("INSOMNIA_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "INSOMNIA_USER_AGENT",
        "insomnia-harvester/0.1 (store-locations)",
    );
    let inter_request_delay_ms = parse_u64("INSOMNIA_INTER_REQUEST_DELAY_MS", "300")?;
    let max_concurrent_regions = parse_usize("INSOMNIA_MAX_CONCURRENT_REGIONS", "1")?;
    if max_concurrent_regions == 0 {
        return Err(invalid(
            "INSOMNIA_MAX_CONCURRENT_REGIONS",
            "must be at least 1".to_string(),
        ));
    }
    let max_retries = parse_u32("INSOMNIA_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("INSOMNIA_RETRY_BACKOFF_BASE_MS", "500")?;

    Ok(AppConfig {
        log_level,
        endpoint_url,
        request_timeout_secs,
        user_agent,
        inter_request_delay_ms,
        max_concurrent_regions,
        max_retries,
        retry_backoff_base_ms,
    })
}

/// Accept only absolute `http://` or `https://` endpoints with a host part.
fn parse_endpoint_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match rest {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') => Ok(trimmed.to_string()),
        _ => Err(ConfigError::InvalidEnvVar {
            var: "INSOMNIA_ENDPOINT_URL".to_string(),
            reason: format!("\"{trimmed}\" is not an absolute http(s) URL"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
