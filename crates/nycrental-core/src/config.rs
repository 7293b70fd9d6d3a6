use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Phrases that, when present anywhere in a search results page, mean the
/// listing site found nothing for the address.
pub const DEFAULT_NO_LISTING_PHRASES: [&str; 4] = [
    "no results found",
    "we couldn't find any matches",
    "try searching in a different area",
    "there were no matches for",
];

const DEFAULT_SOURCE_URL: &str =
    "https://www.nyc.gov/site/specialenforcement/reporting-law/class-b-mdl.page";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

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

    let proxy_host = require("NYCRENTAL_PROXY_HOST")?;
    let proxy_username = require("NYCRENTAL_PROXY_USERNAME")?;
    let proxy_password = require("NYCRENTAL_PROXY_PASSWORD")?;
    let proxy_cert_path = PathBuf::from(or_default(
        "NYCRENTAL_PROXY_CERT_PATH",
        "config/brightdata/cert.crt",
    ));

    let log_level = or_default("NYCRENTAL_LOG_LEVEL", "info");
    let output_dir = PathBuf::from(or_default("NYCRENTAL_OUTPUT_DIR", "data"));
    let source_url = or_default("NYCRENTAL_SOURCE_URL", DEFAULT_SOURCE_URL);
    let source_base_url = or_default("NYCRENTAL_SOURCE_BASE_URL", "https://www.nyc.gov");
    let search_base_url = or_default(
        "NYCRENTAL_SEARCH_BASE_URL",
        "https://streeteasy.com/search",
    );
    let user_agent = or_default("NYCRENTAL_USER_AGENT", "nycrental/0.1 (listing-audit)");

    let boroughs = split_list(&or_default("NYCRENTAL_BOROUGHS", "MANHATTAN"), ',');
    if boroughs.is_empty() {
        return Err(invalid(
            "NYCRENTAL_BOROUGHS",
            "at least one borough is required".to_string(),
        ));
    }

    let max_workers = parse_usize("NYCRENTAL_MAX_WORKERS", "30")?;
    if max_workers == 0 {
        return Err(invalid(
            "NYCRENTAL_MAX_WORKERS",
            "must be at least 1".to_string(),
        ));
    }

    let request_timeout_secs = parse_u64("NYCRENTAL_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "NYCRENTAL_REQUEST_TIMEOUT_SECS",
            "must be at least 1".to_string(),
        ));
    }
    let max_retries = parse_u32("NYCRENTAL_MAX_RETRIES", "1")?;
    let retry_delay_secs = parse_u64("NYCRENTAL_RETRY_DELAY_SECS", "180")?;

    let abort_threshold = parse_u32("NYCRENTAL_ABORT_THRESHOLD", "10")?;
    if abort_threshold == 0 {
        return Err(invalid(
            "NYCRENTAL_ABORT_THRESHOLD",
            "must be at least 1".to_string(),
        ));
    }

    let no_listing_phrases = match lookup("NYCRENTAL_NO_LISTING_PHRASES") {
        Ok(raw) => {
            let phrases = split_list(&raw, '|');
            if phrases.is_empty() {
                return Err(invalid(
                    "NYCRENTAL_NO_LISTING_PHRASES",
                    "at least one phrase is required".to_string(),
                ));
            }
            phrases
        }
        Err(_) => DEFAULT_NO_LISTING_PHRASES
            .iter()
            .map(|p| (*p).to_string())
            .collect(),
    };

    Ok(AppConfig {
        log_level,
        output_dir,
        source_url,
        source_base_url,
        search_base_url,
        boroughs,
        proxy_host,
        proxy_username,
        proxy_password,
        proxy_cert_path,
        user_agent,
        max_workers,
        request_timeout_secs,
        max_retries,
        retry_delay_secs,
        abort_threshold,
        no_listing_phrases,
    })
}

/// Splits `raw` on `sep`, trimming entries and dropping empty ones.
fn split_list(raw: &str, sep: char) -> Vec<String> {
    raw.split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
