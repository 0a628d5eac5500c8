use crate::config::types::{
    Config, ScanOptions, UserAgentConfig, BATCH_SIZE_RANGE, MAX_RETRIES_RANGE, TIMEOUT_MS_RANGE,
};
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scan_options(&config.scan)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_headers(config)?;
    Ok(())
}

/// Validates scan options against their allowed ranges
fn validate_scan_options(options: &ScanOptions) -> Result<(), ConfigError> {
    if !BATCH_SIZE_RANGE.contains(&options.batch_size) {
        return Err(ConfigError::Validation(format!(
            "batch-size must be between {} and {}, got {}",
            BATCH_SIZE_RANGE.start(),
            BATCH_SIZE_RANGE.end(),
            options.batch_size
        )));
    }

    if !TIMEOUT_MS_RANGE.contains(&options.timeout_ms) {
        return Err(ConfigError::Validation(format!(
            "timeout must be between {}ms and {}ms, got {}ms",
            TIMEOUT_MS_RANGE.start(),
            TIMEOUT_MS_RANGE.end(),
            options.timeout_ms
        )));
    }

    if !MAX_RETRIES_RANGE.contains(&options.max_retries) {
        return Err(ConfigError::Validation(format!(
            "retries must be between {} and {}, got {}",
            MAX_RETRIES_RANGE.start(),
            MAX_RETRIES_RANGE.end(),
            options.max_retries
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    Ok(())
}

/// Validates that every extra header is a legal HTTP header
fn validate_headers(config: &Config) -> Result<(), ConfigError> {
    for (name, value) in &config.headers {
        HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::Validation(format!("Invalid header name '{}'", name)))?;
        HeaderValue::from_str(value).map_err(|_| {
            ConfigError::Validation(format!("Invalid value for header '{}'", name))
        })?;
    }
    Ok(())
}
