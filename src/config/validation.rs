use crate::config::types::{Config, MediaConfig, OutputConfig, ScanConfig, UserAgentConfig};
use crate::crawler::MAX_CONCURRENCY_LIMIT;
use crate::url::is_valid_url;
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scan_config(&config.scan)?;
    validate_media_config(&config.media)?;
    validate_blocked(&config.blocked)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates scan limits and the entry URL
fn validate_scan_config(config: &ScanConfig) -> Result<(), ConfigError> {
    if let Some(url) = &config.url {
        if !is_valid_url(url.trim()) {
            return Err(ConfigError::InvalidUrl(format!(
                "scan.url '{}' is not a valid absolute URL",
                url
            )));
        }
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_concurrency < 1 || config.max_concurrency > MAX_CONCURRENCY_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY_LIMIT, config.max_concurrency
        )));
    }

    if config.tick_interval_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "tick-interval-ms must be >= 1ms, got {}ms",
            config.tick_interval_ms
        )));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch-timeout-secs must be >= 1s, got {}s",
            config.fetch_timeout_secs
        )));
    }

    Ok(())
}

/// Validates medium prefix edits and the custom pattern
fn validate_media_config(config: &MediaConfig) -> Result<(), ConfigError> {
    let prefixes = config.prefixes.iter().flatten();

    for prefix in prefixes.chain(&config.add).chain(&config.remove) {
        if prefix.trim().is_empty() {
            return Err(ConfigError::InvalidPattern(
                "Medium prefix cannot be empty".to_string(),
            ));
        }
    }

    if let Some(pattern) = &config.custom_pattern {
        Regex::new(pattern).map_err(|e| {
            ConfigError::InvalidPattern(format!("Invalid custom-pattern '{}': {}", pattern, e))
        })?;
    }

    Ok(())
}

/// Validates blocked URL entries
fn validate_blocked(entries: &[String]) -> Result<(), ConfigError> {
    for entry in entries {
        let trimmed = entry.trim();
        if trimmed.is_empty() || trimmed == "/" {
            return Err(ConfigError::Validation(format!(
                "Blocked entry '{}' does not name a URL or path",
                entry
            )));
        }
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

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler-version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    if let Some(email) = &config.contact_email {
        validate_email(email)?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config
        .summary_path
        .as_deref()
        .is_some_and(|path| path.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    // Domain part should contain at least one dot
    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
