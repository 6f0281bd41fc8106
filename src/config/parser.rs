use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads, parses and validates a scan configuration file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use medium_scout::config::load_config;
///
/// let config = load_config(Path::new("scout.toml")).unwrap();
/// println!("Max pages: {}", config.scan.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_hash(path).map(|(config, _)| config)
}

/// Parses and validates configuration text
///
/// Unknown keys are rejected, missing ones take their defaults.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Hex-encoded SHA-256 fingerprint of configuration text
///
/// Reports carry the fingerprint so a crawl can be tied to the exact
/// configuration that produced it.
pub fn config_fingerprint(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Loads a configuration file together with the fingerprint of its text
///
/// The file is read once; the fingerprint always describes the text that
/// was parsed.
///
/// # Errors
///
/// * `ConfigError::Io` - the file could not be read
/// * `ConfigError::Parse` - the file is not valid TOML for a configuration
/// * Any validation error from the configured values
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    tracing::debug!("Read {} bytes of configuration from {}", content.len(), path.display());

    let config = parse_config(&content)?;
    Ok((config, config_fingerprint(&content)))
}
