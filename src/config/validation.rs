use crate::config::types::Config;
use crate::ConfigError;

/// Validates a parsed configuration
///
/// # Arguments
///
/// * `config` - The configuration to validate
///
/// # Returns
///
/// * `Ok(())` - Configuration is valid
/// * `Err(ConfigError)` - Description of the first problem found
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.fetcher.default_driver.trim().is_empty() {
        return Err(ConfigError::Validation(
            "default-driver must not be empty".to_string(),
        ));
    }

    if config.cache.prefix.trim().is_empty() {
        return Err(ConfigError::Validation(
            "cache prefix must not be empty".to_string(),
        ));
    }

    if let Some(agent) = &config.http.user_agent {
        if agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user-agent must not be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}
