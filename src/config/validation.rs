use crate::config::types::{Config, CrawlMode, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output, config.crawler.mode)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.seed_file.trim().is_empty() {
        return Err(ConfigError::Validation(
            "seed_file cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, hyphens and \
             underscores, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
///
/// The database path only matters when pages are actually persisted.
fn validate_output_config(config: &OutputConfig, mode: CrawlMode) -> Result<(), ConfigError> {
    if mode == CrawlMode::Storage && config.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty in storage mode".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_agent(name: &str) -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: name.to_string(),
            crawler_version: "1.0".to_string(),
        }
    }

    #[test]
    fn test_validate_crawler_name() {
        assert!(validate_user_agent_config(&user_agent("seedcrawl")).is_ok());
        assert!(validate_user_agent_config(&user_agent("seed-crawl_2")).is_ok());

        assert!(validate_user_agent_config(&user_agent("")).is_err());
        assert!(validate_user_agent_config(&user_agent("seed crawl")).is_err());
        assert!(validate_user_agent_config(&user_agent("seed/crawl")).is_err());
    }

    #[test]
    fn test_database_path_required_only_for_storage() {
        let output = OutputConfig {
            database_path: String::new(),
        };

        assert!(validate_output_config(&output, CrawlMode::Simple).is_ok());
        assert!(matches!(
            validate_output_config(&output, CrawlMode::Storage),
            Err(ConfigError::Validation(_))
        ));
    }
}
