use crate::config::CrawlConfig;
use crate::url::normalize_url;
use crate::ConfigError;
use url::Url;

/// Validates a crawl configuration and returns the normalized seed URL
///
/// Checks:
/// - `max_depth` >= 1
/// - `max_pages` >= 1
/// - the start URL parses and normalizes (http/https with a host)
///
/// # Arguments
///
/// * `config` - The crawl configuration to validate
///
/// # Returns
///
/// * `Ok(Url)` - The normalized seed URL
/// * `Err(ConfigError)` - The configuration is invalid; no job should be
///   created from it
pub fn validate(config: &CrawlConfig) -> Result<Url, ConfigError> {
    if config.max_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "max_depth must be >= 1, got {}",
            config.max_depth
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    normalize_url(&config.start_url).map_err(|e| ConfigError::InvalidStartUrl {
        url: config.start_url.clone(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scope;

    #[test]
    fn test_valid_config() {
        let config = CrawlConfig::new("https://example.com/docs/", 2, 50);
        let seed = validate(&config).unwrap();
        assert_eq!(seed.as_str(), "https://example.com/docs");
    }

    #[test]
    fn test_zero_depth_rejected() {
        let config = CrawlConfig::new("https://example.com/", 0, 50);
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_pages_rejected() {
        let config = CrawlConfig::new("https://example.com/", 2, 0);
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_bad_seed_rejected() {
        let config = CrawlConfig::new("ftp://example.com/", 2, 50).with_scope(Scope::Unrestricted);
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidStartUrl { .. })
        ));
    }
}
