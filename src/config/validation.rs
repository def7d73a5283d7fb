use crate::config::types::{ClassifyConfig, Config, CrawlerConfig, SeedConfig};
use crate::url::same_origin;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(config)?;
    validate_output_config(config)?;
    validate_seed_config(&config.seeds)?;
    validate_classify_config(&config.classify)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 64 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 64, got {}",
            config.concurrency
        )));
    }

    if config.poll_interval_ms < 10 {
        return Err(ConfigError::Validation(format!(
            "poll-interval-ms must be >= 10ms, got {}ms",
            config.poll_interval_ms
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

/// Validates fetcher configuration
fn validate_fetcher_config(config: &Config) -> Result<(), ConfigError> {
    if config.fetcher.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &Config) -> Result<(), ConfigError> {
    if config.output.results_path.is_empty() {
        return Err(ConfigError::Validation(
            "results-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates the seed configuration
///
/// The start URL must be an absolute HTTP(S) URL; extra seeds must parse and
/// share its origin, since the crawler never leaves the start URL's origin.
fn validate_seed_config(config: &SeedConfig) -> Result<(), ConfigError> {
    let start = Url::parse(&config.start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("start-url: {}", e)))?;

    if start.scheme() != "http" && start.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "start-url must use http or https, got '{}'",
            start.scheme()
        )));
    }

    for seed in &config.urls {
        Url::parse(seed).map_err(|e| ConfigError::InvalidUrl(format!("seed {}: {}", seed, e)))?;

        if !same_origin(&config.start_url, seed) {
            return Err(ConfigError::Validation(format!(
                "seed {} is not same-origin with start-url {}",
                seed, config.start_url
            )));
        }
    }

    Ok(())
}

/// Validates the classification rule table
fn validate_classify_config(config: &ClassifyConfig) -> Result<(), ConfigError> {
    for pattern in config
        .detail_patterns
        .iter()
        .chain(config.listing_patterns.iter())
    {
        if pattern.trim().is_empty() {
            return Err(ConfigError::Validation(
                "classification patterns cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{FetcherConfig, OutputConfig};

    fn create_valid_config() -> Config {
        Config {
            crawler: CrawlerConfig {
                concurrency: 4,
                poll_interval_ms: 200,
                fetch_timeout_secs: 30,
            },
            fetcher: FetcherConfig {
                user_agent: "TestAgent/1.0".to_string(),
            },
            output: OutputConfig {
                results_path: "./links.tsv".to_string(),
            },
            seeds: SeedConfig {
                start_url: "https://example.com".to_string(),
                urls: vec!["https://example.com/favorites/start".to_string()],
            },
            classify: ClassifyConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let config = create_valid_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = create_valid_config();
        config.crawler.concurrency = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_excessive_concurrency_rejected() {
        let mut config = create_valid_config();
        config.crawler.concurrency = 65;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_tiny_poll_interval_rejected() {
        let mut config = create_valid_config();
        config.crawler.poll_interval_ms = 5;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let mut config = create_valid_config();
        config.fetcher.user_agent = "  ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_results_path_rejected() {
        let mut config = create_valid_config();
        config.output.results_path = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_start_url_rejected() {
        let mut config = create_valid_config();
        config.seeds.start_url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_non_http_start_url_rejected() {
        let mut config = create_valid_config();
        config.seeds.start_url = "ftp://example.com".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_cross_origin_seed_rejected() {
        let mut config = create_valid_config();
        config.seeds.urls.push("https://other.com/a".to_string());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let mut config = create_valid_config();
        config.classify.detail_patterns.push("".to_string());
        assert!(validate(&config).is_err());
    }
}
