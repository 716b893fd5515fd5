use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    pub base_url: String,
    pub page_start: u32,
    pub page_end: u32,
    pub price_threshold: u64,
    /// Abort the detail phase on the first failed fetch instead of
    /// dropping the record and continuing.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub chrome_path: Option<String>,
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,
    #[serde(default = "default_settle_delay")]
    pub settle_delay_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_path: String,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_wait_timeout() -> u64 {
    10
}

fn default_settle_delay() -> u64 {
    5
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            chrome_path: None,
            wait_timeout_secs: default_wait_timeout(),
            settle_delay_secs: default_settle_delay(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Add local config (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "CAMPER_SCOUT"
            .add_source(Environment::with_prefix("CAMPER_SCOUT").separator("__"))
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;

        // Add Chrome path from environment if not set
        if config.browser.chrome_path.is_none() {
            config.browser.chrome_path = env::var("CHROME_PATH").ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate crawl configuration
        if Url::parse(&self.crawl.base_url).is_err() {
            return Err(ConfigError::Message("Invalid base URL format".into()));
        }

        if self.crawl.page_start == 0 {
            return Err(ConfigError::Message(
                "crawl.page_start must be greater than 0".into(),
            ));
        }

        if self.crawl.page_start > self.crawl.page_end {
            return Err(ConfigError::Message(
                "crawl.page_start cannot exceed crawl.page_end".into(),
            ));
        }

        // Validate browser configuration
        if self.browser.wait_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "browser.wait_timeout_secs must be greater than 0".into(),
            ));
        }

        // Validate export configuration
        if self.export.output_path.trim().is_empty() {
            return Err(ConfigError::Message(
                "export.output_path must not be empty".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            crawl: CrawlConfig {
                base_url: "https://www.kleinanzeigen.de/pro/hoppe-caravaning".to_string(),
                page_start: 1,
                page_end: 5,
                price_threshold: 30000,
                strict: false,
            },
            browser: BrowserConfig::default(),
            export: ExportConfig {
                output_path: "data/camper_listings.csv".to_string(),
            },
        }
    }

    #[test]
    fn test_config_validation_valid() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_base_url() {
        let mut config = valid_config();
        config.crawl.base_url = "not-a-valid-url".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid base URL"));
    }

    #[test]
    fn test_config_validation_zero_page_start() {
        let mut config = valid_config();
        config.crawl.page_start = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("page_start must be greater than 0")
        );
    }

    #[test]
    fn test_config_validation_inverted_page_range() {
        let mut config = valid_config();
        config.crawl.page_start = 7;
        config.crawl.page_end = 3;

        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("page_start cannot exceed")
        );
    }

    #[test]
    fn test_config_validation_single_page_range() {
        let mut config = valid_config();
        config.crawl.page_start = 3;
        config.crawl.page_end = 3;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_wait_timeout() {
        let mut config = valid_config();
        config.browser.wait_timeout_secs = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("wait_timeout_secs")
        );
    }

    #[test]
    fn test_config_validation_empty_output_path() {
        let mut config = valid_config();
        config.export.output_path = "  ".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("output_path"));
    }

    #[test]
    fn test_browser_defaults() {
        let browser = BrowserConfig::default();

        assert_eq!(browser.wait_timeout_secs, 10);
        assert_eq!(browser.settle_delay_secs, 5);
        assert!(browser.chrome_path.is_none());
        assert!(browser.user_agent.contains("Mozilla"));
    }
}
