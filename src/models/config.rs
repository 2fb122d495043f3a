//! Application configuration structures.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Target site and listing filter
    #[serde(default)]
    pub site: SiteConfig,

    /// Paging, limits and HTTP behavior
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// Messaging channel settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// State and recipient file locations
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.site.base()?;
        if !self.site.listing_path.starts_with('/') {
            return Err(AppError::validation("site.listing_path must start with '/'"));
        }
        if self.scrape.user_agent.trim().is_empty() {
            return Err(AppError::validation("scrape.user_agent is empty"));
        }
        if self.scrape.timeout_secs == 0 {
            return Err(AppError::validation("scrape.timeout_secs must be > 0"));
        }
        if self.scrape.max_pages == 0 {
            return Err(AppError::validation("scrape.max_pages must be > 0"));
        }
        if self.telegram.token_env.trim().is_empty() {
            return Err(AppError::validation("telegram.token_env is empty"));
        }
        Ok(())
    }

    /// Read the bot token from the configured environment variable.
    pub fn bot_token(&self) -> Result<String> {
        let name = &self.telegram.token_env;
        match env::var(name) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(AppError::config(format!("{name} is not set"))),
        }
    }
}

/// Target site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site origin used for listing requests and detail links
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Path of the paginated listing
    #[serde(default = "defaults::listing_path")]
    pub listing_path: String,

    /// Category filter passed as the `categories` query parameter (empty disables it)
    #[serde(default = "defaults::categories")]
    pub categories: Option<String>,
}

impl SiteConfig {
    /// Parsed site base URL.
    pub fn base(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?)
    }

    /// URL of a single listing page (1-based).
    pub fn page_url(&self, page: u32) -> Result<Url> {
        let mut url = self.base()?.join(&self.listing_path)?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(categories) = self.categories.as_deref().filter(|c| !c.is_empty()) {
                query.append_pair("categories", categories);
            }
            query.append_pair("page", &page.to_string());
        }
        Ok(url)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            listing_path: defaults::listing_path(),
            categories: defaults::categories(),
        }
    }
}

/// Paging and HTTP behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Upper bound on listing pages walked per run
    #[serde(default = "defaults::max_pages")]
    pub max_pages: u32,

    /// Notifications sent on the first run before priming silently
    #[serde(default = "defaults::max_initial_send")]
    pub max_initial_send: usize,

    /// Page fetch timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between page fetches in milliseconds
    #[serde(default = "defaults::politeness_delay")]
    pub politeness_delay_ms: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_pages: defaults::max_pages(),
            max_initial_send: defaults::max_initial_send(),
            timeout_secs: defaults::timeout(),
            politeness_delay_ms: defaults::politeness_delay(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Messaging channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Environment variable holding the bot token
    #[serde(default = "defaults::token_env")]
    pub token_env: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token_env: defaults::token_env(),
        }
    }
}

/// File locations, relative to the data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "defaults::recipients_file")]
    pub recipients_file: String,

    #[serde(default = "defaults::seen_file")]
    pub seen_file: String,
}

impl PathsConfig {
    pub fn recipients_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.recipients_file)
    }

    pub fn seen_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.seen_file)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            recipients_file: defaults::recipients_file(),
            seen_file: defaults::seen_file(),
        }
    }
}

mod defaults {
    // Site defaults
    pub fn base_url() -> String {
        "https://tender.2merkato.com".into()
    }
    pub fn listing_path() -> String {
        "/tenders".into()
    }
    pub fn categories() -> Option<String> {
        Some("61bbe243cfb36d443e8959ff".into())
    }

    // Scrape defaults
    pub fn max_pages() -> u32 {
        10
    }
    pub fn max_initial_send() -> usize {
        10
    }
    pub fn timeout() -> u64 {
        20
    }
    pub fn politeness_delay() -> u64 {
        2000
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; tender-watch/0.1)".into()
    }

    // Telegram defaults
    pub fn token_env() -> String {
        "TELEGRAM_BOT_TOKEN".into()
    }

    // Path defaults
    pub fn recipients_file() -> String {
        "chat_ids.json".into()
    }
    pub fn seen_file() -> String {
        "sent_tenders.json".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.scrape.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_pages() {
        let mut config = Config::default();
        config.scrape.max_pages = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.site.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn page_url_includes_filter_and_page() {
        let site = SiteConfig::default();
        let url = site.page_url(3).unwrap();
        assert_eq!(
            url.as_str(),
            "https://tender.2merkato.com/tenders?categories=61bbe243cfb36d443e8959ff&page=3"
        );
    }

    #[test]
    fn page_url_without_filter() {
        let site = SiteConfig {
            categories: None,
            ..SiteConfig::default()
        };
        let url = site.page_url(1).unwrap();
        assert_eq!(url.as_str(), "https://tender.2merkato.com/tenders?page=1");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [scrape]
            max_pages = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.scrape.max_pages, 3);
        assert_eq!(config.scrape.max_initial_send, 10);
        assert_eq!(config.paths.seen_file, "sent_tenders.json");
    }

    #[test]
    fn bot_token_missing_is_config_error() {
        let mut config = Config::default();
        config.telegram.token_env = "TENDER_WATCH_TEST_UNSET_TOKEN".to_string();
        assert!(matches!(config.bot_token(), Err(AppError::Config(_))));
    }
}
