//! Configuration management for PriceScout.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. The bot token is never read from or
//! written to the config file; it only comes from [`BOT_TOKEN_ENV`].

use crate::error::{ConfigError, ConfigResult};
use crate::types::{Marketplace, MIN_QUERY_CHARS};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the Telegram bot token.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable pointing at an explicit config file.
pub const CONFIG_PATH_ENV: &str = "PRICESCOUT_CONFIG";

/// Main application configuration.
///
/// This is loaded from `~/.config/pricescout/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Chat boundary settings
    pub telegram: TelegramConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Search pipeline settings
    pub search: SearchConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => PathBuf::from(path),
            Err(_) => Self::config_path()?,
        };
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file, using defaults if it is absent.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `TELEGRAM_BOT_TOKEN`: Bot token (the only source for it)
    /// - `PRICESCOUT_HEADLESS`: Override browser headless mode (true/false)
    /// - `PRICESCOUT_CHROME_PATH`: Override the Chrome executable
    /// - `PRICESCOUT_SOURCES_DIR`: Override the source definitions directory
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(BOT_TOKEN_ENV) {
            let token = token.trim().to_string();
            if !token.is_empty() {
                self.telegram.bot_token = Some(token);
            }
        }

        if let Some(val) = lookup("PRICESCOUT_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Some(val) = lookup("PRICESCOUT_CHROME_PATH") {
            tracing::debug!("Override browser.chrome_executable from env: {}", val);
            self.browser.chrome_executable = Some(PathBuf::from(val));
        }

        if let Some(val) = lookup("PRICESCOUT_SOURCES_DIR") {
            tracing::debug!("Override search.sources_dir from env: {}", val);
            self.search.sources_dir = Some(PathBuf::from(val));
        }
    }

    /// The bot token, or the fatal startup error if it is missing.
    pub fn bot_token(&self) -> ConfigResult<&str> {
        self.telegram
            .bot_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingCredential {
                var: BOT_TOKEN_ENV.to_string(),
            })
    }

    /// Check values that would make the search pipeline unusable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.search.min_query_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.min_query_chars".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.search.deadline_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "search.deadline_secs".to_string(),
                reason: "must be positive when set".to_string(),
            });
        }
        if self.search.max_concurrent_searches == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.max_concurrent_searches".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.telegram.poll_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "telegram.poll_timeout_secs".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/pricescout/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "pricescout", "pricescout").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Telegram bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token (from `TELEGRAM_BOT_TOKEN`, never stored in the file)
    #[serde(skip)]
    pub bot_token: Option<String>,
    /// Bot API base URL
    pub api_base_url: String,
    /// Long-polling timeout in seconds
    pub poll_timeout_secs: u64,
    /// Image sent when a listing has no thumbnail
    pub placeholder_image: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base_url: "https://api.telegram.org".to_string(),
            poll_timeout_secs: 30,
            placeholder_image: "https://via.placeholder.com/300x200".to_string(),
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// User agent override
    pub user_agent: Option<String>,
    /// Explicit Chrome/Chromium executable
    pub chrome_executable: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1366,
            window_height: 768,
            user_agent: None,
            chrome_executable: None,
        }
    }
}

/// Search pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum query length in characters
    pub min_query_chars: usize,
    /// Upper bound on each extractor's run, on top of its own timeouts
    pub deadline_secs: Option<u64>,
    /// Searches allowed to hold a browser at once; each one runs its own Chrome
    pub max_concurrent_searches: usize,
    /// Directory with `*.toml` source definitions overriding the built-ins
    pub sources_dir: Option<PathBuf>,
    /// Marketplaces to skip
    pub disabled: Vec<Marketplace>,
}

impl SearchConfig {
    /// Coordinator deadline as a `Duration`.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_chars: MIN_QUERY_CHARS,
            deadline_secs: Some(60),
            max_concurrent_searches: 2,
            sources_dir: None,
            disabled: Vec::new(),
        }
    }
}
