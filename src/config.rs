use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use url::Url;
use validator::Validate;

use crate::models::Product;
use crate::utils::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[serde(default)]
    #[validate(nested)]
    pub products: Vec<Product>,
    pub scraper: ScraperConfig,
    pub store: StoreConfig,
    pub telegram: TelegramConfig,
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Plain HTTP request, HTML parsed locally.
    Http,
    /// Headless Chrome, with rendered button state.
    Browser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub mode: FetchMode,
    pub user_agent: String,
    pub request_timeout: u64,
    pub request_delay_ms: u64,
    pub chrome_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub log_file: PathBuf,
    pub max_batches: usize,
    pub offset_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base_url: String,
    pub send_timeout: u64,
    pub poll_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub check_interval_minutes: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub file: Option<PathBuf>,
}

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

impl AppConfig {
    /// Layered load: built-in defaults, `config/default`, `config/{RUN_MODE}`,
    /// `config/local`, an explicit file, then `WATCHER__*` environment variables.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Self::with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local config (ignored by git)
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        let s = builder
            .add_source(Environment::with_prefix("WATCHER").separator("__"))
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;
        config.apply_env_fallbacks(|key| env::var(key).ok());
        config.verify()?;
        Ok(config)
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("scraper.mode", "http")?
            .set_default("scraper.user_agent", DEFAULT_USER_AGENT)?
            .set_default("scraper.request_timeout", 15)?
            .set_default("scraper.request_delay_ms", 2000)?
            .set_default("store.log_file", "availability_log.json")?
            .set_default("store.max_batches", 100)?
            .set_default("store.offset_file", "last_update_id.txt")?
            .set_default("telegram.api_base_url", "https://api.telegram.org")?
            .set_default("telegram.send_timeout", 10)?
            .set_default("telegram.poll_timeout", 10)?
            .set_default("scheduler.check_interval_minutes", 60)
    }

    /// Fill credentials and the Chrome path from their conventional plain
    /// environment variables when no configuration source set them.
    pub fn apply_env_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if self.telegram.bot_token.is_none() {
            self.telegram.bot_token = non_empty("TELEGRAM_BOT_TOKEN");
        }
        if self.telegram.chat_id.is_none() {
            self.telegram.chat_id = non_empty("TELEGRAM_CHAT_ID");
        }
        if self.scraper.chrome_path.is_none() {
            self.scraper.chrome_path = non_empty("CHROME_PATH");
        }
    }

    /// Field-level validation plus the cross-field rules the derive can't express.
    ///
    /// Missing Telegram credentials are deliberately accepted here; the
    /// notifier degrades to a no-op instead.
    pub fn verify(&self) -> Result<(), AppError> {
        if self.products.is_empty() {
            return Err(AppError::Validation("At least one product must be configured".into()));
        }

        Validate::validate(self)?;

        let mut names = HashSet::new();
        for product in &self.products {
            if !names.insert(product.name.as_str()) {
                return Err(AppError::Validation(format!(
                    "Duplicate product name: {}",
                    product.name
                )));
            }
        }

        if self.scraper.request_timeout == 0 {
            return Err(AppError::Validation("Scraper request_timeout must be greater than 0".into()));
        }

        if self.scraper.request_delay_ms == 0 {
            return Err(AppError::Validation(
                "Scraper request_delay_ms must be greater than 0".into(),
            ));
        }

        if self.store.max_batches == 0 {
            return Err(AppError::Validation("Store max_batches must be greater than 0".into()));
        }

        if Url::parse(&self.telegram.api_base_url).is_err() {
            return Err(AppError::Validation("Invalid Telegram api_base_url format".into()));
        }

        if self.telegram.send_timeout == 0 {
            return Err(AppError::Validation("Telegram send_timeout must be greater than 0".into()));
        }

        if self.scheduler.check_interval_minutes == 0 {
            return Err(AppError::Validation(
                "Scheduler check_interval_minutes must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
