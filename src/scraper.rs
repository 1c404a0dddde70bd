use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{FetchMode, ScraperConfig};
use crate::element_finder;
use crate::models::{ButtonDescriptor, Cursor, PageSnapshot, Product};
use crate::utils::error::{AppError, Result};

/// Time given to client-side scripts after navigation before the page is read.
const BROWSER_SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Collects every button's rendered text and computed cursor as a JSON string.
const BUTTON_SCAN_JS: &str = r#"
    JSON.stringify(Array.from(document.querySelectorAll('button')).map(function (b) {
        return { text: b.innerText || b.textContent || '', cursor: window.getComputedStyle(b).cursor || '' };
    }))
"#;

/// Fetches a product page and reduces it to a [`PageSnapshot`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, product: &Product) -> Result<PageSnapshot>;
}

/// Opens a fetch session for one check cycle. The session, and any browser
/// behind it, lives until the returned fetcher is dropped.
#[cfg_attr(test, mockall::automock)]
pub trait FetcherFactory: Send + Sync {
    fn create(&self) -> Result<Arc<dyn PageFetcher>>;
}

/// Builds the fetcher selected by `scraper.mode`.
pub struct ScraperFactory {
    config: ScraperConfig,
}

impl ScraperFactory {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }
}

impl FetcherFactory for ScraperFactory {
    fn create(&self) -> Result<Arc<dyn PageFetcher>> {
        let fetcher: Arc<dyn PageFetcher> = match self.config.mode {
            FetchMode::Http => Arc::new(HttpFetcher::new(&self.config)?),
            FetchMode::Browser => Arc::new(BrowserFetcher::new(&self.config)?),
        };
        Ok(fetcher)
    }
}

/// Plain HTTP fetcher; HTML is parsed locally, buttons carry no cursor.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, product: &Product) -> Result<PageSnapshot> {
        let response = self
            .client
            .get(&product.url)
            .send()
            .await
            .map_err(|e| AppError::fetch(&product.url, e))?
            .error_for_status()
            .map_err(|e| AppError::fetch(&product.url, e))?;

        let body = response
            .text()
            .await
            .map_err(|e| AppError::fetch(&product.url, e))?;

        Ok(element_finder::snapshot_from_html(&body))
    }
}

#[derive(Debug, Deserialize)]
struct RawButton {
    text: String,
    cursor: String,
}

/// Headless Chrome fetcher. Sees script-rendered content and reports each
/// button's computed cursor, so disabled purchase buttons can be told apart.
pub struct BrowserFetcher {
    browser: Arc<Browser>,
    user_agent: String,
    settle_delay: Duration,
}

impl BrowserFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let user_agent_arg = format!("--user-agent={}", config.user_agent);
        let mut launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false) // Often needed in containerized environments
            .idle_browser_timeout(Duration::from_secs(config.request_timeout.max(30) * 4))
            .args(vec![
                std::ffi::OsStr::new("--no-sandbox"),
                std::ffi::OsStr::new("--disable-dev-shm-usage"),
                std::ffi::OsStr::new("--disable-blink-features=AutomationControlled"),
                std::ffi::OsStr::new(user_agent_arg.as_str()),
            ])
            .build()
            .map_err(|e| AppError::Browser(format!("Failed to create launch options: {}", e)))?;

        // Set Chrome path if provided
        if let Some(chrome_path) = &config.chrome_path {
            launch_options.path = Some(std::path::PathBuf::from(chrome_path));
        }

        let browser = Browser::new(launch_options)
            .map_err(|e| AppError::Browser(format!("Failed to launch browser: {}", e)))?;

        Ok(Self {
            browser: Arc::new(browser),
            user_agent: config.user_agent.clone(),
            settle_delay: BROWSER_SETTLE_DELAY,
        })
    }

    fn capture(browser: &Browser, url: &str, user_agent: &str, settle_delay: Duration) -> Result<PageSnapshot> {
        let tab = browser.new_tab().map_err(|e| AppError::fetch(url, e))?;

        let snapshot = Self::capture_in_tab(&tab, url, user_agent, settle_delay);

        close_reported(url, tab.close(true));
        snapshot
    }

    fn capture_in_tab(tab: &Tab, url: &str, user_agent: &str, settle_delay: Duration) -> Result<PageSnapshot> {
        tab.set_user_agent(user_agent, None, None)
            .map_err(|e| AppError::fetch(url, format!("Failed to set user agent: {}", e)))?;
        tab.navigate_to(url)
            .map_err(|e| AppError::fetch(url, format!("Navigation failed: {}", e)))?;
        tab.wait_until_navigated()
            .map_err(|e| AppError::fetch(url, format!("Page load failed: {}", e)))?;

        std::thread::sleep(settle_delay);

        let source = tab
            .get_content()
            .map_err(|e| AppError::fetch(url, format!("Failed to get page content: {}", e)))?;

        let buttons = match Self::scan_buttons(tab) {
            Ok(buttons) => buttons,
            Err(e) => {
                tracing::warn!("Button scan failed for {}: {}", url, e);
                Vec::new()
            }
        };

        Ok(PageSnapshot::new(&element_finder::visible_text(&source), buttons))
    }

    fn scan_buttons(tab: &Tab) -> Result<Vec<ButtonDescriptor>> {
        let result = tab
            .evaluate(BUTTON_SCAN_JS, false)
            .map_err(|e| AppError::Browser(format!("Button scan evaluation failed: {}", e)))?;

        let payload = result
            .value
            .as_ref()
            .and_then(|value| value.as_str())
            .ok_or_else(|| AppError::Browser("Button scan returned no value".to_string()))?;

        parse_button_payload(payload)
    }
}

/// Log a failed tab close; returns whether the tab closed cleanly.
fn close_reported<T, E: std::fmt::Display>(url: &str, closed: std::result::Result<T, E>) -> bool {
    match closed {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Failed to close tab for {}: {}", url, e);
            false
        }
    }
}

/// Decode the JSON emitted by the button scan script.
pub fn parse_button_payload(payload: &str) -> Result<Vec<ButtonDescriptor>> {
    let raw: Vec<RawButton> = serde_json::from_str(payload)?;
    Ok(raw
        .into_iter()
        .map(|button| {
            let cursor = if button.cursor.trim().is_empty() {
                None
            } else {
                Some(Cursor::from_css(&button.cursor))
            };
            ButtonDescriptor::new(&button.text, cursor)
        })
        .collect())
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, product: &Product) -> Result<PageSnapshot> {
        let browser = Arc::clone(&self.browser);
        let url = product.url.clone();
        let user_agent = self.user_agent.clone();
        let settle_delay = self.settle_delay;

        // headless_chrome is blocking; keep it off the async workers.
        tokio::task::spawn_blocking(move || Self::capture(&browser, &url, &user_agent, settle_delay))
            .await
            .map_err(|e| AppError::Browser(format!("Browser task failed: {}", e)))?
    }
}
