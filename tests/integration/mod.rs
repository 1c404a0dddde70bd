// Integration tests for Stock Watcher
// These tests wire real components against local mock servers

pub mod check_cycle_tests;
pub mod command_poller_tests;

use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stock_watcher::{
    StockMonitor,
    classifier::AvailabilityClassifier,
    config::{DEFAULT_USER_AGENT, FetchMode, ScraperConfig, StoreConfig, TelegramConfig},
    models::Product,
    plugins::notifiers::TelegramNotifier,
    scraper::ScraperFactory,
    store::ResultStore,
};

pub const BOT_TOKEN: &str = "123:TEST";
pub const CHAT_ID: i64 = 4242;

pub const AVAILABLE_PAGE: &str = r#"<html><body>
    <h1>VPS 1000 ARM G11</h1>
    <button class="cta">Add to shopping cart</button>
</body></html>"#;

pub const SOLD_OUT_PAGE: &str = r#"<html><body>
    <h1>VPS 1000 ARM G11</h1>
    <p>This product is sold out.</p>
</body></html>"#;

pub fn scraper_config() -> ScraperConfig {
    ScraperConfig {
        mode: FetchMode::Http,
        user_agent: DEFAULT_USER_AGENT.to_string(),
        request_timeout: 5,
        request_delay_ms: 0,
        chrome_path: None,
    }
}

pub fn store_config(dir: &TempDir) -> StoreConfig {
    StoreConfig {
        log_file: dir.path().join("availability_log.json"),
        max_batches: 100,
        offset_file: dir.path().join("last_update_id.txt"),
    }
}

pub fn telegram_config(api_base_url: &str) -> TelegramConfig {
    TelegramConfig {
        bot_token: Some(BOT_TOKEN.to_string()),
        chat_id: Some(CHAT_ID.to_string()),
        api_base_url: api_base_url.to_string(),
        send_timeout: 5,
        poll_timeout: 0,
    }
}

pub fn telegram_notifier(server: &MockServer) -> Arc<TelegramNotifier> {
    Arc::new(TelegramNotifier::from_config(&telegram_config(&server.uri())).expect("notifier"))
}

/// A monitor fetching over HTTP from `pages` and notifying through `telegram`.
pub fn create_test_monitor(
    pages: &MockServer,
    telegram: &MockServer,
    dir: &TempDir,
    product_paths: &[(&str, &str)],
) -> anyhow::Result<StockMonitor> {
    let products = product_paths
        .iter()
        .map(|(name, page)| Product::new(*name, format!("{}{}", pages.uri(), page)))
        .collect();

    Ok(StockMonitor::new(
        products,
        Arc::new(ScraperFactory::new(scraper_config())),
        AvailabilityClassifier::with_default_rules(),
        ResultStore::from_config(&store_config(dir)),
        telegram_notifier(telegram),
        Duration::ZERO,
    ))
}

pub async fn mount_page(server: &MockServer, page: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn mount_send_message(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", BOT_TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"message_id": 1}
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Texts of every sendMessage call the server received, in order.
pub async fn sent_messages(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path().ends_with("/sendMessage"))
        .filter_map(|request| serde_json::from_slice::<Value>(&request.body).ok())
        .filter_map(|body| body["text"].as_str().map(str::to_string))
        .collect()
}
