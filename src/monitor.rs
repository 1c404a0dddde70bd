use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::change_detector::{self, ChangeReport};
use crate::classifier::AvailabilityClassifier;
use crate::config::AppConfig;
use crate::formatter;
use crate::models::{CheckBatch, CheckResult, Product};
use crate::plugins::traits::NotifierPlugin;
use crate::scraper::{FetcherFactory, PageFetcher, ScraperFactory};
use crate::store::ResultStore;

/// Everything one check cycle produced.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub batch: CheckBatch,
    pub report: ChangeReport,
    pub message: String,
    pub notified: bool,
}

impl CheckOutcome {
    pub fn has_errors(&self) -> bool {
        self.batch.has_errors()
    }

    /// Process exit code for a one-shot check: 1 if any product ended in ERROR.
    pub fn exit_code(&self) -> u8 {
        if self.has_errors() { 1 } else { 0 }
    }
}

/// Runs check cycles: fetch and classify every product, persist the batch,
/// compare with the previous one, and notify when warranted.
///
/// Each cycle opens its own fetch session, so a browser never outlives the
/// cycle that launched it.
pub struct StockMonitor {
    products: Vec<Product>,
    fetchers: Arc<dyn FetcherFactory>,
    classifier: AvailabilityClassifier,
    store: ResultStore,
    notifier: Arc<dyn NotifierPlugin>,
    request_delay: Duration,
}

impl StockMonitor {
    pub fn new(
        products: Vec<Product>,
        fetchers: Arc<dyn FetcherFactory>,
        classifier: AvailabilityClassifier,
        store: ResultStore,
        notifier: Arc<dyn NotifierPlugin>,
        request_delay: Duration,
    ) -> Self {
        Self {
            products,
            fetchers,
            classifier,
            store,
            notifier,
            request_delay,
        }
    }

    /// Wire a monitor from configuration; `scraper.mode` picks the fetcher.
    pub fn from_config(config: &AppConfig, notifier: Arc<dyn NotifierPlugin>) -> Self {
        Self::new(
            config.products.clone(),
            Arc::new(ScraperFactory::new(config.scraper.clone())),
            AvailabilityClassifier::with_default_rules(),
            ResultStore::from_config(&config.store),
            notifier,
            Duration::from_millis(config.scraper.request_delay_ms),
        )
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Check a single product in a session of its own. Always yields a
    /// result; failures become ERROR entries.
    pub async fn check_product(&self, product: &Product) -> CheckResult {
        match self.fetchers.create() {
            Ok(fetcher) => self.check_with(fetcher.as_ref(), product).await,
            Err(e) => {
                tracing::error!("Failed to open fetch session: {}", e);
                CheckResult::failed(product, e.to_string())
            }
        }
    }

    async fn check_with(&self, fetcher: &dyn PageFetcher, product: &Product) -> CheckResult {
        tracing::info!("Checking {}...", product.name);

        match fetcher.fetch(product).await {
            Ok(page) => {
                let classification = self.classifier.classify(&page);
                let result = CheckResult::classified(product, classification.availability);
                tracing::info!("  → {}: {}", product.name, result.status);
                result
            }
            Err(e) => {
                tracing::error!("Error while checking {}: {}", product.name, e);
                CheckResult::failed(product, e.to_string())
            }
        }
    }

    pub async fn run_check(&self) -> CheckOutcome {
        tracing::info!("Starting availability check - {}", Utc::now().format("%Y-%m-%d %H:%M:%S"));

        let previous = self.store.load_last_batch();

        let mut results = Vec::with_capacity(self.products.len());
        match self.fetchers.create() {
            Ok(fetcher) => {
                for (index, product) in self.products.iter().enumerate() {
                    if index > 0 && !self.request_delay.is_zero() {
                        tokio::time::sleep(self.request_delay).await;
                    }
                    results.push(self.check_with(fetcher.as_ref(), product).await);
                }
            }
            Err(e) => {
                tracing::error!("Failed to open fetch session: {}", e);
                let message = e.to_string();
                results.extend(
                    self.products
                        .iter()
                        .map(|product| CheckResult::failed(product, message.clone())),
                );
            }
        }

        let batch = CheckBatch::new(results);
        if let Err(e) = self.store.append(batch.clone()) {
            tracing::error!("Failed to save results: {}", e);
        }

        let report = change_detector::detect_changes(
            previous.as_ref().map(|prev| prev.results.as_slice()),
            &batch.results,
        );
        let message = formatter::format_report(&batch.results, &report, batch.check_time);

        let notified = if report.should_notify() {
            self.send_notification(&message).await
        } else {
            tracing::info!("No status change, notification skipped");
            tracing::debug!("Message that would have been sent:\n{}", message);
            false
        };

        tracing::info!("Summary:");
        for line in formatter::summary_lines(&batch.results) {
            tracing::info!("  {}", line);
        }

        CheckOutcome {
            batch,
            report,
            message,
            notified,
        }
    }

    async fn send_notification(&self, message: &str) -> bool {
        tracing::info!("Sending {} notification...", self.notifier.name());

        match self.notifier.notify(message).await {
            Ok(result) if result.success => true,
            Ok(result) => {
                tracing::warn!(
                    "Notification not delivered: {}",
                    result.error.unwrap_or_else(|| "unknown reason".to_string())
                );
                false
            }
            Err(e) => {
                tracing::error!("Failed to send notification: {}", e);
                false
            }
        }
    }
}
