use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SchedulerConfig;
use crate::monitor::StockMonitor;

/// Continuous mode: one check cycle, then a flat sleep, until shut down.
pub struct CheckScheduler {
    monitor: Arc<StockMonitor>,
    interval: Duration,
}

impl CheckScheduler {
    pub fn new(monitor: Arc<StockMonitor>, interval: Duration) -> Self {
        Self { monitor, interval }
    }

    pub fn from_config(monitor: Arc<StockMonitor>, config: &SchedulerConfig) -> Self {
        Self::new(monitor, Duration::from_secs(config.check_interval_minutes * 60))
    }

    /// Run until Ctrl-C.
    pub async fn run(&self) -> usize {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run cycles until `shutdown` resolves and return how many were started.
    /// A cycle in progress is interrupted at its next await point.
    pub async fn run_until<F>(&self, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        tracing::info!(
            "Continuous mode started - checking every {} minutes",
            self.interval.as_secs() / 60
        );

        tokio::pin!(shutdown);
        let mut cycles = 0;

        loop {
            cycles += 1;
            let cycle = async {
                self.monitor.run_check().await;
                tracing::info!("Next check in {} minutes...", self.interval.as_secs() / 60);
                tokio::time::sleep(self.interval).await;
            };

            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Monitoring stopped by user");
                    return cycles;
                }
                _ = cycle => {}
            }
        }
    }
}
