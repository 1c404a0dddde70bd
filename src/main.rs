use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use stock_watcher::command_handler::{CommandHandler, StatusInfo};
use stock_watcher::config::LoggingConfig;
use stock_watcher::plugins::notifiers::TelegramNotifier;
use stock_watcher::scheduler::CheckScheduler;
use stock_watcher::store::OffsetStore;
use stock_watcher::{AppConfig, StockMonitor};

#[derive(Parser)]
#[command(name = "stock-watcher", version, about = "Watch product pages for stock availability")]
struct Cli {
    /// Configuration file layered over config/default, config/{RUN_MODE} and config/local
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one availability check; exits 1 if any product check failed
    Check,
    /// Check repeatedly at the configured interval until Ctrl-C
    Watch,
    /// Process pending chat commands; exits 0 if /check was requested
    Poll {
        /// Run the requested check in this process
        #[arg(long)]
        run_check: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let _guard = init_tracing(&config.logging)?;

    tracing::info!("Starting stock watcher with {} products", config.products.len());

    let notifier = Arc::new(TelegramNotifier::from_config(&config.telegram)?);

    match cli.command {
        Commands::Check => {
            let outcome = StockMonitor::from_config(&config, notifier).run_check().await;
            Ok(ExitCode::from(outcome.exit_code()))
        }
        Commands::Watch => {
            let monitor = Arc::new(StockMonitor::from_config(&config, notifier));
            let cycles = CheckScheduler::from_config(monitor, &config.scheduler).run().await;
            tracing::info!("Shutting down after {} check cycles", cycles);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Poll { run_check } => {
            let handler = CommandHandler::new(
                notifier.clone(),
                notifier.clone(),
                OffsetStore::from_config(&config.store),
                notifier.authorized_chat_id().map(str::to_string),
                StatusInfo {
                    check_interval_minutes: config.scheduler.check_interval_minutes,
                    product_count: config.products.len(),
                },
            );

            let outcome = handler.process().await;
            if !outcome.check_requested {
                tracing::info!("No /check command received");
            } else if run_check {
                tracing::info!("/check command received - running availability check");
                StockMonitor::from_config(&config, notifier).run_check().await;
            } else {
                tracing::info!("/check command received - triggering availability check");
            }
            Ok(ExitCode::from(outcome.exit_code()))
        }
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("stock_watcher=info"))?;

    let (file_layer, guard) = match &logging.file {
        Some(path) => {
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;

            let appender = tracing_appender::rolling::never(
                directory.unwrap_or_else(|| std::path::Path::new(".")),
                file_name,
            );
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}
