pub mod change_detector;
pub mod classifier;
pub mod command_handler;
pub mod config;
pub mod element_finder;
pub mod formatter;
pub mod models;
pub mod monitor;
pub mod plugins;
pub mod scheduler;
pub mod scraper;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use monitor::StockMonitor;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
