mod api_config;
mod config;
mod database_config;
mod dispatch_config;
mod error;
mod gateway_config;
mod log_level;
mod logging_config;
mod publisher_config;
mod server_config;

#[cfg(test)]
mod tests;

pub use api_config::ApiConfig;
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use dispatch_config::DispatchConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use gateway_config::{GatewayConfig, SenderConfig};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use publisher_config::PublisherConfig;
pub use server_config::ServerConfig;

const CONFIG_DIR_ENV: &str = "BC_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".bc";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const MIN_PORT: u16 = 1024;

const DEFAULT_DATABASE_FILENAME: &str = "broadcast.db";

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
