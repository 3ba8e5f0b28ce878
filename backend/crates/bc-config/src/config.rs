use crate::{
    ApiConfig, CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR, DatabaseConfig, DispatchConfig, GatewayConfig, LoggingConfig,
    PublisherConfig, ServerConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub dispatch: DispatchConfig,
    pub publisher: PublisherConfig,
    pub gateway: GatewayConfig,
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// Loading order:
    /// 1. BC_CONFIG_DIR env var, else ./.bc/ (created when missing)
    /// 2. config.toml from that directory if present, else defaults
    /// 3. BC_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// BC_CONFIG_DIR env var, else ./.bc/ relative to the working directory
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate every section; call once at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.dispatch.validate()?;
        self.publisher.validate()?;
        self.gateway.validate()?;
        self.api.validate()?;

        Ok(())
    }

    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.database.path))
    }

    pub fn log_dir(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.logging.dir))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);
        info!("  database: {}", self.database.path);
        info!(
            "  logging: {} (colored: {}, file: {})",
            *self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );
        for (target, level) in &self.logging.targets {
            info!("  logging target {}: {}", target, **level);
        }
        info!(
            "  dispatch: batch={}, delay={}-{}ms, timeout={}s, workers={}, quota={}/min",
            self.dispatch.batch_size,
            self.dispatch.min_delay_ms,
            self.dispatch.max_delay_ms,
            self.dispatch.send_timeout_secs,
            self.dispatch.worker_pool_size,
            self.dispatch.max_sends_per_minute
        );
        info!(
            "  publisher: channel_capacity={}",
            self.publisher.channel_capacity
        );
        info!(
            "  gateway: {} ({} senders, timeout {}s)",
            self.gateway.base_url(),
            self.gateway.senders.len(),
            self.gateway.request_timeout_secs
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("BC_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("BC_SERVER_PORT", &mut self.server.port);

        // Database
        Self::apply_env_string("BC_DATABASE_PATH", &mut self.database.path);

        // Logging
        Self::apply_env_parse("BC_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("BC_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("BC_LOG_FILE", &mut self.logging.file);

        // Dispatch
        Self::apply_env_parse("BC_DISPATCH_BATCH_SIZE", &mut self.dispatch.batch_size);
        Self::apply_env_parse("BC_DISPATCH_MIN_DELAY_MS", &mut self.dispatch.min_delay_ms);
        Self::apply_env_parse("BC_DISPATCH_MAX_DELAY_MS", &mut self.dispatch.max_delay_ms);
        Self::apply_env_parse(
            "BC_DISPATCH_SEND_TIMEOUT_SECS",
            &mut self.dispatch.send_timeout_secs,
        );
        Self::apply_env_parse(
            "BC_DISPATCH_WORKER_POOL_SIZE",
            &mut self.dispatch.worker_pool_size,
        );
        Self::apply_env_parse(
            "BC_DISPATCH_POLL_INTERVAL_MS",
            &mut self.dispatch.poll_interval_ms,
        );
        Self::apply_env_parse(
            "BC_DISPATCH_MAX_SENDS_PER_MINUTE",
            &mut self.dispatch.max_sends_per_minute,
        );

        // Publisher
        Self::apply_env_parse(
            "BC_PUBLISHER_CHANNEL_CAPACITY",
            &mut self.publisher.channel_capacity,
        );

        // Gateway
        Self::apply_env_string("BC_GATEWAY_BASE_URL", &mut self.gateway.base_url);
        Self::apply_env_parse(
            "BC_GATEWAY_REQUEST_TIMEOUT_SECS",
            &mut self.gateway.request_timeout_secs,
        );

        // Api
        Self::apply_env_string("BC_API_DEFAULT_USER_ID", &mut self.api.default_user_id);
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Accepts "true"/"1"
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Unparseable values leave the target untouched
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
