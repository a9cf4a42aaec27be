use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub unix_socket: Option<PathBuf>,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Append-only log file, survives restarts
    File,
    /// Process memory only
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the remote products collection
    pub products_endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_products_per_page")]
    pub products_per_page: usize,
    #[serde(default = "default_load_on_startup")]
    pub load_on_startup: bool,
}

/// Account seeded into an empty user registry
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_seed_username")]
    pub seed_username: String,
    #[serde(default = "default_seed_email")]
    pub seed_email: String,
    #[serde(default = "default_seed_password")]
    pub seed_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_console")]
    pub console: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            path: default_storage_path(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            products_per_page: default_products_per_page(),
            load_on_startup: default_load_on_startup(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed_username: default_seed_username(),
            seed_email: default_seed_email(),
            seed_password: default_seed_password(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            console: default_console(),
        }
    }
}

// Default value functions
fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::File
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("storefront.log")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_products_per_page() -> usize {
    crate::catalog::filters::DEFAULT_PRODUCTS_PER_PAGE
}

fn default_load_on_startup() -> bool {
    true
}

fn default_seed_username() -> String {
    "testuser".to_string()
}

fn default_seed_email() -> String {
    "test@example.com".to_string()
}

fn default_seed_password() -> String {
    "password123".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_console() -> bool {
    false
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port.is_none() && self.server.unix_socket.is_none() {
            bail!("Either port or unix_socket must be specified in server config");
        }

        if self.server.port == Some(0) {
            bail!("Server port must be greater than 0");
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        if self.storage.backend == StorageBackend::File && self.storage.path.as_os_str().is_empty() {
            bail!("storage path must not be empty for the file backend");
        }

        let endpoint = self.gateway.products_endpoint.as_str();
        if endpoint.is_empty() {
            bail!("products_endpoint must not be empty");
        }

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            bail!("products_endpoint must be an http(s) URL, got '{}'", endpoint);
        }

        if self.gateway.timeout_secs == 0 {
            bail!("timeout_secs must be greater than 0");
        }

        if self.catalog.products_per_page == 0 {
            bail!("products_per_page must be greater than 0");
        }

        if self.session.seed_username.is_empty() || self.session.seed_password.is_empty() {
            bail!("seed_username and seed_password must not be empty");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}
