use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub local_cache: LocalCacheConfig,
    #[serde(default)]
    pub leads: LeadsConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocalCacheConfig {
    pub path: String,
}

impl Default for LocalCacheConfig {
    fn default() -> Self {
        Self {
            path: "target/cache/local_cache.json".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LeadsConfig {
    /// Row cap of a single submissions fetch
    pub fetch_limit: u64,
}

impl Default for LeadsConfig {
    fn default() -> Self {
        Self { fetch_limit: 200 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// File-name stem of the CSV report
    pub name: String,
    pub title: String,
    /// chrono format string for human-facing dates
    pub date_format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            name: "Contact_Analytics_Report".to_string(),
            title: "Contact Analytics Report".to_string(),
            date_format: "%m/%d/%Y, %I:%M:%S %p".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/app.db"

[local_cache]
path = "target/cache/local_cache.json"

[leads]
fetch_limit = 200

[report]
name = "Contact_Analytics_Report"
title = "Contact Analytics Report"
date_format = "%m/%d/%Y, %I:%M:%S %p"

[server]
port = 3000
"#;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    default_config()
}

pub fn default_config() -> anyhow::Result<Config> {
    Ok(toml::from_str(DEFAULT_CONFIG)?)
}

/// Make the loaded configuration available to services
pub fn install(config: Config) {
    if CONFIG.set(config).is_err() {
        tracing::warn!("Configuration already installed, keeping the first one");
    }
}

/// Installed configuration, or the embedded defaults before `install`
pub fn current() -> Config {
    if let Some(cfg) = CONFIG.get() {
        return cfg.clone();
    }
    default_config().unwrap_or_else(|_| Config {
        database: DatabaseConfig {
            path: "target/db/app.db".to_string(),
        },
        local_cache: LocalCacheConfig::default(),
        leads: LeadsConfig::default(),
        report: ReportConfig::default(),
        server: ServerConfig::default(),
    })
}

/// Resolve a configured path; relative paths are taken from the executable directory
pub fn resolve_path(path_str: &str) -> PathBuf {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    PathBuf::from(path_str)
}

/// Get the database file path from configuration
pub fn get_database_path(config: &Config) -> PathBuf {
    resolve_path(&config.database.path)
}

/// Get the local cache file path from configuration
pub fn get_local_cache_path(config: &Config) -> PathBuf {
    resolve_path(&config.local_cache.path)
}
