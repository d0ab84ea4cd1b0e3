use log::{info, warn};
use std::env;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub host: String,
    /// Path of the SQLite database. `None` runs the service without storage.
    pub database_url: Option<String>,
    pub debug_endpoints: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "127.0.0.1".to_string(),
            database_url: None,
            debug_endpoints: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = lookup("BREWLOG_PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let host = lookup("BREWLOG_HOST").unwrap_or(defaults.host);

        let database_url = lookup("BREWLOG_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let debug_endpoints = lookup("BREWLOG_DEBUG_ENDPOINTS")
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(defaults.debug_endpoints);

        info!("Configuration loaded:");
        info!("  Host: {host}");
        info!("  Port: {port}");
        match &database_url {
            Some(url) => info!("  Database URL: {url}"),
            None => warn!("  Database URL not set; lists will be empty and writes refused"),
        }
        info!("  Debug endpoints: {debug_endpoints}");

        Self {
            port,
            host,
            database_url,
            debug_endpoints,
        }
    }
}
