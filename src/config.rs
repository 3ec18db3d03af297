use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::connection::StoreConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

impl StoreBackend {
    fn from_env(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            "memory" | "in-memory" | "fixture" => Ok(Self::Memory),
            _ => Err(anyhow::anyhow!(
                "STORE_BACKEND must be one of: mongodb, memory"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub store: StoreConfig,
    pub static_dir: PathBuf,
    pub fixture_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `from_env` passes the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("APP_HOST", "0.0.0.0");

        let port = var("APP_PORT", "8080")
            .parse::<u16>()
            .context("APP_PORT must be a valid u16")?;

        let store_backend = StoreBackend::from_env(&var("STORE_BACKEND", "mongodb"))?;

        let max_pool_size = var("STORE_MAX_POOL_SIZE", "10")
            .parse::<u32>()
            .context("STORE_MAX_POOL_SIZE must be a valid u32")?;

        let connect_timeout_ms = var("STORE_CONNECT_TIMEOUT_MS", "10000")
            .parse::<u64>()
            .context("STORE_CONNECT_TIMEOUT_MS must be a valid u64")?;

        let query_timeout_ms = var("STORE_QUERY_TIMEOUT_MS", "5000")
            .parse::<u64>()
            .context("STORE_QUERY_TIMEOUT_MS must be a valid u64")?;
        let query_timeout = (query_timeout_ms > 0).then(|| Duration::from_millis(query_timeout_ms));

        let store = StoreConfig::new(&var("MONGODB_URI", "mongodb://localhost:27017"))
            .database(&var("DASHBOARD_DATABASE", "alertdb"))
            .collection(&var("DASHBOARD_COLLECTION", "dashboard"))
            .snapshot_id(&var("RECENT_SNAPSHOT_ID", "top25"))
            .bucket_prefix(&var("PRIORITY_BUCKET_PREFIX", "priority_bucket_"))
            .max_pool_size(max_pool_size)
            .connect_timeout(Duration::from_millis(connect_timeout_ms))
            .query_timeout(query_timeout);

        store
            .validate()
            .map_err(|msg| anyhow::anyhow!("invalid store configuration: {msg}"))?;

        Ok(Self {
            host,
            port,
            store_backend,
            store,
            static_dir: PathBuf::from(var("STATIC_DIR", "static")),
            fixture_path: PathBuf::from(var("FIXTURE_PATH", "fixtures/sample-dashboard.json")),
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
