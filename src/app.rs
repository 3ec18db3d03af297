use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    config::{AppConfig, StoreBackend},
    dashboard::Dashboard,
    reader::BucketReader,
    storage::{DocumentStore, InMemoryDocumentStore, MongoDocumentStore},
};

/// Opens the process-wide document store selected by the configuration.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::MongoDb => {
            info!(uri = %config.store.redacted_uri(), "document store backend: mongodb");
            let store = MongoDocumentStore::connect(&config.store)
                .await
                .context("failed to create MongoDB client")?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            info!(fixture = %config.fixture_path.display(), "document store backend: memory");
            let store = InMemoryDocumentStore::load_fixture(&config.fixture_path)
                .await
                .with_context(|| {
                    format!("failed to load fixture {}", config.fixture_path.display())
                })?;
            Arc::new(store)
        }
    };

    Ok(store)
}

pub fn build_dashboard(store: Arc<dyn DocumentStore>, config: &AppConfig) -> Dashboard {
    Dashboard::new(BucketReader::new(store, &config.store))
}
