use crate::core::{DEFAULT_BUCKET_PREFIX, DEFAULT_SNAPSHOT_ID};
use std::time::Duration;

/// Document store connection configuration
///
/// Names the database, collection and document ids the dashboard reads,
/// plus pool and timeout settings for the shared client.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Connection string, e.g. `mongodb://localhost:27017`
    pub uri: String,

    /// Database holding the dashboard collection
    pub database: String,

    /// Collection holding the snapshot and bucket documents
    pub collection: String,

    /// Id of the recent-alerts snapshot document
    pub snapshot_id: String,

    /// Id prefix shared by all priority bucket documents
    pub bucket_prefix: String,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Per-read timeout; `None` lets a read wait indefinitely
    pub query_timeout: Option<Duration>,

    /// Maximum number of pooled connections
    pub max_pool_size: u32,

    /// Minimum number of pooled connections
    pub min_pool_size: u32,

    /// Application name reported to the server
    pub app_name: String,
}

impl StoreConfig {
    /// Create a new configuration for the given connection string
    pub fn new(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            database: "alertdb".to_string(),
            collection: "dashboard".to_string(),
            snapshot_id: DEFAULT_SNAPSHOT_ID.to_string(),
            bucket_prefix: DEFAULT_BUCKET_PREFIX.to_string(),
            connect_timeout: Duration::from_secs(10),
            query_timeout: Some(Duration::from_secs(5)),
            max_pool_size: 10,
            min_pool_size: 0,
            app_name: "alertdash".to_string(),
        }
    }

    /// Set the database name
    pub fn database(mut self, database: &str) -> Self {
        self.database = database.to_string();
        self
    }

    /// Set the collection name
    pub fn collection(mut self, collection: &str) -> Self {
        self.collection = collection.to_string();
        self
    }

    /// Set the snapshot document id
    pub fn snapshot_id(mut self, id: &str) -> Self {
        self.snapshot_id = id.to_string();
        self
    }

    /// Set the bucket id prefix
    pub fn bucket_prefix(mut self, prefix: &str) -> Self {
        self.bucket_prefix = prefix.to_string();
        self
    }

    /// Set connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set query timeout; `None` disables it
    pub fn query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Set maximum pool size
    pub fn max_pool_size(mut self, max: u32) -> Self {
        self.max_pool_size = max;
        self
    }

    /// Set minimum pool size
    pub fn min_pool_size(mut self, min: u32) -> Self {
        self.min_pool_size = min;
        self
    }

    /// Connection string with any password replaced by `***`
    pub fn redacted_uri(&self) -> String {
        let Some((scheme, rest)) = self.uri.split_once("://") else {
            return self.uri.clone();
        };
        let Some((credentials, host)) = rest.rsplit_once('@') else {
            return self.uri.clone();
        };

        match credentials.split_once(':') {
            Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
            None => format!("{scheme}://{credentials}@{host}"),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.uri.is_empty() {
            return Err("uri cannot be empty".to_string());
        }

        if self.database.is_empty() {
            return Err("database cannot be empty".to_string());
        }

        if self.collection.is_empty() {
            return Err("collection cannot be empty".to_string());
        }

        if self.snapshot_id.is_empty() {
            return Err("snapshot_id cannot be empty".to_string());
        }

        if self.bucket_prefix.is_empty() {
            return Err("bucket_prefix cannot be empty".to_string());
        }

        if self.max_pool_size == 0 {
            return Err("max_pool_size must be > 0".to_string());
        }

        if self.min_pool_size > self.max_pool_size {
            return Err("min_pool_size cannot exceed max_pool_size".to_string());
        }

        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("mongodb://localhost:27017")
    }
}
