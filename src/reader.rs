//! Bucket Reader
//!
//! Single-document reads against the pre-aggregated dashboard collection:
//! the recent-alerts snapshot, the number of priority buckets, and one
//! priority bucket by index. A missing document is a normal state and
//! reads as empty; any other failure is logged here and handed back as
//! `Err` so callers can tell the two apart.

use crate::connection::StoreConfig;
use crate::core::{Alert, BucketIndex, Result, StoreError, Timed, bucket_key};
use crate::storage::DocumentStore;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Contents of one priority bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriorityBucket {
    /// Alerts oldest-first, as stored
    pub alerts: Vec<Alert>,
    /// Total priority alerts across all buckets, as reported by this bucket
    pub total_count: u64,
}

#[derive(Clone)]
pub struct BucketReader {
    store: Arc<dyn DocumentStore>,
    snapshot_id: String,
    bucket_prefix: String,
    query_timeout: Option<Duration>,
}

impl BucketReader {
    pub fn new(store: Arc<dyn DocumentStore>, config: &StoreConfig) -> Self {
        Self {
            store,
            snapshot_id: config.snapshot_id.clone(),
            bucket_prefix: config.bucket_prefix.clone(),
            query_timeout: config.query_timeout,
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn bucket_prefix(&self) -> &str {
        &self.bucket_prefix
    }

    async fn bounded<T>(&self, read: impl Future<Output = Result<T>>) -> Result<T> {
        match self.query_timeout {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| StoreError::Timeout(limit))?,
            None => read.await,
        }
    }

    /// Reads the recent-alerts snapshot.
    ///
    /// Elapsed time is reported as zero unless the snapshot was found.
    pub async fn recent_alerts(&self) -> Timed<Result<Vec<Alert>>> {
        let started = Instant::now();

        match self.bounded(self.store.find_by_id(&self.snapshot_id)).await {
            Ok(Some(document)) => Timed::new(Ok(document.values), started.elapsed()),
            Ok(None) => {
                debug!(doc_id = %self.snapshot_id, "recent alerts snapshot not found");
                Timed::new(Ok(Vec::new()), Duration::ZERO)
            }
            Err(err) => {
                error!(
                    doc_id = %self.snapshot_id,
                    backend = self.store.backend_tag(),
                    kind = err.kind(),
                    error = %err,
                    "error fetching recent alerts"
                );
                Timed::new(Err(err), Duration::ZERO)
            }
        }
    }

    /// Number of priority bucket documents (not alerts). Zero on failure.
    pub async fn priority_alerts_count(&self) -> Timed<u64> {
        let started = Instant::now();

        match self
            .bounded(self.store.count_by_id_prefix(&self.bucket_prefix))
            .await
        {
            Ok(count) => Timed::new(count, started.elapsed()),
            Err(err) => {
                error!(
                    prefix = %self.bucket_prefix,
                    backend = self.store.backend_tag(),
                    kind = err.kind(),
                    error = %err,
                    "error fetching priority alerts count"
                );
                Timed::new(0, started.elapsed())
            }
        }
    }

    /// Reads the bucket at `index`. A bucket that does not exist yet reads
    /// as an empty bucket with a zero count.
    pub async fn priority_alerts(&self, index: BucketIndex) -> Timed<Result<PriorityBucket>> {
        let started = Instant::now();
        let bucket_id = bucket_key(&self.bucket_prefix, index);

        let value = match self.bounded(self.store.find_by_id(&bucket_id)).await {
            Ok(Some(document)) => Ok(PriorityBucket {
                alerts: document.values,
                total_count: document.count,
            }),
            Ok(None) => {
                debug!(doc_id = %bucket_id, bucket_index = index, "priority bucket not found");
                Ok(PriorityBucket::default())
            }
            Err(err) => {
                error!(
                    doc_id = %bucket_id,
                    bucket_index = index,
                    backend = self.store.backend_tag(),
                    kind = err.kind(),
                    error = %err,
                    "error fetching priority alerts"
                );
                Err(err)
            }
        };

        Timed::new(value, started.elapsed())
    }
}
