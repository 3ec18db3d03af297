use super::engine::DocumentStore;
use super::memory::InMemoryDocumentStore;
use crate::core::{DashboardDocument, Result, StoreError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Test double with injectable failures and latency.
pub struct FakeStore {
    pub inner: InMemoryDocumentStore,
    pub failing_ids: HashSet<String>,
    pub fail_count: bool,
    pub read_delay: Duration,
    pub find_calls: AtomicU64,
    pub count_calls: AtomicU64,
}

impl FakeStore {
    pub fn new(documents: impl IntoIterator<Item = DashboardDocument>) -> Self {
        Self {
            inner: InMemoryDocumentStore::from_documents(documents),
            failing_ids: HashSet::new(),
            fail_count: false,
            read_delay: Duration::ZERO,
            find_calls: AtomicU64::new(0),
            count_calls: AtomicU64::new(0),
        }
    }

    /// Make reads of `id` fail with a query error.
    pub fn failing_on(mut self, id: impl Into<String>) -> Self {
        self.failing_ids.insert(id.into());
        self
    }

    pub fn failing_count(mut self) -> Self {
        self.fail_count = true;
        self
    }

    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = delay;
        self
    }

    pub fn find_calls(&self) -> u64 {
        self.find_calls.load(Ordering::Relaxed)
    }

    pub fn count_calls(&self) -> u64 {
        self.count_calls.load(Ordering::Relaxed)
    }

    async fn delay(&self) {
        if !self.read_delay.is_zero() {
            tokio::time::sleep(self.read_delay).await;
        }
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<DashboardDocument>> {
        self.find_calls.fetch_add(1, Ordering::Relaxed);
        self.delay().await;
        if self.failing_ids.contains(id) {
            return Err(StoreError::Query(format!("injected failure reading {id}")));
        }
        self.inner.find_by_id(id).await
    }

    async fn count_by_id_prefix(&self, prefix: &str) -> Result<u64> {
        self.count_calls.fetch_add(1, Ordering::Relaxed);
        self.delay().await;
        if self.fail_count {
            return Err(StoreError::Query("injected count failure".to_string()));
        }
        self.inner.count_by_id_prefix(prefix).await
    }
}
