use super::engine::{DocumentStore, prefix_pattern};
use crate::core::{DashboardDocument, Result, StoreError};
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

/// In-process document store
///
/// Serves fixtures in development and backs the test doubles. Holds the
/// documents exactly as the aggregation job would have written them.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, DashboardDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: impl IntoIterator<Item = DashboardDocument>) -> Self {
        let documents = documents
            .into_iter()
            .map(|doc| (doc.id.clone(), doc))
            .collect();
        Self {
            documents: RwLock::new(documents),
        }
    }

    /// Load a JSON array of documents (`_id`, `values`, optional `count`).
    pub async fn load_fixture(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| StoreError::Fixture(format!("{}: {err}", path.display())))?;
        let documents: Vec<DashboardDocument> = serde_json::from_str(&raw)?;
        Ok(Self::from_documents(documents))
    }

    /// Insert or replace a document, as the aggregation job's merge step does.
    pub async fn upsert(&self, document: DashboardDocument) {
        self.documents
            .write()
            .await
            .insert(document.id.clone(), document);
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<DashboardDocument>> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn count_by_id_prefix(&self, prefix: &str) -> Result<u64> {
        let pattern =
            Regex::new(&prefix_pattern(prefix)).map_err(|e| StoreError::Query(e.to_string()))?;
        let count = self
            .documents
            .read()
            .await
            .keys()
            .filter(|id| pattern.is_match(id))
            .count();
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_find_and_count() {
        let store = InMemoryDocumentStore::from_documents(vec![
            DashboardDocument::new("top25", vec![]),
            DashboardDocument::new("priority_bucket_0", vec![]).with_count(4),
            DashboardDocument::new("priority_bucket_1", vec![]).with_count(4),
            DashboardDocument::new("priority", vec![]),
        ]);

        let bucket = store.find_by_id("priority_bucket_1").await.unwrap();
        assert_eq!(bucket.map(|doc| doc.count), Some(4));
        assert!(store.find_by_id("priority_bucket_2").await.unwrap().is_none());

        assert_eq!(store.count_by_id_prefix("priority_bucket_").await.unwrap(), 2);
        assert_eq!(store.count_by_id_prefix("top").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_prefix_is_matched_literally() {
        let store = InMemoryDocumentStore::from_documents(vec![
            DashboardDocument::new("a.b0", vec![]),
            DashboardDocument::new("axb0", vec![]),
        ]);

        assert_eq!(store.count_by_id_prefix("a.b").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_replaces_newest_bucket() {
        let store = InMemoryDocumentStore::new();
        assert!(store.is_empty().await);

        store
            .upsert(DashboardDocument::new("priority_bucket_0", vec![]).with_count(1))
            .await;
        store
            .upsert(DashboardDocument::new("priority_bucket_0", vec![]).with_count(2))
            .await;

        assert_eq!(store.len().await, 1);
        let doc = store.find_by_id("priority_bucket_0").await.unwrap().unwrap();
        assert_eq!(doc.count, 2);
    }

    #[tokio::test]
    async fn test_load_fixture() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"_id": "top25", "values": [
                    {{"name": "Alert 7", "priority": "Low", "createdAt": "2024-03-01T10:00:00Z", "cleared": false}}
                ]}},
                {{"_id": "priority_bucket_0", "values": [], "count": 0}}
            ]"#
        )
        .unwrap();

        let store = InMemoryDocumentStore::load_fixture(file.path()).await.unwrap();
        assert_eq!(store.len().await, 2);

        let snapshot = store.find_by_id("top25").await.unwrap().unwrap();
        assert_eq!(snapshot.values[0].name, "Alert 7");
    }

    #[tokio::test]
    async fn test_load_fixture_reports_missing_file() {
        let result = InMemoryDocumentStore::load_fixture("/nonexistent/fixture.json").await;
        assert!(matches!(result, Err(StoreError::Fixture(_))));
    }
}
