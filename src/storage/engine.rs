use crate::core::{DashboardDocument, Result};
use async_trait::async_trait;

/// Document store trait - read-only port over the dashboard collection
///
/// One instance is shared by every request for the life of the process.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend label for logs and the health endpoint
    fn backend_tag(&self) -> &'static str;

    /// Fetch one document by id; `Ok(None)` when it does not exist
    async fn find_by_id(&self, id: &str) -> Result<Option<DashboardDocument>>;

    /// Count documents whose id starts with `prefix`
    async fn count_by_id_prefix(&self, prefix: &str) -> Result<u64>;

    /// Release pooled connections
    async fn shutdown(&self) {}
}

/// Anchored id pattern used for prefix counts, with the prefix escaped.
pub fn prefix_pattern(prefix: &str) -> String {
    format!("^{}", regex::escape(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_pattern_is_anchored_and_escaped() {
        assert_eq!(prefix_pattern("priority_bucket_"), "^priority_bucket_");
        assert_eq!(prefix_pattern("a.b"), r"^a\.b");
    }
}
