//! Dashboard Assembler
//!
//! Composes reader calls into the initial page and the incremental
//! "load more" response. Failed reads never fail the request: each
//! section that could not be read renders empty and the rest proceeds.

use crate::core::{Alert, BucketIndex, format_duration};
use crate::reader::{BucketReader, PriorityBucket};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Everything the HTML page shows. Timing fields are display metadata.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardPage {
    pub recent_alerts: Vec<Alert>,
    /// Newest bucket, newest alert first
    pub priority_alerts: Vec<Alert>,
    pub page_load_time: String,
    pub recent_query_time: String,
    /// Bucket count query plus newest bucket read
    pub priority_query_time: String,
    pub priority_count: u64,
    pub priority_bucket_count: u64,
    /// Newest bucket read only; the frontend adds each load-more time to it
    pub total_priority_load_time: String,
    /// First bucket the frontend should request; negative when none remain
    pub next_bucket_index: BucketIndex,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadMoreResponse {
    /// Bucket contents as stored (oldest-first)
    pub alerts: Vec<Alert>,
    pub count: u64,
    pub query_time: String,
}

#[derive(Clone)]
pub struct Dashboard {
    reader: BucketReader,
}

impl Dashboard {
    pub fn new(reader: BucketReader) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &BucketReader {
        &self.reader
    }

    /// Snapshot, then bucket count, then the newest bucket (index count - 1).
    pub async fn initial_page(&self) -> DashboardPage {
        let started = Instant::now();

        let recent = self.reader.recent_alerts().await;
        let recent_alerts = recent.value.unwrap_or_else(|err| {
            warn!(error = %err, "rendering dashboard without recent alerts");
            Vec::new()
        });

        let bucket_count = self.reader.priority_alerts_count().await;
        let newest_index = bucket_count.value as BucketIndex - 1;
        let newest = self.reader.priority_alerts(newest_index).await;

        let (bucket, bucket_elapsed) = match newest.value {
            Ok(bucket) => (bucket, newest.elapsed),
            Err(err) => {
                warn!(
                    bucket_index = newest_index,
                    error = %err,
                    "rendering dashboard without priority alerts"
                );
                (PriorityBucket::default(), Duration::ZERO)
            }
        };

        let mut priority_alerts = bucket.alerts;
        priority_alerts.reverse();

        let page_load = started.elapsed();
        info!(
            recent = recent_alerts.len(),
            priority = priority_alerts.len(),
            buckets = bucket_count.value,
            elapsed_ms = page_load.as_secs_f64() * 1000.0,
            "dashboard assembled"
        );

        DashboardPage {
            recent_alerts,
            priority_alerts,
            page_load_time: format_duration(page_load),
            recent_query_time: format_duration(recent.elapsed),
            priority_query_time: format_duration(bucket_elapsed + bucket_count.elapsed),
            priority_count: bucket.total_count,
            priority_bucket_count: bucket_count.value,
            total_priority_load_time: format_duration(bucket_elapsed),
            next_bucket_index: newest_index - 1,
        }
    }

    /// Fetches one bucket by caller-supplied index. No bounds check and no
    /// reordering: alerts come back oldest-first, unlike `initial_page`.
    pub async fn load_more(&self, bucket_index: BucketIndex) -> LoadMoreResponse {
        let read = self.reader.priority_alerts(bucket_index).await;

        match read.value {
            Ok(bucket) => LoadMoreResponse {
                alerts: bucket.alerts,
                count: bucket.total_count,
                query_time: format_duration(read.elapsed),
            },
            Err(err) => {
                warn!(bucket_index, error = %err, "load more returned empty after read failure");
                LoadMoreResponse {
                    alerts: Vec::new(),
                    count: 0,
                    query_time: format_duration(Duration::ZERO),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::StoreConfig;
    use crate::core::{DashboardDocument, Priority};
    use crate::storage::{DocumentStore, FakeStore, InMemoryDocumentStore};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn alert(name: &str, minute: u32) -> Alert {
        Alert {
            name: name.to_string(),
            priority: Priority::Critical,
            created_at: Utc.with_ymd_and_hms(2024, 2, 1, 8, minute, 0).unwrap(),
            cleared: false,
        }
    }

    fn names(alerts: &[Alert]) -> Vec<&str> {
        alerts.iter().map(|a| a.name.as_str()).collect()
    }

    fn seeded() -> Vec<DashboardDocument> {
        vec![
            DashboardDocument::new("top25", vec![alert("r2", 30), alert("r1", 20)]),
            DashboardDocument::new("priority_bucket_0", vec![alert("a", 1), alert("b", 2)])
                .with_count(5),
            DashboardDocument::new(
                "priority_bucket_1",
                vec![alert("c", 3), alert("d", 4), alert("e", 5)],
            )
            .with_count(5),
        ]
    }

    fn dashboard_over(store: impl DocumentStore + 'static) -> Dashboard {
        Dashboard::new(BucketReader::new(Arc::new(store), &StoreConfig::default()))
    }

    #[tokio::test]
    async fn test_initial_page_shows_newest_bucket_reversed() {
        let dashboard = dashboard_over(InMemoryDocumentStore::from_documents(seeded()));

        let page = dashboard.initial_page().await;

        assert_eq!(names(&page.recent_alerts), vec!["r2", "r1"]);
        assert_eq!(names(&page.priority_alerts), vec!["e", "d", "c"]);
        assert_eq!(page.priority_count, 5);
        assert_eq!(page.priority_bucket_count, 2);
        assert_eq!(page.next_bucket_index, 0);
        assert!(page.page_load_time.ends_with(" ms"));
    }

    #[tokio::test]
    async fn test_reversal_law() {
        let dashboard = dashboard_over(InMemoryDocumentStore::from_documents(seeded()));

        let stored = dashboard.reader().priority_alerts(1).await.value.unwrap().alerts;
        let mut displayed = dashboard.initial_page().await.priority_alerts;

        let mut expected = stored.clone();
        expected.reverse();
        assert_eq!(displayed, expected);

        displayed.reverse();
        assert_eq!(displayed, stored);
    }

    #[tokio::test]
    async fn test_load_more_keeps_stored_order() {
        // Current behavior: load-more is not reversed, unlike the initial page.
        let dashboard = dashboard_over(InMemoryDocumentStore::from_documents(seeded()));

        let response = dashboard.load_more(0).await;

        assert_eq!(names(&response.alerts), vec!["a", "b"]);
        assert_eq!(response.count, 5);
        assert!(response.query_time.ends_with(" ms"));
    }

    #[tokio::test]
    async fn test_load_more_out_of_range_is_empty() {
        let dashboard = dashboard_over(InMemoryDocumentStore::from_documents(seeded()));

        for index in [2, 99, -1, -42] {
            let response = dashboard.load_more(index).await;
            assert!(response.alerts.is_empty());
            assert_eq!(response.count, 0);
        }
    }

    #[tokio::test]
    async fn test_no_buckets_requests_negative_index() {
        let store = FakeStore::new(vec![DashboardDocument::new("top25", vec![])]);
        let dashboard = dashboard_over(store);

        let page = dashboard.initial_page().await;

        assert!(page.priority_alerts.is_empty());
        assert_eq!(page.priority_bucket_count, 0);
        assert_eq!(page.priority_count, 0);
        assert_eq!(page.next_bucket_index, -2);
    }

    #[tokio::test]
    async fn test_failed_sections_render_empty() {
        // Current behavior: a failed read looks the same as an empty one.
        let store = FakeStore::new(seeded())
            .failing_on("top25")
            .failing_on("priority_bucket_1");
        let dashboard = dashboard_over(store);

        let page = dashboard.initial_page().await;

        assert!(page.recent_alerts.is_empty());
        assert_eq!(page.recent_query_time, "0.0 ms");
        assert!(page.priority_alerts.is_empty());
        assert_eq!(page.priority_count, 0);
        assert_eq!(page.priority_bucket_count, 2);
        assert_eq!(page.total_priority_load_time, "0.0 ms");
    }

    #[tokio::test]
    async fn test_load_more_failure_matches_not_found_shape() {
        let failing = dashboard_over(FakeStore::new(seeded()).failing_on("priority_bucket_0"));
        let missing = dashboard_over(InMemoryDocumentStore::new());

        let failed = failing.load_more(0).await;
        let absent = missing.load_more(0).await;

        assert_eq!(failed.alerts, absent.alerts);
        assert_eq!(failed.count, absent.count);
        assert_eq!(failed.query_time, "0.0 ms");
    }

    #[tokio::test]
    async fn test_count_failure_still_renders_recent_alerts() {
        let store = FakeStore::new(seeded()).failing_count();
        let dashboard = dashboard_over(store);

        let page = dashboard.initial_page().await;

        assert_eq!(page.recent_alerts.len(), 2);
        assert_eq!(page.priority_bucket_count, 0);
        assert!(page.priority_alerts.is_empty());
    }

    #[tokio::test]
    async fn test_initial_page_issues_three_reads() {
        let store = Arc::new(FakeStore::new(seeded()));
        let dashboard = Dashboard::new(BucketReader::new(
            store.clone() as Arc<dyn DocumentStore>,
            &StoreConfig::default(),
        ));

        dashboard.initial_page().await;

        assert_eq!(store.find_calls(), 2);
        assert_eq!(store.count_calls(), 1);
    }
}
