//! Bucket layout audit used by `alertdash-inspect`.
//!
//! Walks buckets `0..=count` and checks the aggregation contract: every
//! index below the count exists, nothing exists at the count, and every
//! bucket reports the same total.

use crate::core::{BucketIndex, bucket_key};
use crate::reader::BucketReader;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BucketStatus {
    Found { size: usize, reported_count: u64 },
    Missing,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketSummary {
    pub index: BucketIndex,
    pub id: String,
    #[serde(flatten)]
    pub status: BucketStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketLayout {
    pub bucket_count: u64,
    pub buckets: Vec<BucketSummary>,
    pub issues: Vec<String>,
}

impl BucketLayout {
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }

    /// Sum of bucket sizes, for comparison with the reported total.
    pub fn stored_alerts(&self) -> usize {
        self.buckets
            .iter()
            .filter_map(|bucket| match bucket.status {
                BucketStatus::Found { size, .. } => Some(size),
                _ => None,
            })
            .sum()
    }
}

pub async fn audit_buckets(reader: &BucketReader) -> BucketLayout {
    let bucket_count = reader.priority_alerts_count().await.value;
    let mut buckets = Vec::new();
    let mut issues = Vec::new();
    let mut reported_counts = BTreeSet::new();

    for index in 0..=bucket_count as BucketIndex {
        let id = bucket_key(reader.bucket_prefix(), index);
        let expected = (index as u64) < bucket_count;

        // A missing document and an empty one read the same way, so an
        // empty bucket is treated as absent.
        let status = match reader.priority_alerts(index).await.value {
            Ok(bucket) if bucket.alerts.is_empty() && bucket.total_count == 0 => {
                BucketStatus::Missing
            }
            Ok(bucket) => BucketStatus::Found {
                size: bucket.alerts.len(),
                reported_count: bucket.total_count,
            },
            Err(err) => BucketStatus::Failed {
                error: err.to_string(),
            },
        };

        match (&status, expected) {
            (BucketStatus::Found { reported_count, .. }, true) => {
                reported_counts.insert(*reported_count);
            }
            (BucketStatus::Found { .. }, false) => {
                issues.push(format!("{id} exists beyond the counted range"));
            }
            (BucketStatus::Missing, true) => issues.push(format!("{id} is missing")),
            (BucketStatus::Failed { error }, _) => {
                issues.push(format!("{id} could not be read: {error}"))
            }
            (BucketStatus::Missing, false) => {}
        }

        buckets.push(BucketSummary { index, id, status });
    }

    if reported_counts.len() > 1 {
        issues.push(format!(
            "buckets disagree on the total count: {:?}",
            reported_counts
        ));
    }

    BucketLayout {
        bucket_count,
        buckets,
        issues,
    }
}
