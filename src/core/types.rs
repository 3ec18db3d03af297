use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Index of a priority bucket document. Signed so that out-of-range
/// requests (including negative ones) reach key construction untouched.
pub type BucketIndex = i64;

pub const DEFAULT_SNAPSHOT_ID: &str = "top25";
pub const DEFAULT_BUCKET_PREFIX: &str = "priority_bucket_";

/// Alert priority label as written by the aggregation job.
///
/// Labels outside the known set are kept verbatim in `Other` so a
/// document never fails to decode because of a new label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    Other(String),
}

impl Priority {
    pub fn as_str(&self) -> &str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Other(label) => label,
        }
    }

    /// True for the high-urgency labels that feed the priority buckets.
    pub fn is_priority(&self) -> bool {
        matches!(self, Priority::Critical | Priority::High)
    }
}

impl From<String> for Priority {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Critical" => Priority::Critical,
            "High" => Priority::High,
            "Medium" => Priority::Medium,
            "Low" => Priority::Low,
            _ => Priority::Other(label),
        }
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub name: String,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub cleared: bool,
}

/// Shape shared by the recent-alerts snapshot and the priority buckets.
///
/// `count` is only meaningful on bucket documents, where it carries the
/// total number of priority alerts across all buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub values: Vec<Alert>,
    #[serde(default)]
    pub count: u64,
}

impl DashboardDocument {
    pub fn new(id: impl Into<String>, values: Vec<Alert>) -> Self {
        Self {
            id: id.into(),
            values,
            count: 0,
        }
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }
}

pub fn bucket_key(prefix: &str, index: BucketIndex) -> String {
    format!("{prefix}{index}")
}

/// A read result paired with the wall time it took.
#[derive(Debug)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    pub fn new(value: T, elapsed: Duration) -> Self {
        Self { value, elapsed }
    }
}

/// Renders a duration as milliseconds with one decimal, e.g. `"12.3 ms"`.
pub fn format_duration(duration: Duration) -> String {
    let ms = duration.as_micros() as f64 / 1000.0;
    format!("{ms:.1} ms")
}
