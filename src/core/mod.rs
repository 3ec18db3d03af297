pub mod error;
pub mod types;

pub use error::{Result, StoreError};
pub use types::{
    Alert, BucketIndex, DEFAULT_BUCKET_PREFIX, DEFAULT_SNAPSHOT_ID, DashboardDocument, Priority,
    Timed, bucket_key, format_duration,
};
