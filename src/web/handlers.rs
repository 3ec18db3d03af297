use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::Html,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    core::BucketIndex,
    dashboard::LoadMoreResponse,
    web::{render::render_dashboard, state::AppState},
};

#[derive(Debug, Default, Deserialize)]
pub struct LoadMoreQuery {
    #[serde(rename = "bucketIndex")]
    pub bucket_index: Option<String>,
}

impl LoadMoreQuery {
    /// Parsed index; missing or non-numeric input falls back to 0.
    pub fn bucket_index(&self) -> BucketIndex {
        self.bucket_index
            .as_deref()
            .and_then(|raw| raw.parse::<BucketIndex>().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub backend: &'static str,
}

pub async fn healthcheck(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        backend: state.backend_tag(),
    })
}

pub async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let page = state.dashboard.initial_page().await;
    Html(render_dashboard(&page))
}

pub async fn load_more_alerts(
    State(state): State<AppState>,
    query: Result<Query<LoadMoreQuery>, QueryRejection>,
) -> Json<LoadMoreResponse> {
    let bucket_index = match query {
        Ok(Query(query)) => query.bucket_index(),
        Err(rejection) => {
            debug!(error = %rejection, "unreadable load more query, using bucket 0");
            0
        }
    };

    Json(state.dashboard.load_more(bucket_index).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(raw: Option<&str>) -> LoadMoreQuery {
        LoadMoreQuery {
            bucket_index: raw.map(str::to_string),
        }
    }

    #[test]
    fn test_bucket_index_parsing() {
        assert_eq!(query(Some("3")).bucket_index(), 3);
        assert_eq!(query(Some("-2")).bucket_index(), -2);
        assert_eq!(query(Some("+4")).bucket_index(), 4);
    }

    #[test]
    fn test_unparseable_bucket_index_defaults_to_zero() {
        // Current behavior: parse errors are swallowed rather than rejected.
        assert_eq!(query(None).bucket_index(), 0);
        assert_eq!(query(Some("")).bucket_index(), 0);
        assert_eq!(query(Some("abc")).bucket_index(), 0);
        assert_eq!(query(Some("1.5")).bucket_index(), 0);
        assert_eq!(query(Some(" 1")).bucket_index(), 0);
    }
}
