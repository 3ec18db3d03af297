use super::engine::{DocumentStore, prefix_pattern};
use crate::connection::StoreConfig;
use crate::core::{Alert, DashboardDocument, Priority, Result, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde::Deserialize;
use tracing::info;

/// Alert as stored by the aggregation pipeline (`createdAt` is a BSON date).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAlert {
    name: String,
    priority: String,
    created_at: bson::DateTime,
    #[serde(default)]
    cleared: bool,
}

#[derive(Debug, Deserialize)]
struct StoredDocument {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    values: Vec<StoredAlert>,
    #[serde(default)]
    count: i64,
}

impl TryFrom<StoredAlert> for Alert {
    type Error = StoreError;

    fn try_from(stored: StoredAlert) -> Result<Self> {
        let millis = stored.created_at.timestamp_millis();
        let created_at = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
            StoreError::Decode(format!(
                "createdAt out of range for alert '{}': {millis}",
                stored.name
            ))
        })?;

        Ok(Alert {
            name: stored.name,
            priority: Priority::from(stored.priority),
            created_at,
            cleared: stored.cleared,
        })
    }
}

impl TryFrom<StoredDocument> for DashboardDocument {
    type Error = StoreError;

    fn try_from(stored: StoredDocument) -> Result<Self> {
        let values = stored
            .values
            .into_iter()
            .map(Alert::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(DashboardDocument {
            id: stored.id,
            values,
            count: u64::try_from(stored.count).unwrap_or(0),
        })
    }
}

/// MongoDB-backed document store over the dashboard collection.
#[derive(Clone)]
pub struct MongoDocumentStore {
    client: Client,
    collection: Collection<StoredDocument>,
}

impl MongoDocumentStore {
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        config.validate().map_err(StoreError::Config)?;

        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        options.app_name = Some(config.app_name.clone());
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);
        options.max_pool_size = Some(config.max_pool_size);
        options.min_pool_size = Some(config.min_pool_size);

        let client =
            Client::with_options(options).map_err(|e| StoreError::Connection(e.to_string()))?;
        let collection = client
            .database(&config.database)
            .collection::<StoredDocument>(&config.collection);

        info!(
            uri = %config.redacted_uri(),
            database = %config.database,
            collection = %config.collection,
            "document store client created"
        );

        Ok(Self { client, collection })
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    fn backend_tag(&self) -> &'static str {
        "mongodb"
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<DashboardDocument>> {
        let found = self.collection.find_one(doc! { "_id": id }).await?;
        found.map(DashboardDocument::try_from).transpose()
    }

    async fn count_by_id_prefix(&self, prefix: &str) -> Result<u64> {
        let filter = doc! { "_id": { "$regex": prefix_pattern(prefix) } };
        Ok(self.collection.count_documents(filter).await?)
    }

    async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        info!("document store client shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_document_converts_bson_dates() {
        let raw = doc! {
            "_id": "priority_bucket_0",
            "count": 3_i64,
            "values": [
                {
                    "name": "Alert 42",
                    "priority": "Critical",
                    "createdAt": bson::DateTime::from_millis(1_714_566_600_000),
                    "cleared": false,
                }
            ],
        };

        let stored: StoredDocument = bson::from_document(raw).unwrap();
        let document = DashboardDocument::try_from(stored).unwrap();

        assert_eq!(document.id, "priority_bucket_0");
        assert_eq!(document.count, 3);
        assert_eq!(document.values[0].priority, Priority::Critical);
        assert_eq!(
            document.values[0].created_at.to_rfc3339(),
            "2024-05-01T12:30:00+00:00"
        );
    }

    #[test]
    fn test_snapshot_without_count_decodes() {
        let raw = doc! { "_id": "top25", "values": [] };
        let stored: StoredDocument = bson::from_document(raw).unwrap();
        let document = DashboardDocument::try_from(stored).unwrap();
        assert_eq!(document.count, 0);
        assert!(document.values.is_empty());
    }

    #[test]
    fn test_negative_count_clamps_to_zero() {
        let raw = doc! { "_id": "priority_bucket_9", "values": [], "count": -4_i64 };
        let stored: StoredDocument = bson::from_document(raw).unwrap();
        assert_eq!(DashboardDocument::try_from(stored).unwrap().count, 0);
    }
}
