// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed document store.

use super::{
    auto_id, Direction, Document, DocumentStore, Query, StoredDocument, TIMESTAMP_FIELDS,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use firestore::errors::FirestoreError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Field the firestore deserializer fills with the document ID.
const FIRESTORE_ID_FIELD: &str = "_firestore_id";
/// Prefix of the metadata fields added to every document read.
const FIRESTORE_META_PREFIX: &str = "_firestore_";

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreStore {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator does not check credentials, so skip the ADC lookup.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline client for testing.
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }
}

/// Document as written to Firestore. Known timestamp fields holding RFC3339
/// strings are sent as native timestamps.
#[derive(Deserialize)]
#[serde(transparent)]
struct TypedDocument(Document);

impl Serialize for TypedDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, value) in &self.0 {
            match timestamp_value(field, value) {
                Some(ts) => map.serialize_entry(field, &firestore::FirestoreTimestamp(ts))?,
                None => map.serialize_entry(field, value)?,
            }
        }
        map.end()
    }
}

fn timestamp_value(field: &str, value: &serde_json::Value) -> Option<DateTime<Utc>> {
    if !TIMESTAMP_FIELDS.contains(&field) {
        return None;
    }
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Split the document ID out and drop the other read metadata.
fn into_stored(mut fields: Document) -> StoredDocument {
    let id = match fields.remove(FIRESTORE_ID_FIELD) {
        Some(serde_json::Value::String(id)) => id,
        _ => String::new(),
    };
    fields.retain(|key, _| !key.starts_with(FIRESTORE_META_PREFIX));
    StoredDocument { id, fields }
}

fn database_error(e: FirestoreError) -> AppError {
    AppError::Database(e.to_string())
}

fn direction(direction: Direction) -> firestore::FirestoreQueryDirection {
    match direction {
        Direction::Ascending => firestore::FirestoreQueryDirection::Ascending,
        Direction::Descending => firestore::FirestoreQueryDirection::Descending,
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn query(
        &self,
        collection: &str,
        query: Query,
    ) -> Result<Vec<StoredDocument>, AppError> {
        let Query { filters, order_by } = query;
        let order: Vec<(String, firestore::FirestoreQueryDirection)> = order_by
            .into_iter()
            .map(|(field, dir)| (field, direction(dir)))
            .collect();

        // An empty conjunction yields no filter, i.e. a full collection read.
        let docs: Vec<Document> = self
            .get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| {
                q.for_all(
                    filters
                        .iter()
                        .map(|(field, value)| q.field(field.as_str()).eq(value.as_str()))
                        .collect::<Vec<_>>(),
                )
            })
            .order_by(order)
            .obj()
            .query()
            .await
            .map_err(database_error)?;

        Ok(docs.into_iter().map(into_stored).collect())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        let doc: Option<Document> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(database_error)?;

        Ok(doc.map(|doc| into_stored(doc).fields))
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), AppError> {
        let doc = TypedDocument(doc);
        let _: Document = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(&doc)
            .execute()
            .await
            .map_err(database_error)?;
        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, fields: Document) -> Result<(), AppError> {
        // The update mask limits the write to these fields and upserts.
        let mask: Vec<String> = fields.keys().cloned().collect();
        let fields = TypedDocument(fields);

        let _: Document = self
            .get_client()?
            .fluent()
            .update()
            .fields(mask)
            .in_col(collection)
            .document_id(id)
            .object(&fields)
            .execute()
            .await
            .map_err(database_error)?;
        Ok(())
    }

    async fn add(&self, collection: &str, doc: Document) -> Result<String, AppError> {
        let id = auto_id();
        let doc = TypedDocument(doc);

        let _: Document = self
            .get_client()?
            .fluent()
            .insert()
            .into(collection)
            .document_id(&id)
            .object(&doc)
            .execute()
            .await
            .map_err(database_error)?;

        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), AppError> {
        // Without the precondition a masked write would create the document.
        let mask: Vec<String> = fields.keys().cloned().collect();
        let fields = TypedDocument(fields);

        let result: Result<Document, FirestoreError> = self
            .get_client()?
            .fluent()
            .update()
            .fields(mask)
            .in_col(collection)
            .precondition(firestore::FirestoreWritePrecondition::Exists(true))
            .document_id(id)
            .object(&fields)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(FirestoreError::DataNotFoundError(_)) => {
                Err(AppError::NotFound(format!("{}/{}", collection, id)))
            }
            Err(e) => Err(database_error(e)),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(id)
            .execute()
            .await
            .map_err(database_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcloud_sdk::google::firestore::v1::value::ValueType;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("test document must be an object"),
        }
    }

    fn is_timestamp(doc: &firestore::FirestoreDocument, field: &str) -> bool {
        matches!(
            doc.fields.get(field).and_then(|v| v.value_type.as_ref()),
            Some(ValueType::TimestampValue(_))
        )
    }

    #[test]
    fn test_date_joined_serializes_as_timestamp() {
        let typed = TypedDocument(doc(json!({
            "uid": "u1",
            "dateJoined": "2024-05-01T12:30:00.000Z",
            "dateAdded": "2024-05-01T12:30:00.000Z"
        })));

        let written = firestore::FirestoreDb::serialize_to_doc(
            "projects/p/databases/(default)/documents/users/u1",
            &typed,
        )
        .unwrap();

        assert!(is_timestamp(&written, "dateJoined"));
        assert!(!is_timestamp(&written, "dateAdded"));
        assert!(!is_timestamp(&written, "uid"));
    }

    #[test]
    fn test_unparseable_timestamp_field_is_left_as_is() {
        let typed = TypedDocument(doc(json!({ "dateJoined": "last tuesday" })));

        let written = firestore::FirestoreDb::serialize_to_doc(
            "projects/p/databases/(default)/documents/users/u1",
            &typed,
        )
        .unwrap();

        assert!(matches!(
            written.fields["dateJoined"].value_type,
            Some(ValueType::StringValue(_))
        ));
    }

    #[test]
    fn test_into_stored_strips_read_metadata() {
        let stored = into_stored(doc(json!({
            "_firestore_id": "swap-1",
            "_firestore_full_id": "projects/p/databases/(default)/documents/swaps/swap-1",
            "_firestore_updated": "2024-05-01T12:30:00Z",
            "isbn": "0441013597"
        })));

        assert_eq!(stored.id, "swap-1");
        assert_eq!(stored.fields.len(), 1);
        assert_eq!(stored.fields["isbn"], "0441013597");
    }

    #[tokio::test]
    async fn test_emulator_stores_native_timestamp_and_rejects_missing_update() {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_err() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }

        let store = FirestoreStore::new("test-project").await.unwrap();
        let id = auto_id();
        store
            .set(
                "users",
                &id,
                doc(json!({ "uid": id, "dateJoined": "2024-05-01T12:30:00.000Z" })),
            )
            .await
            .unwrap();

        let raw: Option<firestore::FirestoreDocument> = store
            .get_client()
            .unwrap()
            .fluent()
            .select()
            .by_id_in("users")
            .one(&id)
            .await
            .unwrap();
        assert!(is_timestamp(&raw.unwrap(), "dateJoined"));

        let read = store.get("users", &id).await.unwrap().unwrap();
        let joined = read["dateJoined"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(joined).is_ok());

        // A patch on a deleted document must not recreate it.
        store.delete("users", &id).await.unwrap();
        let err = store
            .update("users", &id, doc(json!({ "location": "York" })))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(store.get("users", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_offline_client_reports_database_error() {
        let store = FirestoreStore::new_mock();

        let err = store.get("users", "anyone").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));

        let err = store
            .query("books", Query::new().order_by("dateAdded", Direction::Descending))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
