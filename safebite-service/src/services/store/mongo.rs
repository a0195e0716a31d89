//! MongoDB realisation of the hierarchical document store.
//!
//! Layout: one MongoDB collection per collection name chain
//! (`users/u1/profiles` and `users/u2/profiles` both live in
//! `users.profiles`). Every stored document carries
//! - `_id`: its full document path, and
//! - `_parent`: the full path of the collection it belongs to,
//!
//! which keeps keys unique across users and makes `list` a single
//! `_parent` lookup.

use super::{
    generate_key, paths, CollectionPath, Document, DocumentPath, DocumentStore, DocumentStream,
    StoreError,
};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use mongodb::{
    bson::{self, doc, Bson},
    options::{IndexOptions, ReplaceOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};

const ID_FIELD: &str = "_id";
const PARENT_FIELD: &str = "_parent";

#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            StoreError::Backend(e.to_string())
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    /// Index `_parent` on every collection that is listed per parent.
    pub async fn initialize_indexes(&self) -> Result<(), StoreError> {
        tracing::info!("Creating MongoDB indexes for safebite-service");

        let listed = [
            paths::user_logs("_").name_chain(),
            paths::user_profile("_").parent().name_chain(),
            paths::allergens().name_chain(),
            paths::educational_resources().name_chain(),
        ];

        for name in listed {
            let index = IndexModel::builder()
                .keys(doc! { PARENT_FIELD: 1 })
                .options(
                    IndexOptions::builder()
                        .name("parent_idx".to_string())
                        .build(),
                )
                .build();

            self.db
                .collection::<bson::Document>(&name)
                .create_index(index, None)
                .await
                .map_err(|e| {
                    tracing::error!(collection = %name, "Failed to create parent index: {}", e);
                    StoreError::Backend(e.to_string())
                })?;
        }

        tracing::info!("Successfully created all MongoDB indexes");
        Ok(())
    }

    fn collection(&self, path: &CollectionPath) -> Collection<bson::Document> {
        self.db.collection(&path.name_chain())
    }

    fn to_bson(mut data: Document) -> Result<bson::Document, StoreError> {
        for reserved in [ID_FIELD, PARENT_FIELD] {
            if data.remove(reserved).is_some() {
                tracing::warn!(field = reserved, "Dropping reserved field from document body");
            }
        }
        bson::to_document(&data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn from_bson(mut stored: bson::Document) -> Result<Document, StoreError> {
        stored.remove(ID_FIELD);
        stored.remove(PARENT_FIELD);
        match Bson::Document(stored).into_relaxed_extjson() {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(StoreError::Serialization(format!(
                "expected an object, found {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        path.validate()?;
        let found = self
            .collection(&path.parent())
            .find_one(doc! { ID_FIELD: path.to_string() }, None)
            .await
            .map_err(|e| {
                tracing::error!(path = %path, "Failed to read document: {}", e);
                StoreError::Backend(e.to_string())
            })?;

        found.map(Self::from_bson).transpose()
    }

    async fn set(&self, path: &DocumentPath, data: Document) -> Result<(), StoreError> {
        path.validate()?;
        let mut stored = Self::to_bson(data)?;
        stored.insert(ID_FIELD, path.to_string());
        stored.insert(PARENT_FIELD, path.parent().to_string());

        self.collection(&path.parent())
            .replace_one(
                doc! { ID_FIELD: path.to_string() },
                stored,
                ReplaceOptions::builder().upsert(true).build(),
            )
            .await
            .map_err(|e| {
                tracing::error!(path = %path, "Failed to write document: {}", e);
                StoreError::Backend(e.to_string())
            })?;

        Ok(())
    }

    async fn update(&self, path: &DocumentPath, data: Document) -> Result<(), StoreError> {
        path.validate()?;
        let fields = Self::to_bson(data)?;
        let collection = self.collection(&path.parent());
        let filter = doc! { ID_FIELD: path.to_string() };

        // `$set` rejects an empty document; only existence matters then.
        let matched = if fields.is_empty() {
            collection
                .count_documents(filter, None)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?
        } else {
            collection
                .update_one(filter, doc! { "$set": fields }, None)
                .await
                .map_err(|e| {
                    tracing::error!(path = %path, "Failed to update document: {}", e);
                    StoreError::Backend(e.to_string())
                })?
                .matched_count
        };

        if matched == 0 {
            return Err(StoreError::NotFound(path.to_string()));
        }
        Ok(())
    }

    async fn add(&self, collection: &CollectionPath, data: Document) -> Result<String, StoreError> {
        collection.validate()?;
        let key = generate_key();
        let path = collection.doc(key.clone());

        let mut stored = Self::to_bson(data)?;
        stored.insert(ID_FIELD, path.to_string());
        stored.insert(PARENT_FIELD, collection.to_string());

        self.collection(collection)
            .insert_one(stored, None)
            .await
            .map_err(|e| {
                tracing::error!(collection = %collection, "Failed to insert document: {}", e);
                StoreError::Backend(e.to_string())
            })?;

        Ok(key)
    }

    async fn list(&self, collection: &CollectionPath) -> Result<DocumentStream, StoreError> {
        collection.validate()?;
        let cursor = self
            .collection(collection)
            .find(doc! { PARENT_FIELD: collection.to_string() }, None)
            .await
            .map_err(|e| {
                tracing::error!(collection = %collection, "Failed to query collection: {}", e);
                StoreError::Backend(e.to_string())
            })?;

        let stream = cursor
            .map_err(|e| StoreError::Backend(e.to_string()))
            .and_then(|stored| async move { MongoStore::from_bson(stored) });

        Ok(stream.boxed())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                StoreError::Backend(e.to_string())
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_fields_are_stripped_on_write() {
        let mut data = Document::new();
        data.insert("_id".into(), "spoofed".into());
        data.insert("name".into(), "A".into());

        let stored = MongoStore::to_bson(data).unwrap();
        assert!(!stored.contains_key("_id"));
        assert_eq!(stored.get_str("name").unwrap(), "A");
    }

    #[test]
    fn internal_fields_are_hidden_on_read() {
        let stored = doc! {
            "_id": "users/u1/profiles/user_profile",
            "_parent": "users/u1/profiles",
            "name": "A",
            "allergies": ["peanut"],
        };

        let document = MongoStore::from_bson(stored).unwrap();
        assert_eq!(document.len(), 2);
        assert_eq!(document["allergies"], serde_json::json!(["peanut"]));
    }
}
