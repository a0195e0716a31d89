//! In-process document store with the same semantics as [`super::MongoStore`].

use super::{
    generate_key, CollectionPath, Document, DocumentPath, DocumentStore, DocumentStream,
    StoreError,
};
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

struct StoredDocument {
    collection: String,
    data: Document,
}

#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<String, StoredDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents directly inside `collection`.
    pub async fn count(&self, collection: &CollectionPath) -> usize {
        let key = collection.to_string();
        self.documents
            .read()
            .await
            .values()
            .filter(|d| d.collection == key)
            .count()
    }
}

/// Write `value` at a dotted field path, creating intermediate objects.
fn set_field(target: &mut Document, field_path: &str, value: Value) {
    match field_path.split_once('.') {
        None => {
            target.insert(field_path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Document::new()));
            if !entry.is_object() {
                *entry = Value::Object(Document::new());
            }
            if let Value::Object(child) = entry {
                set_field(child, rest, value);
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        path.validate()?;
        let documents = self.documents.read().await;
        Ok(documents.get(&path.to_string()).map(|d| d.data.clone()))
    }

    async fn set(&self, path: &DocumentPath, data: Document) -> Result<(), StoreError> {
        path.validate()?;
        self.documents.write().await.insert(
            path.to_string(),
            StoredDocument {
                collection: path.parent().to_string(),
                data,
            },
        );
        Ok(())
    }

    async fn update(&self, path: &DocumentPath, data: Document) -> Result<(), StoreError> {
        path.validate()?;
        let mut documents = self.documents.write().await;
        let stored = documents
            .get_mut(&path.to_string())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;

        for (field, value) in data {
            set_field(&mut stored.data, &field, value);
        }
        Ok(())
    }

    async fn add(&self, collection: &CollectionPath, data: Document) -> Result<String, StoreError> {
        collection.validate()?;
        let key = generate_key();
        let path = collection.doc(key.clone());
        self.documents.write().await.insert(
            path.to_string(),
            StoredDocument {
                collection: collection.to_string(),
                data,
            },
        );
        Ok(key)
    }

    async fn list(&self, collection: &CollectionPath) -> Result<DocumentStream, StoreError> {
        collection.validate()?;
        let key = collection.to_string();
        let snapshot: Vec<Result<Document, StoreError>> = self
            .documents
            .read()
            .await
            .values()
            .filter(|d| d.collection == key)
            .map(|d| Ok(d.data.clone()))
            .collect();

        Ok(futures::stream::iter(snapshot).boxed())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
