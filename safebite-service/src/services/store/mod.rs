//! Hierarchical document store.
//!
//! Documents are addressed Firestore-style by alternating collection and
//! document segments, e.g. `users/{uid}/profiles/user_profile`. The
//! [`DocumentStore`] trait is implemented by [`MongoStore`] for deployments
//! and [`MemoryStore`] for tests and local runs.

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;
use futures::stream::BoxStream;
use service_core::error::AppError;
use std::fmt;
use thiserror::Error;

/// A stored document: an arbitrary JSON object.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Lazily pulled, finite, unordered sequence of documents.
pub type DocumentStream = BoxStream<'static, Result<Document, StoreError>>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No document to update: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("{0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound(anyhow::anyhow!(err.to_string())),
            StoreError::InvalidPath(_) => AppError::BadRequest(anyhow::anyhow!(err.to_string())),
            StoreError::Serialization(_) | StoreError::Backend(_) => {
                AppError::DatabaseError(anyhow::anyhow!(err.to_string()))
            }
        }
    }
}

/// Path to a collection: an odd number of segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    segments: Vec<String>,
}

/// Path to a single document: an even number of segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    segments: Vec<String>,
}

impl CollectionPath {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    pub fn doc(&self, id: impl Into<String>) -> DocumentPath {
        let mut segments = self.segments.clone();
        segments.push(id.into());
        DocumentPath { segments }
    }

    /// Collection names from the root down, joined with `.`
    /// (`users/u1/logs` -> `users.logs`).
    pub fn name_chain(&self) -> String {
        self.segments
            .iter()
            .step_by(2)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        validate_segments(&self.segments).map_err(|_| StoreError::InvalidPath(self.to_string()))
    }
}

impl DocumentPath {
    pub fn collection(&self, name: impl Into<String>) -> CollectionPath {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        CollectionPath { segments }
    }

    pub fn id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn parent(&self) -> CollectionPath {
        CollectionPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        validate_segments(&self.segments).map_err(|_| StoreError::InvalidPath(self.to_string()))
    }
}

fn validate_segments(segments: &[String]) -> Result<(), ()> {
    if segments
        .iter()
        .all(|s| !s.is_empty() && !s.contains('/') && s != "." && s != "..")
    {
        Ok(())
    } else {
        Err(())
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Well-known locations used by the handlers.
pub mod paths {
    use super::{CollectionPath, DocumentPath};

    pub fn user_profile(uid: &str) -> DocumentPath {
        CollectionPath::root("users")
            .doc(uid)
            .collection("profiles")
            .doc("user_profile")
    }

    pub fn user_logs(uid: &str) -> CollectionPath {
        CollectionPath::root("users").doc(uid).collection("logs")
    }

    pub fn allergens() -> CollectionPath {
        CollectionPath::root("allergens")
    }

    pub fn allergen(id: &str) -> DocumentPath {
        allergens().doc(id)
    }

    pub fn educational_resources() -> CollectionPath {
        CollectionPath::root("educational_resources")
    }
}

/// CRUD access to the document store. No retries, no transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document; `Ok(None)` when it does not exist.
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError>;

    /// Create or overwrite a document.
    async fn set(&self, path: &DocumentPath, data: Document) -> Result<(), StoreError>;

    /// Merge fields into an existing document.
    ///
    /// Top-level keys replace existing values; dotted keys address nested
    /// fields. Fails with [`StoreError::NotFound`] if the document is absent.
    async fn update(&self, path: &DocumentPath, data: Document) -> Result<(), StoreError>;

    /// Insert into a collection under a generated key and return that key.
    async fn add(&self, collection: &CollectionPath, data: Document) -> Result<String, StoreError>;

    /// Stream every document of a collection.
    async fn list(&self, collection: &CollectionPath) -> Result<DocumentStream, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Key for documents created through [`DocumentStore::add`].
pub(crate) fn generate_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_path_layout() {
        let path = paths::user_profile("u1");
        assert_eq!(path.to_string(), "users/u1/profiles/user_profile");
        assert_eq!(path.id(), "user_profile");
        assert_eq!(path.parent().to_string(), "users/u1/profiles");
        assert_eq!(path.parent().name_chain(), "users.profiles");
    }

    #[test]
    fn root_collection_name_chain() {
        assert_eq!(paths::allergens().name_chain(), "allergens");
        assert_eq!(paths::user_logs("abc").name_chain(), "users.logs");
    }

    #[test]
    fn rejects_segments_with_separators() {
        assert!(paths::allergen("pea/nut").validate().is_err());
        assert!(paths::allergen("").validate().is_err());
        assert!(paths::allergen("peanut").validate().is_ok());
    }

    #[test]
    fn store_errors_map_to_status_codes() {
        use axum::http::StatusCode;

        let not_found: AppError = StoreError::NotFound("users/u1".into()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let backend: AppError = StoreError::Backend("timeout".into()).into();
        assert_eq!(backend.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
