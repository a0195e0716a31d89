#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use safebite_service::services::identity::StaticTokenVerifier;
use safebite_service::services::providers::mock::MockTextProvider;
use safebite_service::services::store::{
    paths, CollectionPath, Document, DocumentPath, DocumentStore, DocumentStream, MemoryStore,
    StoreError,
};
use safebite_service::services::tokenizer::RuleTokenizer;
use safebite_service::startup::{build_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const ALICE_TOKEN: &str = "token-alice";
pub const ALICE: &str = "uid-alice";
pub const BOB_TOKEN: &str = "token-bob";
pub const BOB: &str = "uid-bob";

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub provider: Arc<MockTextProvider>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_provider(MockTextProvider::new(true))
    }

    pub fn with_provider(provider: MockTextProvider) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::assemble(store.clone(), store, provider)
    }

    /// App whose every store call fails with [`UNAVAILABLE`]. `store` is
    /// left empty and is not wired into the router.
    pub fn with_failing_store() -> Self {
        Self::assemble(
            Arc::new(FailingStore),
            Arc::new(MemoryStore::new()),
            MockTextProvider::new(true),
        )
    }

    fn assemble(
        backend: Arc<dyn DocumentStore>,
        store: Arc<MemoryStore>,
        provider: MockTextProvider,
    ) -> Self {
        let provider = Arc::new(provider);
        let verifier = StaticTokenVerifier::new()
            .with_token(ALICE_TOKEN, ALICE)
            .with_token(BOB_TOKEN, BOB);

        let state = AppState {
            store: backend,
            verifier: Arc::new(verifier),
            tokenizer: Arc::new(RuleTokenizer),
            text_provider: provider.clone(),
        };

        Self {
            store,
            provider,
            router: build_router(state),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send_raw(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send_raw(request).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn seed_allergen(&self, allergen: Value) {
        let id = allergen["id"].as_str().unwrap().to_string();
        self.store
            .set(&paths::allergen(&id), object(allergen))
            .await
            .unwrap();
    }

    pub async fn seed_profile(&self, uid: &str, profile: Value) {
        self.store
            .set(&paths::user_profile(uid), object(profile))
            .await
            .unwrap();
    }
}

pub fn object(value: Value) -> Document {
    value.as_object().cloned().unwrap()
}

pub const UNAVAILABLE: &str = "connection refused by storage backend";

/// Store whose backend is down.
pub struct FailingStore;

fn unavailable() -> StoreError {
    StoreError::Backend(UNAVAILABLE.to_string())
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, _path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        Err(unavailable())
    }

    async fn set(&self, _path: &DocumentPath, _data: Document) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn update(&self, _path: &DocumentPath, _data: Document) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn add(&self, _collection: &CollectionPath, _data: Document) -> Result<String, StoreError> {
        Err(unavailable())
    }

    async fn list(&self, _collection: &CollectionPath) -> Result<DocumentStream, StoreError> {
        Err(unavailable())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }
}
