//! Mock provider for testing.

use super::{ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Echoing text provider that counts how often it was called.
pub struct MockTextProvider {
    enabled: bool,
    calls: AtomicUsize,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ));
        }

        Ok(format!("Mock response for: {}", prompt))
    }
}
