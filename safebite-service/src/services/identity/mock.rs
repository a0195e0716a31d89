//! Fixed token table for tests.

use super::{IdentityVerifier, VerifyError};
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, String>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, uid: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), uid.into());
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<String, VerifyError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| VerifyError::InvalidToken("unknown token".to_string()))
    }
}
