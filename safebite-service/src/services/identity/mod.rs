//! Bearer token verification.
//!
//! The service never issues tokens; it only checks ID tokens minted by the
//! identity provider and extracts the stable user id from them.

pub mod firebase;
pub mod mock;

pub use firebase::FirebaseTokenVerifier;
pub use mock::StaticTokenVerifier;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(String),
}

/// Resolves a bearer token to a user id. A failure is final for the request.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<String, VerifyError>;
}
