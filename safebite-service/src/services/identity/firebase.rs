//! Firebase ID token verification.
//!
//! ID tokens are RS256 JWTs signed with rotating Google keys. The public
//! keys are fetched as a JWK set and cached for as long as the endpoint's
//! `Cache-Control: max-age` allows. A token naming an unknown `kid` triggers
//! an early refresh, at most once a minute.

use super::{IdentityVerifier, VerifyError};
use crate::config::FirebaseConfig;
use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use service_core::observability::TracedClientExt;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

const ISSUER_PREFIX: &str = "https://securetoken.google.com/";
const DEFAULT_KEY_MAX_AGE: Duration = Duration::from_secs(3600);
/// Minimum age of a fresh key set before an unknown `kid` may refetch it.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
    max_age: Duration,
}

impl CachedKeys {
    fn is_fresh(&self) -> bool {
        self.fetched_at.elapsed() < self.max_age
    }

    fn recently_fetched(&self) -> bool {
        self.fetched_at.elapsed() < MIN_REFRESH_INTERVAL
    }
}

pub struct FirebaseTokenVerifier {
    project_id: String,
    jwks_url: String,
    client: Client,
    keys: RwLock<Option<CachedKeys>>,
}

impl FirebaseTokenVerifier {
    pub fn new(config: &FirebaseConfig) -> Result<Self, VerifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| VerifyError::KeyFetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            project_id: config.project_id.clone(),
            jwks_url: config.jwks_url.clone(),
            client,
            keys: RwLock::new(None),
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("{}{}", ISSUER_PREFIX, self.project_id)]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);
        validation
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, VerifyError> {
        {
            let cached = self.keys.read().await;
            if let Some(cached) = (*cached).as_ref().filter(|c| c.is_fresh()) {
                if let Some(jwk) = cached.keys.find(kid) {
                    return DecodingKey::from_jwk(jwk)
                        .map_err(|e| VerifyError::InvalidToken(e.to_string()));
                }
                if cached.recently_fetched() {
                    return Err(unknown_kid(kid));
                }
            }
        }

        let fresh = self.fetch_keys().await?;
        let key = fresh
            .keys
            .find(kid)
            .map(DecodingKey::from_jwk)
            .transpose()
            .map_err(|e| VerifyError::InvalidToken(e.to_string()))?;
        *self.keys.write().await = Some(fresh);

        key.ok_or_else(|| unknown_kid(kid))
    }

    async fn fetch_keys(&self) -> Result<CachedKeys, VerifyError> {
        tracing::debug!(url = %self.jwks_url, "Refreshing identity signing keys");

        let response = self
            .client
            .traced_get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| VerifyError::KeyFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VerifyError::KeyFetch(format!(
                "key endpoint returned {}",
                response.status()
            )));
        }

        let max_age = response
            .headers()
            .get(reqwest::header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_max_age)
            .unwrap_or(DEFAULT_KEY_MAX_AGE);

        let keys: JwkSet = response
            .json()
            .await
            .map_err(|e| VerifyError::KeyFetch(format!("Failed to parse key set: {}", e)))?;

        tracing::info!(key_count = keys.keys.len(), max_age_secs = max_age.as_secs(), "Loaded identity signing keys");

        Ok(CachedKeys {
            keys,
            fetched_at: Instant::now(),
            max_age,
        })
    }
}

fn unknown_kid(kid: &str) -> VerifyError {
    VerifyError::InvalidToken(format!("unknown key id {}", kid))
}

/// Extract `max-age` from a `Cache-Control` header value.
fn parse_max_age(cache_control: &str) -> Option<Duration> {
    cache_control
        .split(',')
        .filter_map(|directive| directive.trim().strip_prefix("max-age="))
        .find_map(|secs| secs.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[async_trait]
impl IdentityVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> Result<String, VerifyError> {
        let header =
            decode_header(token).map_err(|e| VerifyError::InvalidToken(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(VerifyError::InvalidToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| VerifyError::InvalidToken("token has no key id".to_string()))?;

        let key = self.decoding_key(&kid).await?;

        let data = decode::<FirebaseClaims>(token, &key, &self.validation())
            .map_err(|e| VerifyError::InvalidToken(e.to_string()))?;

        if data.claims.sub.is_empty() {
            return Err(VerifyError::InvalidToken("empty subject".to_string()));
        }

        Ok(data.claims.sub)
    }
}
