use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use metrics::counter;
use service_core::error::AppError;

use crate::services::identity::VerifyError;
use crate::startup::AppState;

/// Verified caller of an authenticated route, holding the identity
/// provider's user id.
///
/// Extraction fails with 401 "Authorization token required" when the
/// `Authorization` header is absent and 401 "Invalid or expired token" when
/// it is malformed or the token is rejected.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

#[derive(Debug, PartialEq, Eq)]
enum BearerToken<'a> {
    Missing,
    Malformed,
    Present(&'a str),
}

fn bearer_token(headers: &HeaderMap) -> BearerToken<'_> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return BearerToken::Missing;
    };

    match value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
    {
        Some(token) if !token.is_empty() => BearerToken::Present(token),
        _ => BearerToken::Malformed,
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(&parts.headers) {
            BearerToken::Present(token) => token,
            BearerToken::Missing => {
                counter!("safebite_token_verifications_total", "outcome" => "missing").increment(1);
                return Err(AppError::MissingCredentials);
            }
            BearerToken::Malformed => {
                counter!("safebite_token_verifications_total", "outcome" => "invalid").increment(1);
                return Err(AppError::InvalidCredentials(anyhow::anyhow!(
                    "Authorization header is not a bearer token"
                )));
            }
        };

        match state.verifier.verify(token).await {
            Ok(uid) => {
                counter!("safebite_token_verifications_total", "outcome" => "valid").increment(1);
                tracing::Span::current().record("user_id", uid.as_str());
                Ok(AuthUser(uid))
            }
            Err(e) => {
                counter!("safebite_token_verifications_total", "outcome" => "invalid").increment(1);
                match &e {
                    VerifyError::KeyFetch(_) => tracing::error!("Token verification unavailable: {}", e),
                    VerifyError::InvalidToken(_) => tracing::debug!("Rejected bearer token: {}", e),
                }
                Err(AppError::InvalidCredentials(anyhow::anyhow!(e)))
            }
        }
    }
}
