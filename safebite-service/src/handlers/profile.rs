use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;
use service_core::error::AppError;

use super::not_found;
use crate::middleware::AuthUser;
use crate::services::store::{paths, Document, StoreError};
use crate::startup::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(uid): AuthUser,
) -> Result<Response, AppError> {
    match state.store.get(&paths::user_profile(&uid)).await? {
        Some(profile) => Ok(Json(profile).into_response()),
        None => Ok(not_found("Profile not found")),
    }
}

/// Create or overwrite the caller's profile with the request body.
pub async fn create_profile(
    State(state): State<AppState>,
    AuthUser(uid): AuthUser,
    Json(data): Json<Document>,
) -> Result<impl IntoResponse, AppError> {
    state
        .store
        .set(&paths::user_profile(&uid), data.clone())
        .await?;

    tracing::info!(user_id = %uid, "Profile created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Profile created successfully",
            "profile": data
        })),
    ))
}

/// Merge the request body into the caller's existing profile.
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(uid): AuthUser,
    Json(data): Json<Document>,
) -> Result<Response, AppError> {
    match state
        .store
        .update(&paths::user_profile(&uid), data.clone())
        .await
    {
        Ok(()) => {}
        Err(StoreError::NotFound(_)) => return Ok(not_found("Profile not found")),
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id = %uid, fields = data.len(), "Profile updated");

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "profile": data
    }))
    .into_response())
}
