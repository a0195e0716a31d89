use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use futures::TryStreamExt;
use serde_json::{json, Value};
use service_core::error::AppError;

use crate::middleware::AuthUser;
use crate::services::store::{paths, Document};
use crate::startup::AppState;

pub async fn list_logs(
    State(state): State<AppState>,
    AuthUser(uid): AuthUser,
) -> Result<Json<Vec<Document>>, AppError> {
    let logs: Vec<Document> = state
        .store
        .list(&paths::user_logs(&uid))
        .await?
        .try_collect()
        .await?;

    Ok(Json(logs))
}

/// Append a log entry, stamping it with the current time unless the client
/// supplied a `timestamp`.
pub async fn add_log(
    State(state): State<AppState>,
    AuthUser(uid): AuthUser,
    Json(mut data): Json<Document>,
) -> Result<impl IntoResponse, AppError> {
    data.entry("timestamp")
        .or_insert_with(|| Value::String(chrono::Utc::now().to_rfc3339()));

    let id = state.store.add(&paths::user_logs(&uid), data).await?;

    tracing::info!(user_id = %uid, log_id = %id, "Log added");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Log added successfully",
            "id": id
        })),
    ))
}
