use axum::{extract::State, Json};
use futures::TryStreamExt;
use service_core::error::AppError;

use crate::services::store::{paths, Document};
use crate::startup::AppState;

pub async fn list_educational_resources(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, AppError> {
    let resources: Vec<Document> = state
        .store
        .list(&paths::educational_resources())
        .await?
        .try_collect()
        .await?;

    Ok(Json(resources))
}
