use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use futures::TryStreamExt;
use service_core::error::AppError;

use super::not_found;
use crate::services::store::{paths, Document, StoreError};
use crate::startup::AppState;

pub async fn list_allergens(State(state): State<AppState>) -> Result<Json<Vec<Document>>, AppError> {
    let allergens: Vec<Document> = state
        .store
        .list(&paths::allergens())
        .await?
        .try_collect()
        .await?;

    Ok(Json(allergens))
}

pub async fn get_allergen(
    State(state): State<AppState>,
    Path(allergen_id): Path<String>,
) -> Result<Response, AppError> {
    // An id that cannot name a document cannot exist either.
    match state.store.get(&paths::allergen(&allergen_id)).await {
        Ok(Some(allergen)) => Ok(Json(allergen).into_response()),
        Ok(None) | Err(StoreError::InvalidPath(_)) => Ok(not_found("Allergen not found")),
        Err(e) => Err(e.into()),
    }
}
