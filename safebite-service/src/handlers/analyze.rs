use axum::{extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

use crate::middleware::AuthUser;
use crate::models::{AnalyzeTextRequest, AnalyzeTextResponse};
use crate::services::analyzer;
use crate::startup::AppState;

pub async fn analyze_text(
    State(state): State<AppState>,
    AuthUser(uid): AuthUser,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeTextResponse>, AppError> {
    request.validate()?;
    let text = request.text.unwrap_or_default();

    let analysis_result = analyzer::analyze_text(
        state.store.as_ref(),
        state.tokenizer.as_ref(),
        &text,
        &request.user_allergens,
    )
    .await
    .map_err(|e| AppError::UpstreamError(anyhow::anyhow!("NLP analysis failed: {}", e)))?;

    tracing::info!(
        user_id = %uid,
        detected = analysis_result.detected_ingredients.len(),
        issues = analysis_result.potential_allergy_issues.len(),
        "Text analyzed"
    );

    Ok(Json(AnalyzeTextResponse { analysis_result }))
}
