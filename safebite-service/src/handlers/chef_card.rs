use axum::{extract::State, Json};
use metrics::counter;
use service_core::error::AppError;

use crate::middleware::AuthUser;
use crate::models::{ChefCardResponse, UserProfile};
use crate::services::chef_card::build_prompt;
use crate::services::store::paths;
use crate::startup::AppState;

/// Generate a restaurant card describing the caller's allergies.
pub async fn generate_chef_card(
    State(state): State<AppState>,
    AuthUser(uid): AuthUser,
) -> Result<Json<ChefCardResponse>, AppError> {
    let document = state
        .store
        .get(&paths::user_profile(&uid))
        .await?
        .ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!(
                "User profile not found. Please create a profile first."
            ))
        })?;

    let profile: UserProfile = serde_json::from_value(serde_json::Value::Object(document))
        .map_err(|e| {
            AppError::UpstreamError(anyhow::anyhow!(
                "Failed to generate chef card: malformed profile: {}",
                e
            ))
        })?;

    if profile.allergies.is_empty() {
        counter!("safebite_chef_cards_total", "status" => "no_allergies").increment(1);
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "No allergies found in profile to generate a card."
        )));
    }

    let prompt = build_prompt(&profile);
    let card_text = state.text_provider.generate(&prompt).await.map_err(|e| {
        counter!("safebite_chef_cards_total", "status" => "failed").increment(1);
        AppError::UpstreamError(anyhow::anyhow!("Failed to generate chef card: {}", e))
    })?;

    counter!("safebite_chef_cards_total", "status" => "generated").increment(1);
    tracing::info!(
        user_id = %uid,
        allergies = profile.allergies.len(),
        card_len = card_text.len(),
        "Chef card generated"
    );

    Ok(Json(ChefCardResponse {
        message: "Chef card generated successfully.".to_string(),
        card_text,
    }))
}
