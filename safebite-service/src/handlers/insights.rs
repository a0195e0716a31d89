use axum::Json;

use crate::middleware::AuthUser;
use crate::models::{Alert, PredictiveInsights};

/// Placeholder insights; the same for every user.
pub async fn get_predictive_analytics(AuthUser(_uid): AuthUser) -> Json<PredictiveInsights> {
    Json(PredictiveInsights::sample())
}

/// Every placeholder alert, not filtered by the caller's allergies.
pub async fn get_alerts(AuthUser(_uid): AuthUser) -> Json<Vec<Alert>> {
    Json(Alert::samples())
}
