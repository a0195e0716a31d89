//! HTTP handlers for the SafeBite API.

pub mod allergens;
pub mod analyze;
pub mod app;
pub mod chef_card;
pub mod insights;
pub mod logs;
pub mod profile;
pub mod resources;

pub use allergens::{get_allergen, list_allergens};
pub use analyze::analyze_text;
pub use app::{health_check, index, metrics};
pub use chef_card::generate_chef_card;
pub use insights::{get_alerts, get_predictive_analytics};
pub use logs::{add_log, list_logs};
pub use profile::{create_profile, get_profile, update_profile};
pub use resources::list_educational_resources;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// 404 body for a missing document, keyed `message` like the other
/// informational replies.
fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
}
