//! Placeholder analytics and alert payloads.
//!
//! Both endpoints serve fixed data; nothing here is derived from a user's
//! logs or profile yet.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictiveInsights {
    pub patterns: Vec<String>,
    pub suggestions: Vec<String>,
}

impl PredictiveInsights {
    pub fn sample() -> Self {
        Self {
            patterns: vec![
                "You tend to react to oats when consumed with dairy.".to_string(),
                "Your symptoms are worse on days with high pollen counts (requires external data integration).".to_string(),
                "Increased severity observed when consuming 'pea protein' from processed foods.".to_string(),
            ],
            suggestions: vec![
                "Consider avoiding oats with dairy for a week.".to_string(),
                "Check local pollen forecasts.".to_string(),
                "Carefully read labels for hidden pea protein in snacks.".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub relevant_allergens: Vec<String>,
}

impl Alert {
    pub fn samples() -> Vec<Self> {
        vec![
            Alert {
                id: "alert1".to_string(),
                kind: "Recall".to_string(),
                title: "Recall: Brand X Oat Milk".to_string(),
                description: "Undeclared almond allergen found.".to_string(),
                relevant_allergens: vec!["almond".to_string()],
            },
            Alert {
                id: "alert2".to_string(),
                kind: "Contamination".to_string(),
                title: "Warning: Restaurant Y Update".to_string(),
                description: "Reported cross-contamination risk for sesame.".to_string(),
                relevant_allergens: vec!["sesame".to_string()],
            },
        ]
    }
}
