use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/analyze-text`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTextRequest {
    #[validate(required(message = "No text provided for analysis"), length(min = 1, message = "No text provided for analysis"))]
    pub text: Option<String>,
    #[serde(default)]
    pub user_allergens: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IssueKind {
    #[serde(rename = "Direct Match")]
    DirectMatch,
    #[serde(rename = "Cross-Reactivity Warning")]
    CrossReactivityWarning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllergyIssue {
    pub allergen_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub detected_ingredients: Vec<String>,
    pub potential_allergy_issues: Vec<AllergyIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeTextResponse {
    pub analysis_result: AnalysisResult,
}
