//! Domain models for the SafeBite service.

pub mod allergen;
pub mod analysis;
pub mod insights;
pub mod profile;

pub use allergen::Allergen;
pub use analysis::{
    AllergyIssue, AnalysisResult, AnalyzeTextRequest, AnalyzeTextResponse, IssueKind,
};
pub use insights::{Alert, PredictiveInsights};
pub use profile::{ChefCardResponse, UserProfile};
