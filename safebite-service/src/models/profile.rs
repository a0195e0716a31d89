use serde::{Deserialize, Serialize};

/// The fields of a stored profile that the chef card needs.
///
/// Profiles are free-form documents; everything else is ignored here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("the customer")
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChefCardResponse {
    pub message: String,
    pub card_text: String,
}
