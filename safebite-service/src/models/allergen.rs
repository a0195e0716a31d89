use serde::{Deserialize, Serialize};

/// Canonical allergen record, maintained outside this service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Allergen {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub common_names: Vec<String>,
    #[serde(default)]
    pub hidden_sources: Vec<String>,
    #[serde(default)]
    pub cross_reactive_foods: Vec<String>,
}

impl Allergen {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            common_names: Vec::new(),
            hidden_sources: Vec::new(),
            cross_reactive_foods: Vec::new(),
        }
    }

    pub fn with_common_names(mut self, names: &[&str]) -> Self {
        self.common_names = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_hidden_sources(mut self, sources: &[&str]) -> Self {
        self.hidden_sources = sources.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_cross_reactive_foods(mut self, foods: &[&str]) -> Self {
        self.cross_reactive_foods = foods.iter().map(|s| s.to_string()).collect();
        self
    }
}
