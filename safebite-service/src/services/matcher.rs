//! Allergen mention detection.
//!
//! Detection runs two independent passes over the lowercased text:
//! exact token lookup, then a substring scan for every known phrase.
//! Multi-word phrases can only be caught by the substring pass; single-word
//! phrases are found by both, which is harmless because detections are a set.

use crate::models::{Allergen, AllergyIssue, IssueKind};
use crate::services::tokenizer::Tokenizer;
use std::collections::{BTreeMap, HashSet};

/// Lowercase phrase -> allergen id lookup built from allergen records.
#[derive(Debug, Default, Clone)]
pub struct AllergenMatcher {
    phrases: BTreeMap<String, String>,
}

impl AllergenMatcher {
    /// Later phrases overwrite earlier ones: allergens in iteration order,
    /// and within one allergen its name, then common names, then hidden
    /// sources.
    pub fn new<'a>(allergens: impl IntoIterator<Item = &'a Allergen>) -> Self {
        let mut phrases = BTreeMap::new();

        for allergen in allergens {
            let all_phrases = std::iter::once(&allergen.name)
                .chain(&allergen.common_names)
                .chain(&allergen.hidden_sources);

            for phrase in all_phrases {
                phrases.insert(phrase.to_lowercase(), allergen.id.clone());
            }
        }

        Self { phrases }
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn allergen_for(&self, phrase: &str) -> Option<&str> {
        self.phrases.get(phrase).map(String::as_str)
    }

    /// Ids of allergens mentioned in `text`, deduplicated, in first-seen order.
    pub fn detect(&self, text: &str, tokenizer: &dyn Tokenizer) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut seen = HashSet::new();
        let mut detected = Vec::new();

        let mut record = |id: &String| {
            if seen.insert(id.clone()) {
                detected.push(id.clone());
            }
        };

        for token in tokenizer.tokenize(&lowered) {
            if let Some(id) = self.phrases.get(&token) {
                record(id);
            }
        }

        for (phrase, id) in &self.phrases {
            if lowered.contains(phrase.as_str()) {
                record(id);
            }
        }

        detected
    }
}

/// Issues raised by one detected allergen.
///
/// A direct match is reported when the user declared `allergen_id`. Every
/// cross-reactive food that appears in the text adds a warning, whether or
/// not the user declared the allergen and whether or not a direct match was
/// already reported.
pub fn assess(
    allergen_id: &str,
    allergen: &Allergen,
    text: &str,
    user_allergens: &[String],
) -> Vec<AllergyIssue> {
    let lowered = text.to_lowercase();
    let mut issues = Vec::new();

    if user_allergens.iter().any(|a| a == allergen_id) {
        issues.push(AllergyIssue {
            allergen_id: allergen_id.to_string(),
            name: allergen.name.clone(),
            kind: IssueKind::DirectMatch,
            reason: format!("'{}' detected and is in your profile.", allergen.name),
        });
    }

    for food in &allergen.cross_reactive_foods {
        if lowered.contains(&food.to_lowercase()) {
            issues.push(AllergyIssue {
                allergen_id: allergen_id.to_string(),
                name: allergen.name.clone(),
                kind: IssueKind::CrossReactivityWarning,
                reason: format!(
                    "Potential cross-reactivity with '{}' related to '{}'.",
                    food, allergen.name
                ),
            });
        }
    }

    issues
}
