//! Per-request allergen analysis against the stored dictionary.

use crate::models::{Allergen, AnalysisResult};
use crate::services::matcher::{assess, AllergenMatcher};
use crate::services::store::{paths, Document, DocumentStore, StoreError};
use crate::services::tokenizer::Tokenizer;
use futures::TryStreamExt;
use metrics::counter;

/// Detect allergen mentions in `text` and cross-check them against the
/// caller's declared allergies.
///
/// The phrase dictionary is rebuilt from the `allergens` collection on every
/// call, then each detected allergen is re-read by id for its full record.
pub async fn analyze_text(
    store: &dyn DocumentStore,
    tokenizer: &dyn Tokenizer,
    text: &str,
    user_allergens: &[String],
) -> Result<AnalysisResult, StoreError> {
    let dictionary: Vec<Allergen> = store
        .list(&paths::allergens())
        .await?
        .and_then(|doc| async move { parse_allergen(doc, None) })
        .try_collect()
        .await?;

    let matcher = AllergenMatcher::new(&dictionary);
    let detected = matcher.detect(text, tokenizer);

    tracing::debug!(
        phrases = matcher.len(),
        detected = detected.len(),
        "Matched text against allergen dictionary"
    );

    let mut issues = Vec::new();
    for allergen_id in &detected {
        let record = match store.get(&paths::allergen(allergen_id)).await {
            Ok(Some(doc)) => parse_allergen(doc, Some(allergen_id))?,
            Ok(None) | Err(StoreError::InvalidPath(_)) => {
                tracing::warn!(allergen_id = %allergen_id, "Detected allergen has no stored record");
                continue;
            }
            Err(e) => return Err(e),
        };

        issues.extend(assess(allergen_id, &record, text, user_allergens));
    }

    counter!("safebite_text_analyses_total").increment(1);
    counter!("safebite_allergens_detected_total").increment(detected.len() as u64);

    Ok(AnalysisResult {
        detected_ingredients: detected,
        potential_allergy_issues: issues,
    })
}

/// Decode a stored allergen. Point reads may omit `id`, since the key already
/// names the allergen.
fn parse_allergen(mut doc: Document, id: Option<&str>) -> Result<Allergen, StoreError> {
    if let Some(id) = id {
        doc.entry("id")
            .or_insert_with(|| serde_json::Value::String(id.to_string()));
    }

    serde_json::from_value(serde_json::Value::Object(doc))
        .map_err(|e| StoreError::Serialization(format!("Malformed allergen record: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IssueKind;
    use crate::services::store::MemoryStore;
    use crate::services::tokenizer::RuleTokenizer;
    use serde_json::json;

    async fn seed(store: &MemoryStore, value: serde_json::Value) {
        let doc = value.as_object().cloned().unwrap();
        let id = doc["id"].as_str().unwrap().to_string();
        store.set(&paths::allergen(&id), doc).await.unwrap();
    }

    #[tokio::test]
    async fn reports_direct_match_and_cross_reactivity() {
        let store = MemoryStore::new();
        seed(&store, json!({ "id": "peanut", "name": "Peanut", "commonNames": ["groundnut"] })).await;
        seed(&store, json!({ "id": "birch", "name": "Birch", "crossReactiveFoods": ["apple"] })).await;

        let result = analyze_text(
            &store,
            &RuleTokenizer,
            "Groundnut oil, birch syrup and apple",
            &["peanut".to_string()],
        )
        .await
        .unwrap();

        let mut detected = result.detected_ingredients.clone();
        detected.sort();
        assert_eq!(detected, vec!["birch", "peanut"]);

        let kinds: Vec<(String, IssueKind)> = result
            .potential_allergy_issues
            .iter()
            .map(|i| (i.allergen_id.clone(), i.kind))
            .collect();
        assert!(kinds.contains(&("peanut".to_string(), IssueKind::DirectMatch)));
        assert!(kinds.contains(&("birch".to_string(), IssueKind::CrossReactivityWarning)));
        assert_eq!(kinds.len(), 2);
    }

    #[tokio::test]
    async fn empty_dictionary_yields_empty_result() {
        let store = MemoryStore::new();
        let result = analyze_text(&store, &RuleTokenizer, "peanut butter", &[])
            .await
            .unwrap();
        assert_eq!(result, AnalysisResult::default());
    }

    #[tokio::test]
    async fn malformed_dictionary_entry_is_an_error() {
        let store = MemoryStore::new();
        store
            .set(
                &paths::allergen("broken"),
                json!({ "label": "no name" }).as_object().cloned().unwrap(),
            )
            .await
            .unwrap();

        let result = analyze_text(&store, &RuleTokenizer, "anything", &[]).await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}
