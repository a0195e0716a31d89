//! Chef card prompt construction.

use crate::models::UserProfile;

/// Fixed prompt asking the model for a restaurant allergy card.
pub fn build_prompt(profile: &UserProfile) -> String {
    let allergies = profile.allergies.join(", ");

    format!(
        "Act as a helpful assistant for a person with severe food allergies.\n\
         Your task is to generate a clear, polite, but firm message for a restaurant chef on behalf of {name}.\n\
         The message should clearly state the person's allergies and emphasize the importance of preventing cross-contamination.\n\
         Do not add any preamble or extra conversation. Just generate the card text.\n\
         \n\
         The person is allergic to: {allergies}.\n\
         \n\
         Generate the text for the chef card now.\n",
        name = profile.display_name(),
        allergies = allergies,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_name_and_joined_allergies() {
        let profile = UserProfile {
            name: Some("Ana".to_string()),
            allergies: vec!["peanut".to_string(), "sesame".to_string()],
        };

        let prompt = build_prompt(&profile);
        assert!(prompt.contains("on behalf of Ana."));
        assert!(prompt.contains("The person is allergic to: peanut, sesame."));
    }

    #[test]
    fn unnamed_profile_uses_generic_customer() {
        let profile = UserProfile {
            name: None,
            allergies: vec!["egg".to_string()],
        };

        assert!(build_prompt(&profile).contains("on behalf of the customer."));
    }
}
