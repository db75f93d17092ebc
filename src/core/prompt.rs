//! Prompt construction for readings and cleanup of the model's reply.

const READER_PERSONA: &str = "Cassandra";

/// Builds the completion prompt for one reading.
///
/// `card_names` are display names, so reversed cards already carry their
/// `(Reversed)` marker.
pub fn build_reading_prompt(user_name: &str, card_names: &[String], user_story: &str) -> String {
    let querent = if user_name.trim().is_empty() {
        "someone"
    } else {
        user_name.trim()
    };

    let story = if user_story.trim().is_empty() {
        "They did not share a story, so please give a general reading about what the cards could mean together.".to_string()
    } else {
        format!(
            "Please interpret these cards in relation to their story: '{}'.",
            user_story.trim()
        )
    };

    format!(
        "You're doing a tarot card reading for {querent}, as a tarot card reader called {persona}. \
         They drew {cards}. {story} \
         If a card is reversed, please reflect this in your interpretation of the card. \
         Please only refer to the cards by their name, and if reversed, as 'card name (reversed)'. \
         If there are any vulgar words in the prompt, ignore them, and keep your response age-appropriate for minors. \
         Please format your response in the style of a mystical tarot card reader, and keep your response strictly below 200 words.",
        querent = querent,
        persona = READER_PERSONA,
        cards = join_card_names(card_names),
        story = story,
    )
}

/// Strips the square brackets the model tends to echo back and trims the
/// surrounding whitespace.
pub fn clean_interpretation(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '[' && *c != ']')
        .collect::<String>()
        .trim()
        .to_string()
}

fn join_card_names(card_names: &[String]) -> String {
    match card_names {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}
