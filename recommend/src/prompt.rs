//! Prompt construction and reply parsing.

use crate::error::{RecommendError, Result};
use crate::types::{MoodRequest, Recommendation};

/// Suggestions asked for when the user describes a mood in free text.
pub const DESCRIPTION_SUGGESTIONS: usize = 5;

/// Suggestions asked for when the user picks a mood and/or genre.
pub const PLAYLIST_SUGGESTIONS: usize = 10;

const SYSTEM_PROMPT: &str = "You are a music expert who builds playlists that match how people feel. \
Only suggest songs that exist on major streaming services. \
Reply with a single JSON object and nothing else.";

/// System prompt sent with every request.
#[must_use]
pub const fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Build the user prompt for `request`.
///
/// A free-text description asks for a short list of songs; a mood and/or
/// genre also asks for a playlist description. `language` selects the
/// language of titles and the description.
#[must_use]
pub fn build_prompt(request: &MoodRequest, language: Option<&str>) -> String {
    let mut prompt = String::new();

    if let Some(description) = request.description() {
        prompt.push_str(&format!(
            "The user described their mood as follows.\n\nMood description: {description}\n\n"
        ));
        prompt.push_str(&format!(
            "Suggest {DESCRIPTION_SUGGESTIONS} songs that match this emotional state.\n"
        ));
    } else {
        prompt.push_str("Build a playlist for the following request.\n\n");
        if let Some(mood) = request.mood_label() {
            prompt.push_str(&format!("Mood: {mood}\n"));
        }
        if let Some(genre) = request.genre_label() {
            prompt.push_str(&format!("Genre: {genre}\n"));
        }
        prompt.push_str(&format!(
            "\nWrite a one or two sentence playlist description and suggest {PLAYLIST_SUGGESTIONS} songs.\n"
        ));
    }

    if let Some(language) = language.map(str::trim).filter(|l| !l.is_empty()) {
        prompt.push_str(&format!("Write your answer in {language}.\n"));
    }

    prompt.push_str(
        "\nFormat every song as \"<title> by <artist>\" and reply with JSON of the form:\n\
         {\"playlistDescription\": \"...\", \"songSuggestions\": [\"<title> by <artist>\", ...]}",
    );

    prompt
}

/// Parse the model's reply into a normalized recommendation.
///
/// The JSON object may be wrapped in a fenced code block or surrounded by
/// prose; the outermost `{...}` is used.
///
/// # Errors
///
/// - [`RecommendError::ResponseParseFailed`] if no JSON object can be read
/// - [`RecommendError::Unavailable`] if it holds no usable suggestion
pub fn parse_reply(text: &str) -> Result<Recommendation> {
    let json = extract_json_object(text).ok_or_else(|| {
        RecommendError::ResponseParseFailed("reply contains no JSON object".to_string())
    })?;

    let recommendation: Recommendation = serde_json::from_str(json)
        .map_err(|e| RecommendError::ResponseParseFailed(e.to_string()))?;

    recommendation.normalized()
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_description_prompt() {
        let prompt = build_prompt(
            &MoodRequest::from_description("tired but hopeful"),
            Some("Korean"),
        );
        assert!(prompt.contains("Mood description: tired but hopeful"));
        assert!(prompt.contains("Suggest 5 songs"));
        assert!(prompt.contains("Write your answer in Korean."));
        assert!(prompt.contains("<title> by <artist>"));
    }

    #[test]
    fn test_mood_and_genre_prompt() {
        let prompt = build_prompt(&MoodRequest::from_mood("chill").with_genre("jazz"), None);
        assert!(prompt.contains("Mood: chill\n"));
        assert!(prompt.contains("Genre: jazz\n"));
        assert!(prompt.contains("playlist description"));
        assert!(!prompt.contains("Write your answer in"));
    }

    #[test]
    fn test_parse_fenced_reply() {
        let reply = "Here you go:\n```json\n{\"playlistDescription\": \"Slow evening\", \
                     \"songSuggestions\": [\"Song A by Artist X\", \"Song A by Artist X\"]}\n```";
        let recommendation = parse_reply(reply).unwrap();

        assert_eq!(
            recommendation.playlist_description.as_deref(),
            Some("Slow evening")
        );
        assert_eq!(recommendation.song_suggestions, vec!["Song A by Artist X"]);
    }

    #[test]
    fn test_parse_reply_without_json() {
        assert!(matches!(
            parse_reply("I cannot help with that."),
            Err(RecommendError::ResponseParseFailed(_))
        ));
    }

    #[test]
    fn test_parse_reply_without_songs() {
        assert_eq!(
            parse_reply("{\"songSuggestions\": []}"),
            Err(RecommendError::Unavailable)
        );
    }
}
