//! Request and result types of the recommendation service.

use crate::error::{RecommendError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What the user asked for.
///
/// Either a free-text mood description, or a short mood and/or genre.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoodRequest {
    /// Free-text description of how the user feels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_description: Option<String>,

    /// Short mood label (e.g. "chill").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,

    /// Genre (e.g. "jazz").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl MoodRequest {
    /// Request from a free-text mood description.
    #[must_use]
    pub fn from_description(description: impl Into<String>) -> Self {
        Self {
            mood_description: Some(description.into()),
            ..Self::default()
        }
    }

    /// Request from a mood label and optional genre.
    #[must_use]
    pub fn from_mood(mood: impl Into<String>) -> Self {
        Self {
            mood: Some(mood.into()),
            ..Self::default()
        }
    }

    /// Builder: set the genre.
    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Free-text description, if non-blank.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        non_blank(self.mood_description.as_deref())
    }

    /// Mood label, if non-blank.
    #[must_use]
    pub fn mood_label(&self) -> Option<&str> {
        non_blank(self.mood.as_deref())
    }

    /// Genre, if non-blank.
    #[must_use]
    pub fn genre_label(&self) -> Option<&str> {
        non_blank(self.genre.as_deref())
    }

    /// Check that at least one field carries content.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::InvalidRequest`] if every field is blank.
    pub fn validate(&self) -> Result<()> {
        if self.description().is_none() && self.mood_label().is_none() && self.genre_label().is_none()
        {
            return Err(RecommendError::InvalidRequest(
                "moodDescription, mood or genre is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Suggestions for a mood.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// One or two sentences describing the playlist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_description: Option<String>,

    /// Ordered suggestions, each `"<title> by <artist>"`.
    #[serde(default, alias = "suggestedSongs")]
    pub song_suggestions: Vec<String>,
}

impl Recommendation {
    /// Trim, drop blank and duplicate suggestions (first occurrence wins).
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::Unavailable`] if nothing usable remains.
    pub fn normalized(self) -> Result<Self> {
        let mut seen = HashSet::new();
        let song_suggestions: Vec<String> = self
            .song_suggestions
            .into_iter()
            .map(|song| song.trim().to_string())
            .filter(|song| !song.is_empty())
            .filter(|song| seen.insert(song.to_lowercase()))
            .collect();

        if song_suggestions.is_empty() {
            return Err(RecommendError::Unavailable);
        }

        Ok(Self {
            playlist_description: self
                .playlist_description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            song_suggestions,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
