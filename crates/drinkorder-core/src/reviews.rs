//! Review value types shared by the classifier, persistence, and HTTP layers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest review text accepted, counted in characters.
pub const MAX_REVIEW_TEXT_CHARS: usize = 500;

/// Emotional polarity persisted in `reviews.sentiment`.
///
/// Never-classified reviews default to [`SentimentLabel::Neutral`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl SentimentLabel {
    /// The lowercase string stored in the database and used in query filters.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SentimentLabel {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            other => Err(ReviewError::UnknownSentiment(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("rating must be between 1 and 5 stars, got {0}")]
    RatingOutOfRange(i16),

    #[error("review must be 500 characters or less, got {0}")]
    TextTooLong(usize),

    #[error("unknown sentiment label '{0}'")]
    UnknownSentiment(String),
}

/// A customer-submitted review before it is classified and stored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewDraft {
    pub rating: i16,
    #[serde(default)]
    pub text: Option<String>,
}

impl ReviewDraft {
    /// Check the star rating and text length.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::RatingOutOfRange`] unless `rating` is in `1..=5`,
    /// or [`ReviewError::TextTooLong`] if `text` exceeds
    /// [`MAX_REVIEW_TEXT_CHARS`] characters.
    pub fn validate(&self) -> Result<(), ReviewError> {
        if !(1..=5).contains(&self.rating) {
            return Err(ReviewError::RatingOutOfRange(self.rating));
        }
        if let Some(text) = &self.text {
            let chars = text.chars().count();
            if chars > MAX_REVIEW_TEXT_CHARS {
                return Err(ReviewError::TextTooLong(chars));
            }
        }
        Ok(())
    }
}

/// Whether an edit changed the review text.
///
/// Byte-for-byte comparison; a transition between absent and present text
/// counts as a change even when the present text is empty.
#[must_use]
pub fn text_changed(previous: Option<&str>, next: Option<&str>) -> bool {
    previous != next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_defaults_to_neutral() {
        assert_eq!(SentimentLabel::default(), SentimentLabel::Neutral);
    }

    #[test]
    fn sentiment_round_trips_through_str() {
        for label in [
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Neutral,
        ] {
            assert_eq!(label.as_str().parse::<SentimentLabel>(), Ok(label));
        }
    }

    #[test]
    fn sentiment_rejects_unknown_label() {
        assert_eq!(
            "mixed".parse::<SentimentLabel>(),
            Err(ReviewError::UnknownSentiment("mixed".to_string()))
        );
    }

    #[test]
    fn sentiment_serializes_lowercase() {
        let json = serde_json::to_string(&SentimentLabel::Positive).unwrap();
        assert_eq!(json, "\"positive\"");
    }

    #[test]
    fn draft_accepts_rating_bounds() {
        for rating in [1, 5] {
            let draft = ReviewDraft { rating, text: None };
            assert!(draft.validate().is_ok(), "rating {rating} should be valid");
        }
    }

    #[test]
    fn draft_rejects_rating_out_of_range() {
        for rating in [0, 6, -1] {
            let draft = ReviewDraft { rating, text: None };
            assert_eq!(
                draft.validate(),
                Err(ReviewError::RatingOutOfRange(rating))
            );
        }
    }

    #[test]
    fn draft_text_limit_counts_characters_not_bytes() {
        // 500 multi-byte characters is still within the limit.
        let draft = ReviewDraft {
            rating: 4,
            text: Some("é".repeat(MAX_REVIEW_TEXT_CHARS)),
        };
        assert!(draft.validate().is_ok());

        let draft = ReviewDraft {
            rating: 4,
            text: Some("a".repeat(MAX_REVIEW_TEXT_CHARS + 1)),
        };
        assert_eq!(
            draft.validate(),
            Err(ReviewError::TextTooLong(MAX_REVIEW_TEXT_CHARS + 1))
        );
    }

    #[test]
    fn text_changed_detects_edits() {
        assert!(!text_changed(Some("Great drink!"), Some("Great drink!")));
        assert!(text_changed(Some("Great drink!"), Some("Great drink")));
        assert!(!text_changed(None, None));
    }

    #[test]
    fn text_changed_treats_absent_and_empty_as_different() {
        assert!(text_changed(None, Some("")));
        assert!(text_changed(Some(""), None));
    }
}
