//! When review persistence should (re)classify review text.

use drinkorder_core::{text_changed, SentimentLabel};

use crate::classifier::SentimentClassifier;
use crate::engine::EngineLoader;

/// Outcome of running the edit hook for an existing review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentUpdate {
    /// Label to persist.
    pub sentiment: SentimentLabel,
    /// `true` if the classifier ran for this edit.
    pub reclassified: bool,
}

/// Sentiment for a newly created review. Always classifies; absent text is
/// classified as the empty string.
pub async fn sentiment_for_new_review<L: EngineLoader>(
    classifier: &SentimentClassifier<L>,
    text: Option<&str>,
) -> SentimentLabel {
    classifier.classify(text.unwrap_or_default()).await
}

/// Sentiment for an edited review.
///
/// Classifies only when the text differs from `previous_text`; otherwise the
/// stored `previous_sentiment` is kept untouched. Logs when the label changes.
pub async fn sentiment_for_edited_review<L: EngineLoader>(
    classifier: &SentimentClassifier<L>,
    review_id: i64,
    previous_text: Option<&str>,
    previous_sentiment: SentimentLabel,
    new_text: Option<&str>,
) -> SentimentUpdate {
    if !text_changed(previous_text, new_text) {
        return SentimentUpdate {
            sentiment: previous_sentiment,
            reclassified: false,
        };
    }

    let sentiment = classifier.classify(new_text.unwrap_or_default()).await;
    if sentiment != previous_sentiment {
        tracing::info!(
            review_id,
            previous = %previous_sentiment,
            new = %sentiment,
            "review sentiment changed"
        );
    }

    SentimentUpdate {
        sentiment,
        reclassified: true,
    }
}
