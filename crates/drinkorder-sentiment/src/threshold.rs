//! Collapse raw engine predictions into the three persisted labels.

use drinkorder_core::SentimentLabel;

use crate::types::{RawLabel, RawPrediction};

/// A prediction must score strictly above this to count as polar.
pub const CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Map a raw prediction to a [`SentimentLabel`].
///
/// Low-confidence predictions (`score <= 0.7`, including NaN) and
/// unrecognized labels become [`SentimentLabel::Neutral`].
#[must_use]
pub fn label_for(prediction: &RawPrediction) -> SentimentLabel {
    let confident = prediction.score > CONFIDENCE_THRESHOLD;
    match (&prediction.label, confident) {
        (RawLabel::Positive, true) => SentimentLabel::Positive,
        (RawLabel::Negative, true) => SentimentLabel::Negative,
        (RawLabel::Positive | RawLabel::Negative, false) | (RawLabel::Unrecognized(_), _) => {
            SentimentLabel::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(raw: RawLabel, score: f32) -> SentimentLabel {
        label_for(&RawPrediction::new(raw, score))
    }

    #[test]
    fn threshold_is_strict() {
        assert_eq!(label(RawLabel::Positive, 0.70), SentimentLabel::Neutral);
        assert_eq!(label(RawLabel::Negative, 0.70), SentimentLabel::Neutral);
    }

    #[test]
    fn just_above_threshold_is_polar() {
        assert_eq!(label(RawLabel::Positive, 0.7001), SentimentLabel::Positive);
        assert_eq!(label(RawLabel::Negative, 0.71), SentimentLabel::Negative);
    }

    #[test]
    fn low_confidence_is_neutral() {
        assert_eq!(label(RawLabel::Positive, 0.55), SentimentLabel::Neutral);
        assert_eq!(label(RawLabel::Negative, 0.0), SentimentLabel::Neutral);
    }

    #[test]
    fn unrecognized_label_is_neutral_even_when_confident() {
        assert_eq!(
            label(RawLabel::Unrecognized("MIXED".to_string()), 0.99),
            SentimentLabel::Neutral
        );
    }

    #[test]
    fn nan_score_is_neutral() {
        assert_eq!(label(RawLabel::Positive, f32::NAN), SentimentLabel::Neutral);
    }
}
