//! Offline lexicon engine tuned for bar and drink reviews.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::engine::{EngineLoader, SentimentEngine};
use crate::error::SentimentError;
use crate::types::{RawLabel, RawPrediction};

/// Built-in word weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The summed score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("great", 0.4),
    ("good", 0.3),
    ("excellent", 0.5),
    ("amazing", 0.5),
    ("love", 0.5),
    ("loved", 0.5),
    ("best", 0.5),
    ("recommend", 0.4),
    ("delicious", 0.5),
    ("tasty", 0.4),
    ("refreshing", 0.4),
    ("smooth", 0.3),
    ("perfect", 0.5),
    ("fresh", 0.3),
    ("friendly", 0.3),
    ("fast", 0.2),
    ("favorite", 0.4),
    ("enjoyed", 0.4),
    ("fantastic", 0.5),
    ("balanced", 0.3),
    // Negative signals
    ("bad", -0.4),
    ("awful", -0.6),
    ("terrible", -0.6),
    ("worst", -0.6),
    ("disgusting", -0.7),
    ("gross", -0.5),
    ("bland", -0.4),
    ("watery", -0.4),
    ("flat", -0.3),
    ("warm", -0.2),
    ("stale", -0.4),
    ("bitter", -0.3),
    ("overpriced", -0.4),
    ("slow", -0.3),
    ("rude", -0.5),
    ("sick", -0.5),
    ("disappointing", -0.5),
    ("disappointed", -0.5),
    ("hate", -0.6),
    ("never", -0.2),
];

fn score_with(text: &str, weight_of: impl Fn(&str) -> Option<f32>) -> f32 {
    let mut score = 0.0_f32;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if let Some(weight) = weight_of(&w) {
            score += weight;
        }
    }
    score.clamp(-1.0, 1.0)
}

/// Turn a signed lexicon score into a binary-classifier style prediction.
///
/// The sign picks the label; confidence grows from 0.5 (no signal) to 1.0
/// (saturated score), so only strongly worded reviews clear the
/// classification threshold.
fn prediction_from_score(score: f32) -> RawPrediction {
    let label = if score < 0.0 {
        RawLabel::Negative
    } else {
        RawLabel::Positive
    };
    RawPrediction::new(label, 0.5 + score.abs() / 2.0)
}

/// Lexicon engine. Holds the word table in memory.
#[derive(Debug, Clone)]
pub struct LexiconEngine {
    weights: HashMap<String, f32>,
}

impl LexiconEngine {
    /// Engine backed by the built-in [`LEXICON`].
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            weights: LEXICON
                .iter()
                .map(|&(word, weight)| (word.to_string(), weight))
                .collect(),
        }
    }

    /// Sum the weights of known words, clamped to `[-1.0, 1.0]`. Unknown or
    /// empty text scores `0.0`.
    #[must_use]
    pub fn score(&self, text: &str) -> f32 {
        score_with(text, |word| self.weights.get(word).copied())
    }
}

impl SentimentEngine for LexiconEngine {
    async fn predict(&self, text: &str) -> Result<RawPrediction, SentimentError> {
        Ok(prediction_from_score(self.score(text)))
    }
}

/// Loads a [`LexiconEngine`] from the built-in table or a JSON file.
///
/// The file must be a JSON object mapping words to weights in `[-1.0, 1.0]`,
/// e.g. `{"crisp": 0.4, "syrupy": -0.3}`. Words are lowercased on load.
#[derive(Debug, Clone, Default)]
pub struct LexiconLoader {
    path: Option<PathBuf>,
}

impl LexiconLoader {
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl EngineLoader for LexiconLoader {
    type Engine = LexiconEngine;

    async fn load(&self) -> Result<LexiconEngine, SentimentError> {
        let Some(path) = &self.path else {
            return Ok(LexiconEngine::builtin());
        };

        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            SentimentError::Lexicon(format!("cannot read {}: {e}", path.display()))
        })?;
        let table: HashMap<String, f32> = serde_json::from_str(&raw).map_err(|e| {
            SentimentError::Lexicon(format!("invalid lexicon JSON in {}: {e}", path.display()))
        })?;

        if table.is_empty() {
            return Err(SentimentError::Lexicon(format!(
                "lexicon {} has no entries",
                path.display()
            )));
        }
        if let Some((word, weight)) = table
            .iter()
            .find(|(_, weight)| !(-1.0..=1.0).contains(*weight))
        {
            return Err(SentimentError::Lexicon(format!(
                "weight for '{word}' must be within [-1.0, 1.0], got {weight}"
            )));
        }

        tracing::info!(path = %path.display(), words = table.len(), "loaded sentiment lexicon");
        Ok(LexiconEngine {
            weights: table
                .into_iter()
                .map(|(word, weight)| (word.to_lowercase(), weight))
                .collect(),
        })
    }
}
