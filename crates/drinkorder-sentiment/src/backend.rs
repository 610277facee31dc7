//! Runtime selection between the TEI and lexicon engines.

use drinkorder_core::SentimentBackend;

use crate::classifier::SentimentClassifier;
use crate::engine::{EngineLoader, SentimentEngine};
use crate::error::SentimentError;
use crate::lexicon::{LexiconEngine, LexiconLoader};
use crate::tei::{TeiEngine, TeiLoader};
use crate::types::{ClassifierConfig, RawPrediction};

/// Loader chosen from [`ClassifierConfig::backend`].
#[derive(Debug, Clone)]
pub enum EngineBackend {
    Tei(TeiLoader),
    Lexicon(LexiconLoader),
}

/// Engine produced by [`EngineBackend`].
#[derive(Debug, Clone)]
pub enum BackendEngine {
    Tei(TeiEngine),
    Lexicon(LexiconEngine),
}

/// The classifier type the binaries construct.
pub type ReviewClassifier = SentimentClassifier<EngineBackend>;

impl EngineBackend {
    /// Pick the loader for `config.backend`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Load`] when the TEI backend is selected
    /// without a TEI URL.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, SentimentError> {
        match config.backend {
            SentimentBackend::Tei => {
                let url = config.tei_url.as_deref().ok_or_else(|| {
                    SentimentError::Load("TEI backend selected without a TEI URL".to_string())
                })?;
                Ok(EngineBackend::Tei(TeiLoader::new(url)))
            }
            SentimentBackend::Lexicon => Ok(EngineBackend::Lexicon(LexiconLoader::new(
                config.lexicon_path.clone(),
            ))),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            EngineBackend::Tei(_) => "tei",
            EngineBackend::Lexicon(_) => "lexicon",
        }
    }
}

impl EngineLoader for EngineBackend {
    type Engine = BackendEngine;

    async fn load(&self) -> Result<BackendEngine, SentimentError> {
        match self {
            EngineBackend::Tei(loader) => loader.load().await.map(BackendEngine::Tei),
            EngineBackend::Lexicon(loader) => loader.load().await.map(BackendEngine::Lexicon),
        }
    }
}

impl SentimentEngine for BackendEngine {
    async fn predict(&self, text: &str) -> Result<RawPrediction, SentimentError> {
        match self {
            BackendEngine::Tei(engine) => engine.predict(text).await,
            BackendEngine::Lexicon(engine) => engine.predict(text).await,
        }
    }
}

/// Build the configured classifier. The engine itself loads on first use.
///
/// # Errors
///
/// See [`EngineBackend::from_config`].
pub fn build_review_classifier(
    config: &ClassifierConfig,
) -> Result<ReviewClassifier, SentimentError> {
    let backend = EngineBackend::from_config(config)?;
    tracing::debug!(backend = backend.name(), "sentiment classifier configured");
    Ok(SentimentClassifier::new(backend, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tei_backend_requires_url() {
        let config = ClassifierConfig {
            backend: SentimentBackend::Tei,
            ..ClassifierConfig::default()
        };
        assert!(matches!(
            EngineBackend::from_config(&config),
            Err(SentimentError::Load(_))
        ));
    }

    #[test]
    fn default_config_selects_lexicon() {
        let backend = EngineBackend::from_config(&ClassifierConfig::default()).unwrap();
        assert_eq!(backend.name(), "lexicon");
    }

    #[tokio::test]
    async fn lexicon_backend_classifies_end_to_end() {
        let classifier = build_review_classifier(&ClassifierConfig::default()).unwrap();
        assert_eq!(
            classifier.classify("I loved this!").await,
            drinkorder_core::SentimentLabel::Positive
        );
        assert_eq!(
            classifier.classify("This was awful").await,
            drinkorder_core::SentimentLabel::Negative
        );
        assert_eq!(
            classifier.classify("It was okay I guess").await,
            drinkorder_core::SentimentLabel::Neutral
        );
        assert_eq!(classifier.load_attempts(), 1);
    }
}
