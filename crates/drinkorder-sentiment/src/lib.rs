//! Review sentiment classification for the drink-ordering service.
//!
//! A [`SentimentClassifier`] lazily loads one engine (a TEI-hosted
//! sequence-classification model or an offline lexicon), thresholds its raw
//! predictions into positive / negative / neutral, and never surfaces an
//! error: every failure degrades to neutral. The [`hook`] module encodes when
//! review persistence should call it.

pub mod backend;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod hook;
pub mod lexicon;
pub mod tei;
pub mod threshold;
pub mod types;

pub use backend::{build_review_classifier, BackendEngine, EngineBackend, ReviewClassifier};
pub use classifier::SentimentClassifier;
pub use engine::{EngineLoader, SentimentEngine};
pub use error::SentimentError;
pub use hook::{sentiment_for_edited_review, sentiment_for_new_review, SentimentUpdate};
pub use lexicon::{LexiconEngine, LexiconLoader};
pub use tei::{TeiEngine, TeiLoader};
pub use threshold::{label_for, CONFIDENCE_THRESHOLD};
pub use types::{ClassifierConfig, EngineStatus, LoadRetryPolicy, RawLabel, RawPrediction};
