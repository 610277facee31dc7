//! Scripted engines with call counters for classifier tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use drinkorder_sentiment::{
    ClassifierConfig, EngineLoader, RawLabel, RawPrediction, SentimentEngine, SentimentError,
};

/// How a loaded [`StubEngine`] answers `predict`.
#[derive(Debug, Clone, Copy)]
pub enum Inference {
    Table,
    Fail,
    Panic,
    Hang,
}

pub struct StubLoader {
    pub loads: Arc<AtomicU32>,
    pub predictions: Arc<AtomicU32>,
    fail_first: u32,
    load_delay: Duration,
    inference: Inference,
    table: HashMap<String, RawPrediction>,
}

impl StubLoader {
    /// Loads on the first attempt and knows the canonical example reviews.
    pub fn new() -> Self {
        Self {
            loads: Arc::new(AtomicU32::new(0)),
            predictions: Arc::new(AtomicU32::new(0)),
            fail_first: 0,
            load_delay: Duration::ZERO,
            inference: Inference::Table,
            table: HashMap::new(),
        }
        .with_prediction("I loved this!", RawLabel::Positive, 0.95)
        .with_prediction("This was awful", RawLabel::Negative, 0.88)
        .with_prediction("It was okay I guess", RawLabel::Positive, 0.55)
        .with_prediction("Great drink!", RawLabel::Positive, 0.93)
        .with_prediction("Too sweet, never again", RawLabel::Negative, 0.91)
    }

    /// Every load attempt fails.
    pub fn failing() -> Self {
        Self::new().fail_first(u32::MAX)
    }

    /// The first `n` load attempts fail, later ones succeed.
    pub fn fail_first(mut self, n: u32) -> Self {
        self.fail_first = n;
        self
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    pub fn with_inference(mut self, inference: Inference) -> Self {
        self.inference = inference;
        self
    }

    pub fn with_prediction(mut self, text: &str, label: RawLabel, score: f32) -> Self {
        self.table
            .insert(text.to_string(), RawPrediction::new(label, score));
        self
    }

    pub fn load_count(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.loads)
    }

    pub fn prediction_count(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.predictions)
    }
}

impl EngineLoader for StubLoader {
    type Engine = StubEngine;

    async fn load(&self) -> Result<StubEngine, SentimentError> {
        let attempt = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }
        if attempt <= self.fail_first {
            return Err(SentimentError::Load("model fetch failed".to_string()));
        }
        Ok(StubEngine {
            table: self.table.clone(),
            inference: self.inference,
            predictions: Arc::clone(&self.predictions),
        })
    }
}

pub struct StubEngine {
    table: HashMap<String, RawPrediction>,
    inference: Inference,
    predictions: Arc<AtomicU32>,
}

impl SentimentEngine for StubEngine {
    async fn predict(&self, text: &str) -> Result<RawPrediction, SentimentError> {
        self.predictions.fetch_add(1, Ordering::SeqCst);
        match self.inference {
            Inference::Table => Ok(self
                .table
                .get(text)
                .cloned()
                .unwrap_or_else(|| RawPrediction::new(RawLabel::Positive, 0.5))),
            Inference::Fail => Err(SentimentError::Inference(
                "tokenizer rejected input".to_string(),
            )),
            Inference::Panic => panic!("engine crashed mid-inference"),
            Inference::Hang => std::future::pending().await,
        }
    }
}

pub fn test_config() -> ClassifierConfig {
    ClassifierConfig {
        load_timeout: Duration::from_secs(5),
        inference_timeout: Duration::from_secs(1),
        ..ClassifierConfig::default()
    }
}

pub fn count(counter: &AtomicU32) -> u32 {
    counter.load(Ordering::SeqCst)
}
