//! Lazily-initialized review sentiment classifier.
//!
//! The engine is loaded on the first `classify` call, exactly once even when
//! many calls arrive together, and then shared read-only by all callers.
//! Every failure path (load error, load timeout, inference error, inference
//! timeout, engine panic) degrades to [`SentimentLabel::Neutral`].

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use drinkorder_core::SentimentLabel;
use futures::FutureExt;
use tokio::sync::{Mutex, OnceCell, OwnedMutexGuard};
use tokio::time::Instant;

use crate::engine::{EngineLoader, SentimentEngine};
use crate::error::SentimentError;
use crate::threshold::label_for;
use crate::types::{ClassifierConfig, EngineStatus, LoadRetryPolicy};

#[derive(Debug)]
enum LoadState {
    NotAttempted,
    /// `retry_at == None` pins the failure for the process lifetime.
    Failed {
        failures: u32,
        retry_at: Option<Instant>,
    },
}

/// Maps review text to a [`SentimentLabel`]; never fails.
///
/// Construct one per process at the composition root and share it behind an
/// `Arc`. Inference calls run concurrently; only initialization is serialized.
pub struct SentimentClassifier<L: EngineLoader> {
    slot: Arc<EngineSlot<L>>,
    gate: Arc<Mutex<LoadState>>,
    inference_timeout: Duration,
}

/// State shared with the spawned load task.
struct EngineSlot<L: EngineLoader> {
    loader: L,
    load_timeout: Duration,
    retry: LoadRetryPolicy,
    engine: OnceCell<L::Engine>,
    unavailable: AtomicBool,
    load_attempts: AtomicU32,
}

impl<L: EngineLoader> SentimentClassifier<L> {
    /// Wrap `loader` without loading anything yet.
    #[must_use]
    pub fn new(loader: L, config: &ClassifierConfig) -> Self {
        Self {
            slot: Arc::new(EngineSlot {
                loader,
                load_timeout: config.load_timeout,
                retry: config.retry,
                engine: OnceCell::new(),
                unavailable: AtomicBool::new(false),
                load_attempts: AtomicU32::new(0),
            }),
            gate: Arc::new(Mutex::new(LoadState::NotAttempted)),
            inference_timeout: config.inference_timeout,
        }
    }

    /// Classify `text` as positive, negative, or neutral.
    ///
    /// The first call loads the engine and blocks until the load finishes,
    /// fails, or times out. Any failure yields [`SentimentLabel::Neutral`].
    pub async fn classify(&self, text: &str) -> SentimentLabel {
        let Some(engine) = self.engine().await else {
            return SentimentLabel::Neutral;
        };

        match guarded(self.inference_timeout, "inference", engine.predict(text)).await {
            Ok(prediction) => label_for(&prediction),
            Err(error) => {
                tracing::error!(
                    error = %error,
                    text_len = text.len(),
                    "sentiment inference failed; classifying as neutral"
                );
                SentimentLabel::Neutral
            }
        }
    }

    /// Current state of the engine slot. Does not trigger a load.
    #[must_use]
    pub fn status(&self) -> EngineStatus {
        if self.slot.engine.initialized() {
            EngineStatus::Ready
        } else if self.slot.unavailable.load(Ordering::Acquire) {
            EngineStatus::Unavailable
        } else {
            EngineStatus::Uninitialized
        }
    }

    /// Number of engine load attempts made so far.
    #[must_use]
    pub fn load_attempts(&self) -> u32 {
        self.slot.load_attempts.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn loader(&self) -> &L {
        &self.slot.loader
    }

    async fn engine(&self) -> Option<&L::Engine> {
        if let Some(engine) = self.slot.engine.get() {
            return Some(engine);
        }

        let state = Arc::clone(&self.gate).lock_owned().await;

        // Another caller may have finished loading while we waited.
        if let Some(engine) = self.slot.engine.get() {
            return Some(engine);
        }

        let previous_failures = match *state {
            LoadState::NotAttempted => 0,
            LoadState::Failed { retry_at: None, .. } => return None,
            LoadState::Failed {
                failures,
                retry_at: Some(at),
            } => {
                if Instant::now() < at {
                    return None;
                }
                failures
            }
        };

        // The attempt runs on its own task holding the gate, so it settles
        // even if this caller is dropped mid-load.
        let slot = Arc::clone(&self.slot);
        let attempt = tokio::spawn(async move { slot.load(state, previous_failures).await });
        if let Err(error) = attempt.await {
            tracing::error!(error = %error, "sentiment engine load task aborted");
        }

        self.slot.engine.get()
    }
}

impl<L: EngineLoader> EngineSlot<L> {
    async fn load(&self, mut state: OwnedMutexGuard<LoadState>, previous_failures: u32) {
        let attempt = self.load_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        match guarded(self.load_timeout, "engine load", self.loader.load()).await {
            Ok(engine) => {
                tracing::info!(attempt, "sentiment engine loaded");
                self.unavailable.store(false, Ordering::Release);
                self.engine.get_or_init(|| async move { engine }).await;
            }
            Err(error) => {
                let failures = previous_failures.saturating_add(1);
                let retry_in = self.retry.delay_after(failures).map(with_jitter);
                let retry_at = retry_in.and_then(|delay| Instant::now().checked_add(delay));
                tracing::error!(
                    attempt,
                    failures,
                    error = %error,
                    retry_in = ?retry_in,
                    "sentiment engine failed to load; classifying as neutral"
                );
                self.unavailable.store(true, Ordering::Release);
                *state = LoadState::Failed { failures, retry_at };
            }
        }
    }
}

/// Await `fut` with a deadline, turning panics and timeouts into errors.
async fn guarded<T>(
    limit: Duration,
    operation: &'static str,
    fut: impl Future<Output = Result<T, SentimentError>>,
) -> Result<T, SentimentError> {
    match tokio::time::timeout(limit, AssertUnwindSafe(fut).catch_unwind()).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(SentimentError::Panicked(operation)),
        Err(_) => Err(SentimentError::Timeout { operation, limit }),
    }
}

/// Spread retries by ±25% so restarted replicas do not load in lockstep.
fn with_jitter(delay: Duration) -> Duration {
    let factor = rand::random::<f64>() * 0.5 + 0.75;
    Duration::try_from_secs_f64(delay.as_secs_f64() * factor).unwrap_or(delay)
}
