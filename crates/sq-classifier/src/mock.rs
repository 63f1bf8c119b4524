//! Mock classifier for testing. Serves pre-set scores or fails on demand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sq_protocol::Classification;

use crate::error::{ClassifierError, ClassifierResult};
use crate::ranking;
use crate::IntentClassifier;

enum Behavior {
    Scores(HashMap<String, f64>),
    Unavailable,
}

/// A mock classifier with fixed raw scores per label (missing labels score 0).
pub struct MockClassifier {
    behavior: Behavior,
    temperature: f64,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn with_scores<I, S>(scores: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            behavior: Behavior::Scores(scores.into_iter().map(|(l, s)| (l.into(), s)).collect()),
            temperature: 0.1,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Ranks `label` first with high confidence.
    pub fn favoring(label: impl Into<String>) -> Self {
        Self::with_scores([(label.into(), 1.0)])
    }

    /// Every call fails with `ClassifierError::Unavailable`.
    pub fn unavailable() -> Self {
        Self {
            behavior: Behavior::Unavailable,
            temperature: 0.1,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sleep before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `classify` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IntentClassifier for MockClassifier {
    async fn classify(&self, _text: &str, labels: &[String]) -> ClassifierResult<Classification> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            Behavior::Unavailable => Err(ClassifierError::Unavailable("mock offline".into())),
            Behavior::Scores(scores) => {
                let raw: Vec<f64> = labels
                    .iter()
                    .map(|l| scores.get(l).copied().unwrap_or(0.0))
                    .collect();
                ranking::rank(labels, &raw, self.temperature)
            }
        }
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}
