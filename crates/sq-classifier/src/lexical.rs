//! Lexical classifier: model-free label ranking.
//!
//! Scores each label by the best token-set similarity between the
//! normalized utterance and the normalized label or any of its example
//! patterns. Runs locally at sub-millisecond latency, so it serves as the
//! offline engine and as the fallback tier behind a remote classifier.

use std::collections::HashMap;

use async_trait::async_trait;
use sq_protocol::{Classification, IntentSet};
use sq_text::{Locale, Normalizer, token_set_ratio};

use crate::error::ClassifierResult;
use crate::ranking;
use crate::IntentClassifier;

/// Default softmax temperature over similarities scaled to [0, 1].
pub const DEFAULT_TEMPERATURE: f64 = 0.1;

/// Token-set similarity classifier over labels and their patterns.
#[derive(Debug)]
pub struct LexicalClassifier {
    normalizer: Normalizer,
    /// Normalized example patterns, keyed by label.
    patterns: HashMap<String, Vec<String>>,
    temperature: f64,
}

impl LexicalClassifier {
    pub fn new(locale: Locale) -> Self {
        Self {
            normalizer: Normalizer::new(locale),
            patterns: HashMap::new(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Classifier that also scores against each intent's example patterns.
    pub fn from_intents(locale: Locale, intents: &IntentSet) -> Self {
        let mut classifier = Self::new(locale);
        for intent in intents.iter() {
            classifier.add_patterns(&intent.tag, &intent.patterns);
        }
        classifier
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn add_patterns(&mut self, label: &str, patterns: &[String]) {
        let normalized = patterns
            .iter()
            .map(|p| self.normalizer.normalize(p))
            .filter(|p| !p.is_empty());
        self.patterns
            .entry(label.to_string())
            .or_default()
            .extend(normalized);
    }

    /// Best similarity of `text` (already normalized) to `label`, in [0, 1].
    fn score(&self, text: &str, label: &str) -> f64 {
        let own = token_set_ratio(text, &self.normalizer.normalize(label));
        let best = self
            .patterns
            .get(label)
            .into_iter()
            .flatten()
            .map(|p| token_set_ratio(text, p))
            .fold(own, u8::max);
        f64::from(best) / 100.0
    }
}

#[async_trait]
impl IntentClassifier for LexicalClassifier {
    async fn classify(&self, text: &str, labels: &[String]) -> ClassifierResult<Classification> {
        ranking::validate_labels(labels)?;
        let text = self.normalizer.normalize(text);
        let scores: Vec<f64> = labels.iter().map(|l| self.score(&text, l)).collect();
        ranking::rank(labels, &scores, self.temperature)
    }

    fn backend_name(&self) -> &str {
        "lexical"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sq_protocol::Intent;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn picks_label_mentioned_in_text() {
        let c = LexicalClassifier::new(Locale::En)
            .classify(
                "how many aspirin tablets do we have",
                &labels(&["bandage", "aspirin", "gauze"]),
            )
            .await
            .unwrap();
        assert_eq!(c.top().unwrap().label, "aspirin");
        assert_eq!(c.len(), 3);
        assert!((c.total_confidence() - 1.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn patterns_extend_label_vocabulary() {
        let intents = IntentSet::new(vec![
            Intent::new("dipirona").with_patterns(&["remédio para dor de cabeça"]),
            Intent::new("curativo").with_patterns(&["band-aid", "machucado"]),
        ])
        .unwrap();
        let classifier = LexicalClassifier::from_intents(Locale::Pt, &intents);

        let c = classifier
            .classify("tem algum remédio para dor?", &intents.tags())
            .await
            .unwrap();
        assert_eq!(c.top().unwrap().label, "dipirona");
    }

    #[tokio::test]
    async fn no_signal_gives_uniform_ranking_in_input_order() {
        let l = labels(&["gauze", "aspirin", "bandage"]);
        let c = LexicalClassifier::new(Locale::En)
            .classify("what is the", &l)
            .await
            .unwrap();
        let order: Vec<_> = c.ranking.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(order, vec!["gauze", "aspirin", "bandage"]);
        for entry in &c.ranking {
            assert!((entry.confidence - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn deterministic() {
        let classifier = LexicalClassifier::new(Locale::En);
        let l = labels(&["aspirin", "ibuprofen"]);
        let a = classifier.classify("ibuprofen 400mg", &l).await.unwrap();
        let b = classifier.classify("ibuprofen 400mg", &l).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.top().unwrap().label, "ibuprofen");
    }

    #[tokio::test]
    async fn rejects_empty_labels() {
        let result = LexicalClassifier::new(Locale::En)
            .classify("aspirin", &[])
            .await;
        assert!(result.is_err());
    }
}
