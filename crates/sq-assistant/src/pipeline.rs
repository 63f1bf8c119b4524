//! Resolution pipeline: normalize → classify → fetch catalog → match → reply.
//!
//! `Resolver` is the context object built once at startup. It owns the
//! intent set, the normalizer and the matcher, and holds the classifier and
//! catalog behind trait objects so tests can swap in mocks. Every failure past
//! startup is recovered here and turned into a reply; `resolve` never errors.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use sq_catalog::CatalogStore;
use sq_classifier::IntentClassifier;
use sq_protocol::{
    Classification, ErrorKind, IntentSet, MatchCandidate, Resolution, ResolutionOutcome,
    ResolutionStage,
};
use sq_text::{DEFAULT_THRESHOLD, Locale, Matcher, Normalizer};

use crate::breaker::{BreakerState, CircuitBreaker};
use crate::config::AssistantConfig;
use crate::messages::Messages;

/// Tunables for a `Resolver`.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub locale: Locale,
    pub threshold: u8,
    pub ambiguity_margin: Option<f64>,
    pub classify_timeout: Duration,
    pub breaker_failures: u32,
    pub breaker_cooldown: Duration,
}

impl ResolverSettings {
    pub fn from_config(config: &AssistantConfig) -> Self {
        Self {
            locale: config.locale,
            threshold: config.matcher.threshold,
            ambiguity_margin: config.pipeline.ambiguity_margin,
            classify_timeout: Duration::from_secs(config.pipeline.classify_timeout_secs),
            breaker_failures: config.pipeline.breaker_failures,
            breaker_cooldown: Duration::from_secs(config.pipeline.breaker_cooldown_secs),
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            threshold: DEFAULT_THRESHOLD,
            ambiguity_margin: None,
            classify_timeout: Duration::from_secs(15),
            breaker_failures: 3,
            breaker_cooldown: Duration::from_secs(30),
        }
    }
}

pub struct Resolver {
    intents: IntentSet,
    labels: Vec<String>,
    normalizer: Normalizer,
    classifier: Arc<dyn IntentClassifier>,
    catalog: Arc<dyn CatalogStore>,
    matcher: Matcher,
    messages: Messages,
    ambiguity_margin: Option<f64>,
    classify_timeout: Duration,
    breaker: CircuitBreaker,
}

impl Resolver {
    pub fn new(
        intents: IntentSet,
        classifier: Arc<dyn IntentClassifier>,
        catalog: Arc<dyn CatalogStore>,
        settings: ResolverSettings,
    ) -> Self {
        let labels = intents.tags();
        Self {
            intents,
            labels,
            normalizer: Normalizer::new(settings.locale),
            classifier,
            catalog,
            matcher: Matcher::new(settings.threshold),
            messages: Messages::new(settings.locale),
            ambiguity_margin: settings.ambiguity_margin,
            classify_timeout: settings.classify_timeout,
            breaker: CircuitBreaker::new(settings.breaker_failures, settings.breaker_cooldown),
        }
    }

    pub fn messages(&self) -> Messages {
        self.messages
    }

    pub fn intents(&self) -> &IntentSet {
        &self.intents
    }

    pub fn breaker_state(&self) -> BreakerState {
        self.breaker.state()
    }

    /// Resolve one utterance into an outcome with its reply text.
    pub async fn resolve(&self, utterance: &str) -> ResolutionOutcome {
        let id = Uuid::now_v7();
        let span = tracing::info_span!("resolve", resolution_id = %id);
        self.run(id, utterance).instrument(span).await
    }

    /// Resolve and return only the reply text.
    pub async fn respond(&self, utterance: &str) -> String {
        self.resolve(utterance).await.response
    }

    async fn run(&self, id: Uuid, utterance: &str) -> ResolutionOutcome {
        let start = Instant::now();
        tracing::debug!(stage = %ResolutionStage::Start, "resolution started");

        let normalized = self.normalizer.normalize(utterance);
        tracing::debug!(
            stage = %ResolutionStage::Normalized,
            normalized = %normalized,
            "utterance normalized"
        );

        let (label, resolution) = self.resolve_normalized(&normalized).await;
        let response = self.messages.render(&resolution);
        let latency_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            stage = %ResolutionStage::Responded,
            label = label.as_deref().unwrap_or("-"),
            found = resolution.is_found(),
            latency_ms,
            "resolution complete"
        );

        ResolutionOutcome {
            id,
            utterance: utterance.to_string(),
            normalized: Some(normalized),
            label,
            resolution,
            response,
            latency_ms,
        }
    }

    async fn resolve_normalized(&self, normalized: &str) -> (Option<String>, Resolution) {
        let classification = match self.classify(normalized).await {
            Ok(c) => c,
            Err(kind) => return (None, Resolution::Error { kind }),
        };

        let Some(top) = classification
            .top()
            .filter(|top| self.intents.contains(&top.label))
        else {
            tracing::warn!(
                backend = self.classifier.backend_name(),
                "classifier returned no known label"
            );
            return (
                None,
                Resolution::Error {
                    kind: ErrorKind::ClassifierUnavailable,
                },
            );
        };
        let label = top.label.clone();
        tracing::debug!(
            stage = %ResolutionStage::Classified,
            label = %label,
            confidence = top.confidence,
            "utterance classified"
        );

        if let Some(min_margin) = self.ambiguity_margin
            && let Some(margin) = classification.margin()
            && margin < min_margin
        {
            tracing::info!(label = %label, margin, min_margin, "classification ambiguous");
            return (Some(label.clone()), Resolution::Ambiguous { label, margin });
        }

        let resolution = self.match_label(&label).await;
        (Some(label), resolution)
    }

    /// Classify through the breaker with a timeout. Any failure maps to
    /// `ClassifierUnavailable`.
    async fn classify(&self, text: &str) -> Result<Classification, ErrorKind> {
        if !self.breaker.allow() {
            tracing::warn!("classifier circuit open, skipping classification");
            return Err(ErrorKind::ClassifierUnavailable);
        }

        let call = self.classifier.classify(text, &self.labels);
        match tokio::time::timeout(self.classify_timeout, call).await {
            Ok(Ok(classification)) => {
                self.breaker.record_success();
                log_ranking(&classification);
                Ok(classification)
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    backend = self.classifier.backend_name(),
                    error = %e,
                    "classification failed"
                );
                self.breaker.record_failure();
                Err(ErrorKind::ClassifierUnavailable)
            }
            Err(_) => {
                tracing::warn!(
                    backend = self.classifier.backend_name(),
                    timeout_ms = self.classify_timeout.as_millis() as u64,
                    "classification timed out"
                );
                self.breaker.record_failure();
                Err(ErrorKind::ClassifierUnavailable)
            }
        }
    }

    /// Read the catalog fresh and pick the best-scoring name for `label`.
    async fn match_label(&self, label: &str) -> Resolution {
        let records = match self.catalog.fetch_all().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    backend = self.catalog.backend_name(),
                    error = %e,
                    "catalog read failed"
                );
                return Resolution::Error {
                    kind: ErrorKind::StoreUnavailable,
                };
            }
        };

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        match self.matcher.best_match(label, &names) {
            Some(best) => {
                let record = records[best.index].clone();
                tracing::debug!(
                    stage = %ResolutionStage::Matched,
                    name = %record.name,
                    score = best.score,
                    "catalog item matched"
                );
                Resolution::Found(MatchCandidate {
                    record,
                    score: best.score,
                })
            }
            None => {
                tracing::debug!(
                    stage = %ResolutionStage::NotFound,
                    catalog_size = records.len(),
                    threshold = self.matcher.threshold(),
                    "no catalog item cleared the threshold"
                );
                Resolution::NotFound {
                    label: label.to_string(),
                    catalog_size: records.len(),
                }
            }
        }
    }
}

fn log_ranking(classification: &Classification) {
    if tracing::enabled!(tracing::Level::DEBUG) {
        let ranking: Vec<String> = classification
            .ranking
            .iter()
            .map(|s| format!("{}={:.4}", s.label, s.confidence))
            .collect();
        tracing::debug!(ranking = %ranking.join(", "), "classifier ranking");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sq_catalog::MemoryCatalog;
    use sq_classifier::{ClassifierResult, MockClassifier};
    use sq_protocol::{CatalogRecord, LabelScore};

    fn intents() -> IntentSet {
        IntentSet::from_tags(["aspirin", "bandage", "dipirona"]).unwrap()
    }

    fn resolver(classifier: Arc<dyn IntentClassifier>, catalog: MemoryCatalog) -> Resolver {
        Resolver::new(
            intents(),
            classifier,
            Arc::new(catalog),
            ResolverSettings::default(),
        )
    }

    #[tokio::test]
    async fn found_exact_item() {
        let resolver = resolver(
            Arc::new(MockClassifier::favoring("aspirin")),
            MemoryCatalog::from_pairs(&[("Aspirin", 10)]),
        );
        let outcome = resolver.resolve("how many aspirin do we have?").await;

        let Resolution::Found(m) = &outcome.resolution else {
            panic!("expected Found, got {:?}", outcome.resolution);
        };
        assert_eq!(m.record, CatalogRecord::new("Aspirin", 10));
        assert!(m.score >= 90);
        assert_eq!(outcome.label.as_deref(), Some("aspirin"));
        assert_eq!(
            outcome.response,
            "Aspirin has 10 units in stock (similarity 100%)."
        );
    }

    #[tokio::test]
    async fn not_found_below_threshold() {
        let resolver = resolver(
            Arc::new(MockClassifier::favoring("bandage")),
            MemoryCatalog::from_pairs(&[("Aspirin", 10)]),
        );
        let outcome = resolver.resolve("any bandages left?").await;
        assert_eq!(
            outcome.resolution,
            Resolution::NotFound {
                label: "bandage".into(),
                catalog_size: 1
            }
        );
        assert_eq!(outcome.response, "Item not found in stock.");
    }

    #[tokio::test]
    async fn empty_catalog() {
        let resolver = resolver(
            Arc::new(MockClassifier::favoring("aspirin")),
            MemoryCatalog::default(),
        );
        let outcome = resolver.resolve("aspirin").await;
        assert!(matches!(
            outcome.resolution,
            Resolution::NotFound {
                catalog_size: 0,
                ..
            }
        ));
        assert_eq!(outcome.response, "No items found in the database.");
    }

    #[tokio::test]
    async fn classifier_unavailable_is_recovered() {
        let resolver = resolver(
            Arc::new(MockClassifier::unavailable()),
            MemoryCatalog::from_pairs(&[("Aspirin", 10)]),
        );
        let outcome = resolver.resolve("aspirin?").await;
        assert_eq!(
            outcome.resolution.error_kind(),
            Some(ErrorKind::ClassifierUnavailable)
        );
        assert!(outcome.label.is_none());
        assert!(outcome.response.contains("classifier_unavailable"));
    }

    #[tokio::test]
    async fn ties_pick_first_in_catalog_order() {
        let resolver = resolver(
            Arc::new(MockClassifier::favoring("aspirin")),
            MemoryCatalog::from_pairs(&[("Aspirin Bayer", 5), ("Aspirin Generic", 7)]),
        );
        let outcome = resolver.resolve("aspirin").await;
        let Resolution::Found(m) = outcome.resolution else {
            panic!("expected Found");
        };
        assert_eq!(m.record.name, "Aspirin Bayer");
    }

    #[tokio::test]
    async fn repeated_calls_are_deterministic() {
        let resolver = resolver(
            Arc::new(MockClassifier::favoring("dipirona")),
            MemoryCatalog::with_sample_data(),
        );
        let first = resolver.resolve("Tem dipirona?").await;
        let second = resolver.resolve("Tem dipirona?").await;
        assert_eq!(first.resolution, second.resolution);
        assert_eq!(first.response, second.response);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn catalog_read_fresh_each_resolution() {
        let catalog = MemoryCatalog::from_pairs(&[("Aspirin", 10)]);
        let resolver = resolver(Arc::new(MockClassifier::favoring("bandage")), catalog.clone());
        assert!(!resolver.resolve("bandage").await.resolution.is_found());

        catalog.push(CatalogRecord::new("Bandage", 4)).await;
        assert!(resolver.resolve("bandage").await.resolution.is_found());
        assert_eq!(catalog.reads(), 2);
    }

    #[tokio::test]
    async fn store_unavailable_is_recovered() {
        let resolver = resolver(
            Arc::new(MockClassifier::favoring("aspirin")),
            MemoryCatalog::unavailable(),
        );
        let outcome = resolver.resolve("aspirin").await;
        assert_eq!(
            outcome.resolution.error_kind(),
            Some(ErrorKind::StoreUnavailable)
        );
        assert_eq!(outcome.label.as_deref(), Some("aspirin"));
        assert!(outcome.response.ends_with("(store_unavailable)."));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_classifier_times_out() {
        let classifier =
            Arc::new(MockClassifier::favoring("aspirin").with_delay(Duration::from_secs(60)));
        let resolver = Resolver::new(
            intents(),
            classifier,
            Arc::new(MemoryCatalog::from_pairs(&[("Aspirin", 10)])),
            ResolverSettings {
                classify_timeout: Duration::from_secs(1),
                ..ResolverSettings::default()
            },
        );
        let outcome = resolver.resolve("aspirin").await;
        assert_eq!(
            outcome.resolution.error_kind(),
            Some(ErrorKind::ClassifierUnavailable)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn breaker_skips_classifier_after_failures() {
        let classifier = Arc::new(MockClassifier::unavailable());
        let resolver = Resolver::new(
            intents(),
            classifier.clone(),
            Arc::new(MemoryCatalog::default()),
            ResolverSettings {
                breaker_failures: 2,
                breaker_cooldown: Duration::from_secs(30),
                ..ResolverSettings::default()
            },
        );

        for _ in 0..4 {
            let outcome = resolver.resolve("aspirin").await;
            assert_eq!(
                outcome.resolution.error_kind(),
                Some(ErrorKind::ClassifierUnavailable)
            );
        }
        assert_eq!(classifier.calls(), 2);
        assert_eq!(resolver.breaker_state(), BreakerState::Open);

        tokio::time::advance(Duration::from_secs(30)).await;
        resolver.resolve("aspirin").await;
        assert_eq!(classifier.calls(), 3);
    }

    #[tokio::test]
    async fn ambiguity_margin_flags_close_calls() {
        let scores = [("aspirin", 0.5), ("bandage", 0.5)];
        let catalog = MemoryCatalog::from_pairs(&[("Aspirin", 10)]);

        let strict = Resolver::new(
            intents(),
            Arc::new(MockClassifier::with_scores(scores)),
            Arc::new(catalog.clone()),
            ResolverSettings {
                ambiguity_margin: Some(0.05),
                ..ResolverSettings::default()
            },
        );
        let outcome = strict.resolve("aspirin or bandage").await;
        assert!(matches!(
            outcome.resolution,
            Resolution::Ambiguous { ref label, .. } if label == "aspirin"
        ));
        assert!(outcome.response.contains("rephrase"));

        // Without a margin the top label wins unconditionally; ties keep input order.
        let baseline = resolver(Arc::new(MockClassifier::with_scores(scores)), catalog);
        assert!(baseline.resolve("aspirin or bandage").await.resolution.is_found());
    }

    /// Returns a label outside the configured intent set.
    struct RogueClassifier;

    #[async_trait]
    impl IntentClassifier for RogueClassifier {
        async fn classify(
            &self,
            _text: &str,
            _labels: &[String],
        ) -> ClassifierResult<Classification> {
            Ok(Classification {
                ranking: vec![LabelScore {
                    label: "ibuprofen".into(),
                    confidence: 1.0,
                }],
            })
        }

        fn backend_name(&self) -> &str {
            "rogue"
        }
    }

    #[tokio::test]
    async fn unknown_label_is_classifier_error() {
        let resolver = resolver(
            Arc::new(RogueClassifier),
            MemoryCatalog::from_pairs(&[("Ibuprofen", 3)]),
        );
        let outcome = resolver.resolve("ibuprofen").await;
        assert_eq!(
            outcome.resolution.error_kind(),
            Some(ErrorKind::ClassifierUnavailable)
        );
    }

    #[tokio::test]
    async fn portuguese_locale() {
        let resolver = Resolver::new(
            intents(),
            Arc::new(MockClassifier::favoring("dipirona")),
            Arc::new(MemoryCatalog::from_pairs(&[("Dipirona", 40)])),
            ResolverSettings {
                locale: Locale::Pt,
                ..ResolverSettings::default()
            },
        );
        let outcome = resolver.resolve("Quantas dipironas temos?").await;
        assert_eq!(
            outcome.response,
            "Dipirona tem 40 unidades em estoque (similaridade 100%)."
        );
        assert_eq!(outcome.normalized.as_deref(), Some("dipirona"));
    }
}
