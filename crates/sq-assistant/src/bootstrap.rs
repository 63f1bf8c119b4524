//! Startup wiring: config → intents, classifier, catalog → `Resolver`.

use std::sync::Arc;

use sq_catalog::{CatalogStore, SqliteCatalog, StoreConfig};
use sq_classifier::{FallbackClassifier, IntentClassifier, LexicalClassifier, OllamaClassifier};
use sq_protocol::IntentSet;
use sq_text::Locale;

use crate::config::{AssistantConfig, ClassifierBackend, ClassifierConfig, ConfigError};
use crate::intents::load_intents;
use crate::pipeline::{Resolver, ResolverSettings};

/// Build the configured classifier engine.
pub fn build_classifier(
    config: &ClassifierConfig,
    locale: Locale,
    intents: &IntentSet,
) -> Result<Arc<dyn IntentClassifier>, ConfigError> {
    let classifier: Arc<dyn IntentClassifier> = match config.backend {
        ClassifierBackend::Lexical => Arc::new(LexicalClassifier::from_intents(locale, intents)),
        ClassifierBackend::Ollama => {
            let ollama = OllamaClassifier::new(config.ollama.clone())
                .map_err(|e| ConfigError::Classifier(e.to_string()))?;
            tracing::info!(
                host = %config.ollama.host,
                model = %config.ollama.model,
                fallback = config.fallback_to_lexical,
                "ollama classifier configured"
            );
            if config.fallback_to_lexical {
                Arc::new(FallbackClassifier::new(
                    Box::new(ollama),
                    Box::new(LexicalClassifier::from_intents(locale, intents)),
                ))
            } else {
                Arc::new(ollama)
            }
        }
    };
    Ok(classifier)
}

pub fn build_store(config: &StoreConfig) -> Result<Arc<dyn CatalogStore>, ConfigError> {
    let store = SqliteCatalog::new(config)?;
    tracing::info!(
        database_url = %config.database_url,
        table = %config.table,
        "catalog store configured"
    );
    Ok(Arc::new(store))
}

/// Load intents and build every collaborator. Errors here abort startup.
pub fn build_resolver(config: &AssistantConfig) -> Result<Resolver, ConfigError> {
    let intents = load_intents(&config.intents_path)?;
    let classifier = build_classifier(&config.classifier, config.locale, &intents)?;
    let catalog = build_store(&config.store)?;
    Ok(Resolver::new(
        intents,
        classifier,
        catalog,
        ResolverSettings::from_config(config),
    ))
}
