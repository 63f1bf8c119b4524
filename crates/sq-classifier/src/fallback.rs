//! Fallback classifier: primary engine with a secondary on failure.
//!
//! Tries the primary (usually the remote Ollama engine). If it errors,
//! the secondary (usually the local lexical engine) answers instead. Label
//! validation errors are not retried.

use async_trait::async_trait;
use sq_protocol::Classification;

use crate::error::{ClassifierError, ClassifierResult};
use crate::IntentClassifier;

/// Composite engine that tries the primary first, then the secondary.
pub struct FallbackClassifier {
    primary: Box<dyn IntentClassifier>,
    secondary: Box<dyn IntentClassifier>,
}

impl FallbackClassifier {
    pub fn new(primary: Box<dyn IntentClassifier>, secondary: Box<dyn IntentClassifier>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl IntentClassifier for FallbackClassifier {
    async fn classify(&self, text: &str, labels: &[String]) -> ClassifierResult<Classification> {
        match self.primary.classify(text, labels).await {
            Ok(result) => Ok(result),
            Err(e @ ClassifierError::InvalidLabels(_)) => Err(e),
            Err(e) => {
                tracing::warn!(
                    primary = self.primary.backend_name(),
                    secondary = self.secondary.backend_name(),
                    error = %e,
                    "primary classifier failed, falling back"
                );
                self.secondary.classify(text, labels).await
            }
        }
    }

    fn backend_name(&self) -> &str {
        "fallback"
    }
}
