//! Zero-shot intent classification for StockQuery.
//!
//! Ranks a closed set of intent labels against an utterance. The pipeline
//! depends only on the ranking contract of `IntentClassifier`:
//! - one entry per input label, nothing else,
//! - confidences normalized to sum to 1,
//! - sorted descending, ties in input order.
//!
//! Engines:
//! - **Ollama** (remote): cosine similarity of `/api/embed` embeddings.
//! - **Lexical** (local): token-set similarity against labels and patterns.
//! - **Fallback**: primary engine first, secondary on failure.

pub mod error;
pub mod fallback;
pub mod lexical;
pub mod mock;
pub mod ollama;
pub mod ranking;

use async_trait::async_trait;
use sq_protocol::Classification;

pub use error::{ClassifierError, ClassifierResult};
pub use fallback::FallbackClassifier;
pub use lexical::LexicalClassifier;
pub use mock::MockClassifier;
pub use ollama::{OllamaClassifier, OllamaConfig};

/// Trait for engines that rank candidate intent labels for a text.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Rank `labels` (non-empty, unique) by how well they describe `text`.
    async fn classify(&self, text: &str, labels: &[String]) -> ClassifierResult<Classification>;

    /// Name of this engine (for logging).
    fn backend_name(&self) -> &str;
}
