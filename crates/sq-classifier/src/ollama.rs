//! Ollama embedding classifier for zero-shot intent ranking.
//!
//! Sends the utterance and every candidate label to the Ollama embeddings
//! API (`/api/embed`) in one batch, scores each label by cosine similarity
//! to the utterance, and softmaxes the similarities into confidences.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sq_protocol::Classification;

use crate::error::{ClassifierError, ClassifierResult};
use crate::ranking;
use crate::IntentClassifier;

/// Configuration for the Ollama embeddings endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    /// Ollama HTTP API base URL.
    #[serde(default = "default_host")]
    pub host: String,
    /// Embedding model to use.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Softmax temperature applied to cosine similarities.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_host() -> String {
    "http://localhost:11434".into()
}
fn default_model() -> String {
    "nomic-embed-text".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_temperature() -> f64 {
    0.05
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

/// Ollama embed API request body.
#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

/// Ollama embed API response (only fields we need).
#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f64>>,
}

/// Client for zero-shot classification over Ollama embeddings.
pub struct OllamaClassifier {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaClassifier {
    pub fn new(config: OllamaConfig) -> ClassifierResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClassifierError::Unavailable(format!("http client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    async fn embed(&self, inputs: Vec<&str>) -> ClassifierResult<Vec<Vec<f64>>> {
        let url = format!("{}/api/embed", self.config.host.trim_end_matches('/'));
        let expected = inputs.len();
        let body = EmbedRequest {
            model: &self.config.model,
            input: inputs,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifierError::Timeout(self.config.timeout_secs)
                } else {
                    ClassifierError::Unavailable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ClassifierError::Unavailable(format!(
                "ollama returned {}",
                response.status()
            )));
        }

        let parsed: EmbedResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ClassifierError::Timeout(self.config.timeout_secs)
            } else {
                ClassifierError::InvalidResponse(e.to_string())
            }
        })?;

        if parsed.embeddings.len() != expected {
            return Err(ClassifierError::InvalidResponse(format!(
                "expected {expected} embeddings, got {}",
                parsed.embeddings.len()
            )));
        }
        Ok(parsed.embeddings)
    }
}

/// Cosine similarity in [-1, 1]. Errors on mismatched or zero-length vectors.
fn cosine(a: &[f64], b: &[f64]) -> ClassifierResult<f64> {
    if a.len() != b.len() || a.is_empty() {
        return Err(ClassifierError::InvalidResponse(format!(
            "embedding dimensions differ ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

#[async_trait]
impl IntentClassifier for OllamaClassifier {
    async fn classify(&self, text: &str, labels: &[String]) -> ClassifierResult<Classification> {
        ranking::validate_labels(labels)?;

        let mut inputs = Vec::with_capacity(labels.len() + 1);
        inputs.push(text);
        inputs.extend(labels.iter().map(String::as_str));

        let embeddings = self.embed(inputs).await?;
        let (query, label_vectors) = embeddings
            .split_first()
            .ok_or_else(|| ClassifierError::InvalidResponse("no embeddings".into()))?;

        let scores = label_vectors
            .iter()
            .map(|v| cosine(query, v))
            .collect::<ClassifierResult<Vec<_>>>()?;

        tracing::debug!(model = %self.config.model, ?scores, "ollama label similarities");
        ranking::rank(labels, &scores, self.config.temperature)
    }

    fn backend_name(&self) -> &str {
        "ollama"
    }
}
