//! Assistant configuration, loadable from TOML.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sq_catalog::{StoreConfig, StoreError};
use sq_classifier::OllamaConfig;
use sq_protocol::IntentSetError;
use sq_text::{DEFAULT_THRESHOLD, Locale};

/// Startup failures. Every variant is fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid intents JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid intents: {0}")]
    Intents(#[from] IntentSetError),

    #[error("similarity threshold must be within 0..=100, got {0}")]
    InvalidThreshold(u8),

    #[error("ambiguity margin must be within 0.0..=1.0, got {0}")]
    InvalidMargin(f64),

    #[error("classify timeout must be at least 1s")]
    InvalidClassifyTimeout,

    #[error("ollama timeout ({ollama}s) must be shorter than the classify timeout ({classify}s)")]
    TimeoutOrder { ollama: u64, classify: u64 },

    #[error("invalid store config: {0}")]
    Store(#[from] StoreError),

    #[error("classifier setup failed: {0}")]
    Classifier(String),
}

/// Top-level configuration for the assistant.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Path to the intents JSON file.
    #[serde(default = "default_intents_path")]
    pub intents_path: PathBuf,
    /// Locale for normalization and reply text.
    #[serde(default)]
    pub locale: Locale,
    /// Input that ends the interactive session. Defaults per locale.
    #[serde(default)]
    pub exit_sentinel: Option<String>,
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_intents_path() -> PathBuf {
    PathBuf::from("intents.json")
}

/// Approximate matcher settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MatcherConfig {
    /// A catalog name must score strictly above this (0–100) to match.
    #[serde(default = "default_threshold")]
    pub threshold: u8,
}

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

/// Resolution pipeline settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// When set, a top-two confidence gap below this yields `Ambiguous`.
    /// Unset means the top label is always taken.
    #[serde(default)]
    pub ambiguity_margin: Option<f64>,
    /// Upper bound on one classifier call.
    #[serde(default = "default_classify_timeout_secs")]
    pub classify_timeout_secs: u64,
    /// Consecutive classifier failures that open the circuit breaker.
    #[serde(default = "default_breaker_failures")]
    pub breaker_failures: u32,
    /// How long the breaker stays open before a trial call.
    #[serde(default = "default_breaker_cooldown_secs")]
    pub breaker_cooldown_secs: u64,
}

fn default_classify_timeout_secs() -> u64 {
    15
}
fn default_breaker_failures() -> u32 {
    3
}
fn default_breaker_cooldown_secs() -> u64 {
    30
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ambiguity_margin: None,
            classify_timeout_secs: default_classify_timeout_secs(),
            breaker_failures: default_breaker_failures(),
            breaker_cooldown_secs: default_breaker_cooldown_secs(),
        }
    }
}

/// Which classifier engine answers `classify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// Ollama embeddings (remote model).
    #[default]
    Ollama,
    /// Token-set similarity against intent tags and patterns (no model).
    Lexical,
}

/// Classifier settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub backend: ClassifierBackend,
    /// With the Ollama backend, answer with the lexical engine when Ollama fails.
    #[serde(default)]
    pub fallback_to_lexical: bool,
    #[serde(default)]
    pub ollama: OllamaConfig,
}

impl AssistantConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate config from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matcher.threshold > 100 {
            return Err(ConfigError::InvalidThreshold(self.matcher.threshold));
        }
        if let Some(margin) = self.pipeline.ambiguity_margin
            && !(0.0..=1.0).contains(&margin)
        {
            return Err(ConfigError::InvalidMargin(margin));
        }
        let classify = self.pipeline.classify_timeout_secs;
        if classify == 0 {
            return Err(ConfigError::InvalidClassifyTimeout);
        }
        let ollama = self.classifier.ollama.timeout_secs;
        if self.classifier.backend == ClassifierBackend::Ollama && ollama >= classify {
            return Err(ConfigError::TimeoutOrder { ollama, classify });
        }
        self.store.validate()?;
        Ok(())
    }

    /// Configured sentinel, or the locale's default ("exit" / "sair").
    pub fn exit_sentinel(&self) -> String {
        self.exit_sentinel
            .clone()
            .unwrap_or_else(|| default_sentinel(self.locale).to_string())
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            intents_path: default_intents_path(),
            locale: Locale::default(),
            exit_sentinel: None,
            matcher: MatcherConfig::default(),
            pipeline: PipelineConfig::default(),
            classifier: ClassifierConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

pub fn default_sentinel(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "exit",
        Locale::Pt => "sair",
    }
}
