//! Intent file loading.
//!
//! Expected shape (extra fields ignored):
//! `{"intents": [{"tag": "aspirin", "patterns": ["..."], "responses": ["..."]}]}`

use std::path::Path;

use serde::Deserialize;
use sq_protocol::{Intent, IntentSet};

use crate::config::ConfigError;

#[derive(Deserialize)]
struct IntentFile {
    intents: Vec<Intent>,
}

/// Parse and validate intents from JSON text.
pub fn parse_intents(json: &str) -> Result<IntentSet, ConfigError> {
    let file: IntentFile = serde_json::from_str(json)?;
    Ok(IntentSet::new(file.intents)?)
}

/// Read, parse and validate the intents file. Any failure is fatal at startup.
pub fn load_intents(path: impl AsRef<Path>) -> Result<IntentSet, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let intents = parse_intents(&contents)?;
    tracing::info!(path = %path.display(), count = intents.len(), "intents loaded");
    Ok(intents)
}
