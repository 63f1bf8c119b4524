use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A recognized user goal, identified by its tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Unique label offered to the classifier (e.g., "aspirin").
    pub tag: String,
    /// Example utterances for this intent. Only used by local classifiers.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Canned responses from the intent file. Carried but not used by resolution.
    #[serde(default)]
    pub responses: Vec<String>,
}

impl Intent {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            patterns: Vec::new(),
            responses: Vec::new(),
        }
    }

    pub fn with_patterns(mut self, patterns: &[&str]) -> Self {
        self.patterns = patterns.iter().map(|p| (*p).to_string()).collect();
        self
    }
}

/// Reasons an intent collection cannot form an `IntentSet`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntentSetError {
    #[error("intent collection is empty")]
    Empty,

    #[error("intent #{0} has an empty tag")]
    EmptyTag(usize),

    #[error("duplicate intent tag: {0}")]
    DuplicateTag(String),
}

/// Ordered, validated set of intents.
///
/// Tags are non-empty and unique; they are the only labels a classifier may
/// return. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentSet {
    intents: Vec<Intent>,
}

impl IntentSet {
    pub fn new(intents: Vec<Intent>) -> Result<Self, IntentSetError> {
        if intents.is_empty() {
            return Err(IntentSetError::Empty);
        }

        let mut seen = HashSet::with_capacity(intents.len());
        for (index, intent) in intents.iter().enumerate() {
            if intent.tag.trim().is_empty() {
                return Err(IntentSetError::EmptyTag(index));
            }
            if !seen.insert(intent.tag.as_str()) {
                return Err(IntentSetError::DuplicateTag(intent.tag.clone()));
            }
        }

        Ok(Self { intents })
    }

    /// Build a set from bare tags (no patterns).
    pub fn from_tags<I, S>(tags: I) -> Result<Self, IntentSetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(tags.into_iter().map(Intent::new).collect())
    }

    /// Tags in configuration order.
    pub fn tags(&self) -> Vec<String> {
        self.intents.iter().map(|i| i.tag.clone()).collect()
    }

    pub fn get(&self, tag: &str) -> Option<&Intent> {
        self.intents.iter().find(|i| i.tag == tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intent> {
        self.intents.iter()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_deserializes_with_only_tag() {
        let intent: Intent = serde_json::from_str(r#"{"tag": "aspirin"}"#).unwrap();
        assert_eq!(intent.tag, "aspirin");
        assert!(intent.patterns.is_empty());
        assert!(intent.responses.is_empty());
    }

    #[test]
    fn intent_without_tag_is_rejected() {
        let result: Result<Intent, _> = serde_json::from_str(r#"{"patterns": ["x"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn set_preserves_order() {
        let set = IntentSet::from_tags(["dipirona", "aspirin", "bandage"]).unwrap();
        assert_eq!(set.tags(), vec!["dipirona", "aspirin", "bandage"]);
        assert_eq!(set.len(), 3);
        assert!(set.contains("aspirin"));
        assert!(!set.contains("ibuprofen"));
    }

    #[test]
    fn empty_set_rejected() {
        let result = IntentSet::new(vec![]);
        assert_eq!(result.unwrap_err(), IntentSetError::Empty);
    }

    #[test]
    fn duplicate_tag_rejected() {
        let result = IntentSet::from_tags(["aspirin", "bandage", "aspirin"]);
        assert_eq!(
            result.unwrap_err(),
            IntentSetError::DuplicateTag("aspirin".into())
        );
    }

    #[test]
    fn blank_tag_rejected() {
        let result = IntentSet::from_tags(["aspirin", "  "]);
        assert_eq!(result.unwrap_err(), IntentSetError::EmptyTag(1));
    }
}
