use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::MatchCandidate;

/// Recoverable failure classes surfaced by the resolution pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Classification failed, timed out, or the circuit breaker is open.
    ClassifierUnavailable,
    /// The catalog could not be reached or queried.
    StoreUnavailable,
}

impl ErrorKind {
    /// Short diagnostic label, safe to show to end users.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClassifierUnavailable => "classifier_unavailable",
            Self::StoreUnavailable => "store_unavailable",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final outcome of resolving one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    /// A catalog record cleared the similarity threshold.
    Found(MatchCandidate),
    /// No record cleared the threshold. `catalog_size == 0` means the catalog was empty.
    NotFound { label: String, catalog_size: usize },
    /// The top two labels were within the configured ambiguity margin.
    Ambiguous { label: String, margin: f64 },
    /// A stage failed and was recovered at the pipeline boundary.
    Error { kind: ErrorKind },
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Error { kind } => Some(*kind),
            _ => None,
        }
    }
}

/// Pipeline states, in the order a successful resolution passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStage {
    Start,
    Normalized,
    Classified,
    Matched,
    NotFound,
    Responded,
}

impl ResolutionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Normalized => "normalized",
            Self::Classified => "classified",
            Self::Matched => "matched",
            Self::NotFound => "not_found",
            Self::Responded => "responded",
        }
    }
}

impl std::fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolution together with its trace metadata and rendered reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionOutcome {
    /// Per-request ID (UUIDv7 for time-sortability).
    pub id: Uuid,
    /// Utterance as received.
    pub utterance: String,
    /// Normalized utterance, if normalization ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,
    /// Top classifier label, if classification succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub resolution: Resolution,
    /// User-facing reply text.
    pub response: String,
    /// End-to-end latency in milliseconds.
    pub latency_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRecord;

    #[test]
    fn error_kind_serialization() {
        let json = serde_json::to_string(&ErrorKind::ClassifierUnavailable).unwrap();
        assert_eq!(json, r#""classifier_unavailable""#);
        assert_eq!(ErrorKind::StoreUnavailable.to_string(), "store_unavailable");
    }

    #[test]
    fn resolution_is_tagged() {
        let found = Resolution::Found(MatchCandidate {
            record: CatalogRecord::new("Aspirin", 10),
            score: 100,
        });
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json["outcome"], "found");
        assert_eq!(json["record"]["name"], "Aspirin");
        assert_eq!(json["score"], 100);

        let err = Resolution::Error {
            kind: ErrorKind::StoreUnavailable,
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["outcome"], "error");
        assert_eq!(json["kind"], "store_unavailable");
    }

    #[test]
    fn resolution_helpers() {
        let not_found = Resolution::NotFound {
            label: "bandage".into(),
            catalog_size: 1,
        };
        assert!(!not_found.is_found());
        assert!(not_found.error_kind().is_none());

        let err = Resolution::Error {
            kind: ErrorKind::ClassifierUnavailable,
        };
        assert_eq!(err.error_kind(), Some(ErrorKind::ClassifierUnavailable));
    }

    #[test]
    fn stage_names() {
        assert_eq!(ResolutionStage::NotFound.as_str(), "not_found");
        assert_eq!(ResolutionStage::Responded.to_string(), "responded");
    }
}
