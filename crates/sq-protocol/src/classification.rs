use serde::{Deserialize, Serialize};

/// One label of a classification with its normalized confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    /// Confidence in [0, 1]; all confidences of a classification sum to 1.
    pub confidence: f64,
}

/// Ranked classifier output, highest confidence first.
///
/// Contains exactly one entry per candidate label. Equal confidences keep
/// the order the labels were offered in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Classification {
    pub ranking: Vec<LabelScore>,
}

impl Classification {
    /// Highest-ranked entry.
    pub fn top(&self) -> Option<&LabelScore> {
        self.ranking.first()
    }

    /// Confidence gap between the two best labels. `None` with fewer than two labels.
    pub fn margin(&self) -> Option<f64> {
        match self.ranking.as_slice() {
            [first, second, ..] => Some(first.confidence - second.confidence),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    pub fn total_confidence(&self) -> f64 {
        self.ranking.iter().map(|s| s.confidence).sum()
    }
}
