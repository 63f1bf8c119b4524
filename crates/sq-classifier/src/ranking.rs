//! Turn raw per-label scores into a ranked, normalized `Classification`.

use std::collections::HashSet;

use sq_protocol::{Classification, LabelScore};

use crate::error::{ClassifierError, ClassifierResult};

/// Reject empty or duplicated label sets.
pub fn validate_labels(labels: &[String]) -> ClassifierResult<()> {
    if labels.is_empty() {
        return Err(ClassifierError::InvalidLabels("no candidate labels".into()));
    }
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(ClassifierError::InvalidLabels(format!(
                "duplicate label '{label}'"
            )));
        }
    }
    Ok(())
}

/// Softmax `scores / temperature` and sort descending.
///
/// `scores[i]` belongs to `labels[i]`. The sort is stable, so equal
/// confidences keep input order.
pub fn rank(
    labels: &[String],
    scores: &[f64],
    temperature: f64,
) -> ClassifierResult<Classification> {
    validate_labels(labels)?;
    if labels.len() != scores.len() {
        return Err(ClassifierError::InvalidResponse(format!(
            "expected {} scores, got {}",
            labels.len(),
            scores.len()
        )));
    }
    if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
        return Err(ClassifierError::InvalidResponse(format!(
            "non-finite score {bad}"
        )));
    }

    let temperature = if temperature > 0.0 { temperature } else { 1.0 };
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores
        .iter()
        .map(|s| ((s - max) / temperature).exp())
        .collect();
    let total: f64 = exps.iter().sum();

    let mut ranking: Vec<LabelScore> = labels
        .iter()
        .zip(&exps)
        .map(|(label, e)| LabelScore {
            label: label.clone(),
            confidence: e / total,
        })
        .collect();
    ranking.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    Ok(Classification { ranking })
}
