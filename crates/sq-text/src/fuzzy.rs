//! Approximate name matching.
//!
//! Scores are integers in 0–100. `ratio` is the normalized indel similarity
//! `2 * LCS / (|a| + |b|)`. `token_set_ratio` compares the sorted token
//! intersection against each side's leftovers, so word order and extra
//! tokens ("aspirin 500mg" vs "aspirin") do not hurt the score.

use std::collections::BTreeSet;

/// Default acceptance threshold. A match must score strictly above it.
pub const DEFAULT_THRESHOLD: u8 = 75;

/// Lower-case, then replace every non-alphanumeric character with a space.
fn preprocess(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect()
}

fn token_set(s: &str) -> BTreeSet<String> {
    preprocess(s).split_whitespace().map(str::to_string).collect()
}

/// Length of the longest common subsequence, in chars.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Similarity in [0, 100] as a float. 0 if either side is empty.
fn raw_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let lcs = lcs_len(&a, &b);
    200.0 * lcs as f64 / (a.len() + b.len()) as f64
}

fn to_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Plain character similarity, case-sensitive, 0–100.
pub fn ratio(a: &str, b: &str) -> u8 {
    to_score(raw_ratio(a, b))
}

/// Order-independent token-set similarity, case-insensitive, 0–100.
///
/// Symmetric in its arguments. Returns 0 when either side has no tokens.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let ta = token_set(a);
    let tb = token_set(b);
    if ta.is_empty() || tb.is_empty() {
        return 0;
    }

    let intersection: Vec<&str> = ta.intersection(&tb).map(String::as_str).collect();
    let diff_ab: Vec<&str> = ta.difference(&tb).map(String::as_str).collect();
    let diff_ba: Vec<&str> = tb.difference(&ta).map(String::as_str).collect();

    // One side's tokens are a subset of the other's
    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100;
    }

    let sect = intersection.join(" ");
    let join = |rest: &[&str]| {
        if sect.is_empty() {
            rest.join(" ")
        } else {
            format!("{sect} {}", rest.join(" "))
        }
    };
    let combined_ab = join(&diff_ab[..]);
    let combined_ba = join(&diff_ba[..]);

    let mut best = raw_ratio(&combined_ab, &combined_ba);
    if !sect.is_empty() {
        best = best
            .max(raw_ratio(&sect, &combined_ab))
            .max(raw_ratio(&sect, &combined_ba));
    }
    to_score(best)
}

/// Winning candidate of a `Matcher::best_match` scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestMatch {
    /// Position in the candidate list.
    pub index: usize,
    pub score: u8,
}

/// Linear-scan best-match selector with a strict acceptance threshold.
///
/// Cost is O(candidates × name length); suited to catalogs up to the low
/// thousands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    threshold: u8,
}

impl Matcher {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Score `query` against every candidate and return the best one if its
    /// score is strictly greater than the threshold. Ties keep the
    /// first-seen candidate.
    pub fn best_match<S: AsRef<str>>(&self, query: &str, candidates: &[S]) -> Option<BestMatch> {
        let mut best: Option<BestMatch> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            let score = token_set_ratio(query, candidate.as_ref());
            match &mut best {
                Some(current) if score > current.score => {
                    *current = BestMatch { index, score };
                }
                None => best = Some(BestMatch { index, score }),
                _ => {}
            }
        }

        let best = best?;
        tracing::trace!(
            query,
            index = best.index,
            score = best.score,
            threshold = self.threshold,
            "best candidate"
        );
        (best.score > self.threshold).then_some(best)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}
