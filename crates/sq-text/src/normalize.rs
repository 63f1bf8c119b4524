//! Deterministic utterance normalization.

use unicode_segmentation::UnicodeSegmentation;

use crate::locale::Locale;
use crate::stem::{self, Stemmer};
use crate::stopwords;

/// Lower-cases, splits on Unicode word boundaries, drops stopwords, stems,
/// and rejoins with single spaces.
///
/// Pure and idempotent: `normalize(normalize(x)) == normalize(x)`.
pub struct Normalizer {
    locale: Locale,
    stemmer: Box<dyn Stemmer>,
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("locale", &self.locale)
            .field("stemmer", &self.stemmer.name())
            .finish()
    }
}

impl Normalizer {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            stemmer: stem::for_locale(locale),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn normalize(&self, raw: &str) -> String {
        let lower = raw.to_lowercase();
        lower
            .unicode_words()
            .filter(|token| !stopwords::is_stopword(self.locale, token))
            .filter_map(|token| self.reduce(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Stem alphabetic tokens; a stem that lands on a stopword is dropped too.
    fn reduce(&self, token: &str) -> Option<String> {
        if !token.chars().all(char::is_alphabetic) {
            return Some(token.to_string());
        }
        let stemmed = self.stemmer.stem(token);
        if stopwords::is_stopword(self.locale, &stemmed) {
            None
        } else {
            Some(stemmed)
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}
