//! Light suffix-stripping stemmers.
//!
//! Each stemmer applies an ordered rule table (longest suffix first) and
//! repeats until no rule fires. Every rule shortens the word, so the loop
//! terminates and `stem(stem(w)) == stem(w)`.

use crate::locale::Locale;

/// Minimum characters that must remain before a suffix is removed.
const MIN_STEM_CHARS: usize = 3;

/// Trait for stemming algorithms.
pub trait Stemmer: Send + Sync {
    /// Stem a lower-case word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

/// Stemmer for `locale`.
pub fn for_locale(locale: Locale) -> Box<dyn Stemmer> {
    match locale {
        Locale::En => Box::new(EnglishStemmer),
        Locale::Pt => Box::new(PortugueseStemmer),
    }
}

/// `(suffix, replacement)`; the replacement is always shorter than the suffix.
type Rule = (&'static str, &'static str);

const ENGLISH_RULES: &[Rule] = &[
    ("ness", ""),
    ("ment", ""),
    ("tion", ""),
    ("sion", ""),
    ("able", ""),
    ("ible", ""),
    ("ies", "y"),
    ("ied", "y"),
    ("ing", ""),
    ("est", ""),
    ("ful", ""),
    ("ly", ""),
    ("ed", ""),
    ("es", ""),
    ("er", ""),
    ("s", ""),
];

const PORTUGUESE_RULES: &[Rule] = &[
    ("amentos", ""),
    ("imentos", ""),
    ("zinhos", ""),
    ("zinhas", ""),
    ("amento", ""),
    ("imento", ""),
    ("mente", ""),
    ("zinho", ""),
    ("zinha", ""),
    ("inhos", ""),
    ("inhas", ""),
    ("ando", ""),
    ("endo", ""),
    ("indo", ""),
    ("inho", ""),
    ("inha", ""),
    ("ões", "ão"),
    ("ães", "ão"),
    ("ais", "al"),
    ("éis", "el"),
    ("óis", "ol"),
    ("ns", "m"),
    ("es", ""),
    ("s", ""),
];

/// Apply the first matching rule once. `None` when no rule fires.
fn apply_once(word: &str, rules: &[Rule], keep: impl Fn(&str, &str) -> bool) -> Option<String> {
    for (suffix, replacement) in rules {
        let Some(stem) = word.strip_suffix(suffix) else {
            continue;
        };
        if stem.chars().count() < MIN_STEM_CHARS || keep(word, suffix) {
            continue;
        }
        return Some(format!("{stem}{replacement}"));
    }
    None
}

fn stem_with(word: &str, rules: &[Rule], keep: impl Fn(&str, &str) -> bool) -> String {
    let mut current = word.to_string();
    while let Some(next) = apply_once(&current, rules, &keep) {
        current = next;
    }
    current
}

/// English suffix stemmer.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishStemmer;

impl Stemmer for EnglishStemmer {
    fn stem(&self, word: &str) -> String {
        // "glass", "virus", "analysis" are not plurals
        stem_with(word, ENGLISH_RULES, |w, suffix| {
            suffix == "s" && (w.ends_with("ss") || w.ends_with("us") || w.ends_with("is"))
        })
    }

    fn name(&self) -> &'static str {
        "english"
    }
}

/// Portuguese plural, diminutive, adverb and gerund stemmer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortugueseStemmer;

impl Stemmer for PortugueseStemmer {
    fn stem(&self, word: &str) -> String {
        stem_with(word, PORTUGUESE_RULES, |w, suffix| {
            suffix == "s" && (w.ends_with("ss") || w.ends_with("us") || w.ends_with("is"))
        })
    }

    fn name(&self) -> &'static str {
        "portuguese"
    }
}
