//! Text utilities for StockQuery.
//!
//! Two independent pieces:
//! - **Normalizer**: lower-case, UAX #29 word split, stopword removal and
//!   suffix stemming for a single configured locale.
//! - **Approximate matcher**: token-set similarity (0–100) and best-match
//!   selection over a candidate list with a strict threshold.

pub mod fuzzy;
pub mod locale;
pub mod normalize;
pub mod stem;
pub mod stopwords;

pub use fuzzy::{BestMatch, DEFAULT_THRESHOLD, Matcher, ratio, token_set_ratio};
pub use locale::{Locale, LocaleError};
pub use normalize::Normalizer;
pub use stem::{EnglishStemmer, PortugueseStemmer, Stemmer};
