//! Fixed stopword lists per locale.
//!
//! Lists are lower-case; callers lower-case tokens before lookup.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::locale::Locale;

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "an", "and", "any", "are", "as", "at", "be", "but", "by", "can", "do", "does",
    "for", "have", "has", "how", "i", "if", "in", "into", "is", "it", "many", "me", "much", "my",
    "no", "not", "of", "on", "or", "our", "please", "such", "that", "the", "their", "then",
    "there", "these", "they", "this", "to", "was", "we", "what", "will", "with", "you", "your",
];

const PORTUGUESE_STOP_WORDS: &[&str] = &[
    "a", "ao", "aos", "aquela", "aquelas", "aquele", "aqueles", "aquilo", "as", "até", "à", "às",
    "com", "como", "da", "das", "de", "dela", "delas", "dele", "deles", "depois", "do", "dos",
    "e", "é", "ela", "elas", "ele", "eles", "em", "entre", "essa", "essas", "esse", "esses",
    "esta", "estas", "este", "estes", "eu", "há", "isso", "isto", "já", "lhe", "lhes", "mais",
    "mas", "me", "mesmo", "meu", "meus", "minha", "minhas", "muito", "na", "nas", "nem", "no",
    "nos", "nossa", "nossas", "nosso", "nossos", "num", "numa", "nós", "o", "os", "ou", "para",
    "pela", "pelas", "pelo", "pelos", "por", "qual", "quando", "quanto", "quantos", "quantas",
    "que", "quem", "se", "sem", "seu", "seus", "só", "sua", "suas", "também", "te", "tem",
    "temos", "tu", "tua", "tuas", "teu", "teus", "um", "uma", "você", "vocês", "vos",
];

static ENGLISH: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

static PORTUGUESE: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| PORTUGUESE_STOP_WORDS.iter().copied().collect());

/// Stopword set for `locale`.
pub fn for_locale(locale: Locale) -> &'static HashSet<&'static str> {
    match locale {
        Locale::En => &ENGLISH,
        Locale::Pt => &PORTUGUESE,
    }
}

pub fn is_stopword(locale: Locale, word: &str) -> bool {
    for_locale(locale).contains(word)
}
